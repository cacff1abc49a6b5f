//! Handler registry
//!
//! Maintains the event-name to handler-set mapping. Entries are created
//! lazily on first subscribe and deduplicate handlers by instance
//! identity, so re-subscribing the same handler to the same name is a
//! no-op. Dispatch works from a snapshot so the registry guard is never
//! held while handlers run.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::debug;

use super::event::EventHandler;
use crate::error::SubscribeError;

/// Event-name to handler-list mapping.
///
/// Lists preserve insertion order, which is the order a dispatch
/// snapshot is invoked in.
pub(crate) struct HandlerRegistry {
    handlers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
}

impl HandlerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Register `handler` under `name`. Idempotent for an
    /// already-registered handler.
    pub(crate) fn subscribe(
        &self,
        name: &str,
        handler: Arc<dyn EventHandler>,
        lock_timeout: Duration,
    ) -> Result<(), SubscribeError> {
        if name.is_empty() {
            return Err(SubscribeError::InvalidName);
        }
        let Some(mut handlers) = self.handlers.try_write_for(lock_timeout) else {
            return Err(SubscribeError::LockTimeout);
        };
        let entry = handlers.entry(name.to_string()).or_default();
        if entry.iter().any(|existing| Arc::ptr_eq(existing, &handler)) {
            debug!(event = name, "handler already subscribed");
            return Ok(());
        }
        entry.push(handler);
        Ok(())
    }

    /// Remove `handler` from `name`. Unknown names and unregistered
    /// handlers are successful no-ops.
    pub(crate) fn unsubscribe(
        &self,
        name: &str,
        handler: &Arc<dyn EventHandler>,
        lock_timeout: Duration,
    ) -> Result<(), SubscribeError> {
        if name.is_empty() {
            return Err(SubscribeError::InvalidName);
        }
        let Some(mut handlers) = self.handlers.try_write_for(lock_timeout) else {
            return Err(SubscribeError::LockTimeout);
        };
        if let Some(entry) = handlers.get_mut(name) {
            entry.retain(|existing| !Arc::ptr_eq(existing, handler));
        }
        Ok(())
    }

    /// Copy of the current handler list for `name`, empty when none.
    ///
    /// `None` means the guard was not acquired within the budget.
    pub(crate) fn snapshot(
        &self,
        name: &str,
        lock_timeout: Duration,
    ) -> Option<Vec<Arc<dyn EventHandler>>> {
        let handlers = self.handlers.try_read_for(lock_timeout)?;
        Some(handlers.get(name).cloned().unwrap_or_default())
    }
}
