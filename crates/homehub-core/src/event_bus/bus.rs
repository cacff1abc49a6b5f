//! Event bus facade and process-wide instance.
//!
//! Owns the configuration, starts the dispatch worker at construction,
//! exposes publish/subscribe/unsubscribe, and runs the shutdown protocol
//! at teardown.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{error, info, warn};

use super::event::{BusEvent, EventHandler};
use super::queue::EventQueue;
use super::registry::HandlerRegistry;
use super::worker::{self, BusShared, WakeSignal};
use crate::error::{PublishError, SubscribeError};

/// Configuration for the event bus.
///
/// All values are fixed at construction; in particular the queue
/// capacity cannot be resized at runtime.
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Maximum number of events held pending dispatch.
    pub capacity: usize,
    /// Thread name of the dispatch worker, for diagnostics.
    pub worker_name: String,
    /// Stack-size hint for the dispatch worker thread.
    pub worker_stack_size: Option<usize>,
    /// How long producers wait for an internal guard before failing.
    pub lock_timeout: Duration,
    /// Liveness fallback for the worker's wait on the wake signal; it
    /// does not itself indicate new work.
    pub poll_interval: Duration,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            capacity: 30,
            worker_name: "event-bus".to_string(),
            worker_stack_size: None,
            lock_timeout: Duration::from_millis(1000),
            poll_interval: Duration::from_millis(50),
        }
    }
}

/// Bounded, priority-ordered publish/subscribe bus with a dedicated
/// dispatch thread.
///
/// Producers hand events over as `Box<dyn BusEvent>`; the bus owns an
/// accepted event until it is dropped after dispatch or during the
/// shutdown drain. Rejected events travel back to the caller inside the
/// error. Handlers are shared (`Arc`) and are invoked synchronously on
/// the dispatch thread in registry-snapshot order.
pub struct EventBus {
    shared: Arc<BusShared>,
    worker: Mutex<Option<JoinHandle<()>>>,
    config: EventBusConfig,
}

impl EventBus {
    /// Create a bus with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// Create a bus and start its dispatch worker.
    ///
    /// If the worker thread cannot be spawned the bus still accepts
    /// events until the queue fills; the failure is logged.
    pub fn with_config(config: EventBusConfig) -> Self {
        let shared = Arc::new(BusShared {
            queue: EventQueue::new(config.capacity),
            registry: HandlerRegistry::new(),
            wake: WakeSignal::new(),
            exit: AtomicBool::new(false),
            lock_timeout: config.lock_timeout,
            poll_interval: config.poll_interval,
        });

        let mut builder = thread::Builder::new().name(config.worker_name.clone());
        if let Some(stack_size) = config.worker_stack_size {
            builder = builder.stack_size(stack_size);
        }
        let worker = match builder.spawn({
            let shared = Arc::clone(&shared);
            move || worker::run(shared)
        }) {
            Ok(handle) => Some(handle),
            Err(err) => {
                error!(error = %err, "failed to start the dispatch worker");
                None
            }
        };

        Self {
            shared,
            worker: Mutex::new(worker),
            config,
        }
    }

    /// Publish an event using the configured lock-timeout budget.
    pub fn publish(&self, event: Box<dyn BusEvent>) -> Result<(), PublishError> {
        self.publish_with_timeout(event, self.config.lock_timeout)
    }

    /// Publish an event, waiting at most `lock_timeout` for the queue
    /// guard.
    ///
    /// On failure the event is handed back inside the error and the
    /// caller is responsible for it again.
    pub fn publish_with_timeout(
        &self,
        event: Box<dyn BusEvent>,
        lock_timeout: Duration,
    ) -> Result<(), PublishError> {
        if self.is_closed() {
            return Err(PublishError::Closed(event));
        }
        let result = self.shared.queue.try_push(event, lock_timeout);
        // Every publish attempt signals the worker, accepted or not.
        self.shared.wake.notify();
        if let Err(err) = &result {
            warn!(event = err.event().name(), error = %err, "publish rejected");
        }
        result
    }

    /// Register `handler` under `name`. Re-subscribing the same handler
    /// to the same name is a successful no-op.
    pub fn subscribe(
        &self,
        name: &str,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), SubscribeError> {
        let result = self
            .shared
            .registry
            .subscribe(name, handler, self.config.lock_timeout);
        if let Err(err) = &result {
            error!(event = name, error = %err, "subscribe failed");
        }
        result
    }

    /// Remove `handler` from `name`. Unknown names and unregistered
    /// handlers are successful no-ops; in-flight dispatch cycles keep
    /// their snapshot.
    pub fn unsubscribe(
        &self,
        name: &str,
        handler: &Arc<dyn EventHandler>,
    ) -> Result<(), SubscribeError> {
        let result = self
            .shared
            .registry
            .unsubscribe(name, handler, self.config.lock_timeout);
        if let Err(err) = &result {
            error!(event = name, error = %err, "unsubscribe failed");
        }
        result
    }

    /// Whether shutdown has begun. A closed bus rejects every publish.
    pub fn is_closed(&self) -> bool {
        self.shared.exit.load(Ordering::Acquire)
    }

    /// Stop the bus: set the exit flag, wake the worker, and wait
    /// (unbounded, by design) for it to acknowledge by exiting.
    ///
    /// The worker finishes the dispatch cycle in flight, then drops every
    /// still-queued event without dispatching it. Idempotent; also runs
    /// on drop.
    pub fn shutdown(&self) {
        self.shared.exit.store(true, Ordering::Release);
        self.shared.wake.notify();
        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            info!(worker = %self.config.worker_name, "waiting for the dispatch worker to exit");
            if handle.join().is_err() {
                error!("dispatch worker panicked");
            }
        }
    }

    /// The configuration this bus was built with.
    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventBus {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("pending", &self.shared.queue.len())
            .field("closed", &self.is_closed())
            .field("config", &self.config)
            .finish()
    }
}

/// Process-wide bus instance.
static EVENT_BUS: OnceLock<EventBus> = OnceLock::new();

/// Get or lazily initialize the process-wide event bus.
///
/// Prefer constructing an [`EventBus`] explicitly and handing it to the
/// components that need it; this accessor exists for call sites without
/// access to the wired instance. The global bus is never torn down.
pub fn event_bus() -> &'static EventBus {
    EVENT_BUS.get_or_init(EventBus::new)
}

/// Initialize the process-wide event bus with a custom configuration.
///
/// Must run before any call to [`event_bus`]. Returns the rejected
/// configuration when the bus has already been initialized.
pub fn init_event_bus(config: EventBusConfig) -> Result<(), EventBusConfig> {
    EVENT_BUS
        .set(EventBus::with_config(config))
        .map_err(|bus| bus.config.clone())
}

/// Publish an event to the process-wide event bus.
#[macro_export]
macro_rules! emit {
    ($event:expr) => {
        $crate::event_bus::event_bus().publish(Box::new($event))
    };
}

/// Subscribe a handler on the process-wide event bus.
#[macro_export]
macro_rules! on_event {
    ($name:expr, $handler:expr) => {
        $crate::event_bus::event_bus().subscribe($name, $handler)
    };
}
