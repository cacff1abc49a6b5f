//! Boundary handlers wired by the hub process.
//!
//! These are the subscribers the daemon registers at startup: a logger
//! for every catalog kind and a tracker that keeps the last observed
//! uplink state readable by other components.

use std::sync::atomic::{AtomicBool, Ordering};

use homehub_core::{BusEvent, ConnectivityChanged, EventHandler};
use tracing::info;

/// Logs every event it is subscribed to.
pub struct EventLogger;

impl EventHandler for EventLogger {
    fn handle(&self, event: &dyn BusEvent) {
        info!(event = event.name(), rank = event.priority(), "event");
    }
}

/// Keeps the last observed uplink state.
///
/// Subscribed under [`ConnectivityChanged::NAME`]; events of other kinds
/// are ignored.
#[derive(Default)]
pub struct ConnectivityTracker {
    connected: AtomicBool,
}

impl ConnectivityTracker {
    /// Last uplink state observed on the bus.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}

impl EventHandler for ConnectivityTracker {
    fn handle(&self, event: &dyn BusEvent) {
        if let Some(change) = event.as_any().downcast_ref::<ConnectivityChanged>() {
            self.connected.store(change.connected, Ordering::Relaxed);
        }
    }
}
