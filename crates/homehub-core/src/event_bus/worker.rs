//! Dispatch worker
//!
//! A single dedicated thread drains the priority queue and fans each
//! event out to the registry snapshot for its name. Exactly one dispatch
//! cycle runs at a time; handlers are invoked synchronously in snapshot
//! order, so a slow handler stalls all subsequently queued events. That
//! back-pressure is part of the bus contract.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, trace, warn};

use super::event::BusEvent;
use super::queue::{EventQueue, PopOutcome};
use super::registry::HandlerRegistry;

/// Binary wake signal between producers and the dispatch thread.
///
/// Producers notify after every publish attempt; the worker waits with a
/// short poll timeout as a liveness fallback in case a signal is ever
/// missed. The signal is its own lock domain, never held while the queue
/// or registry guard is held.
pub(crate) struct WakeSignal {
    pending: Mutex<bool>,
    condvar: Condvar,
}

impl WakeSignal {
    pub(crate) fn new() -> Self {
        Self {
            pending: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    pub(crate) fn notify(&self) {
        let mut pending = self.pending.lock();
        *pending = true;
        self.condvar.notify_one();
    }

    /// Block until notified or `timeout` elapses, consuming the pending
    /// signal either way.
    pub(crate) fn wait(&self, timeout: Duration) {
        let mut pending = self.pending.lock();
        if !*pending {
            let _ = self.condvar.wait_for(&mut pending, timeout);
        }
        *pending = false;
    }
}

/// State shared between the bus facade, producers, and the worker.
pub(crate) struct BusShared {
    pub(crate) queue: EventQueue,
    pub(crate) registry: HandlerRegistry,
    pub(crate) wake: WakeSignal,
    pub(crate) exit: AtomicBool,
    pub(crate) lock_timeout: Duration,
    pub(crate) poll_interval: Duration,
}

/// Dispatch loop states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerState {
    /// Attempting to drain the queue.
    Active,
    /// Queue observed empty; blocked on the wake signal.
    Waiting,
    /// Exit requested; final drain pending.
    Exiting,
}

/// Body of the dispatch thread.
///
/// The exit flag is checked once per iteration, at the end, so the cycle
/// in flight always completes. Returning from this function is the
/// worker's exit acknowledgement; the shutdown path joins on it.
pub(crate) fn run(shared: Arc<BusShared>) {
    debug!("dispatch worker started");
    let mut state = WorkerState::Active;
    loop {
        match state {
            WorkerState::Active => match shared.queue.try_pop(shared.lock_timeout) {
                PopOutcome::Event(event) => dispatch(&shared, event),
                PopOutcome::Empty => state = WorkerState::Waiting,
                PopOutcome::LockTimeout => {
                    warn!("dispatch loop failed to acquire the queue guard");
                }
            },
            WorkerState::Waiting => {
                shared.wake.wait(shared.poll_interval);
                state = WorkerState::Active;
            }
            WorkerState::Exiting => break,
        }
        if shared.exit.load(Ordering::Acquire) {
            state = WorkerState::Exiting;
        }
    }

    // Final drain: everything still queued is dropped without dispatch.
    // Shutdown means "stop delivering", and no accepted event may leak.
    let leftover = shared.queue.drain();
    if !leftover.is_empty() {
        debug!(
            count = leftover.len(),
            "dropping undispatched events at shutdown"
        );
    }
    drop(leftover);
    debug!("dispatch worker exited");
}

/// One dispatch cycle: snapshot the handlers for the event's name and
/// invoke each in snapshot order. Concurrent subscribe/unsubscribe calls
/// affect only subsequent cycles. The event is dropped on every path.
fn dispatch(shared: &BusShared, event: Box<dyn BusEvent>) {
    match shared.registry.snapshot(event.name(), shared.lock_timeout) {
        Some(handlers) => {
            trace!(
                event = event.name(),
                handlers = handlers.len(),
                "dispatching event"
            );
            for handler in &handlers {
                handler.handle(event.as_ref());
            }
        }
        None => {
            error!(
                event = event.name(),
                "dropping event, registry guard timed out"
            );
        }
    }
}
