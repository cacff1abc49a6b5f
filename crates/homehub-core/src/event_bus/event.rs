//! Event and handler traits
//!
//! Defines the two seams of the bus: the event value producers hand over,
//! and the handler capability subscribers register.

use std::any::Any;

/// A named, prioritized occurrence broadcast through the bus.
///
/// Implementors must keep `name` globally unique per logical event kind;
/// the handler registry keys on it. Ownership of a published event
/// transfers to the bus when publish accepts it and stays with the bus
/// until the event is dropped after dispatch (or during the shutdown
/// drain). A rejected publish hands the event back inside the error.
pub trait BusEvent: Send {
    /// Globally unique name of this event kind.
    fn name(&self) -> &str;

    /// Dispatch rank. Among pending events, the smallest rank is
    /// dequeued first; see the queue ordering notes.
    fn priority(&self) -> i8;

    /// Access to the concrete payload for downcasting in handlers.
    fn as_any(&self) -> &dyn Any;
}

/// A capability that consumes events it is subscribed to.
///
/// The same handler instance may be registered under multiple event
/// names, and the registry deduplicates by instance identity. Handlers
/// run synchronously on the dispatch thread, one event at a time; a
/// handler that blocks stalls all subsequent dispatch, so long-running
/// work belongs on the handler's own worker, not in `handle`.
///
/// A handler must not panic across the dispatch boundary; the bus does
/// not catch unwinds.
pub trait EventHandler: Send + Sync {
    /// Consume one event.
    fn handle(&self, event: &dyn BusEvent);
}
