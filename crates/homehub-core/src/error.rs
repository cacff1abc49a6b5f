//! Error handling for HomeHub core.
//!
//! Provides the error types reported by the event bus:
//! - Publish errors (queue capacity, guard timeout, shut-down bus)
//! - Subscribe/unsubscribe errors (invalid name, guard timeout)
//!
//! All error types use `thiserror` for ergonomic error handling. Publish
//! errors hand the rejected event back to the caller, so the event has
//! exactly one owner on every exit path.

use std::fmt;

use thiserror::Error;

use crate::event_bus::BusEvent;

/// Error returned when an event is not accepted into the queue.
///
/// Every variant carries the rejected event; ownership returns to the
/// caller, which is responsible for disposing of it.
#[derive(Error)]
pub enum PublishError {
    /// The queue is at its configured capacity.
    #[error("event queue is full")]
    Full(Box<dyn BusEvent>),

    /// The queue guard could not be acquired within the lock-timeout budget.
    #[error("timed out acquiring the event queue guard")]
    LockTimeout(Box<dyn BusEvent>),

    /// Shutdown has begun; the bus no longer accepts events.
    #[error("event bus is shut down")]
    Closed(Box<dyn BusEvent>),
}

impl PublishError {
    /// The rejected event.
    pub fn event(&self) -> &dyn BusEvent {
        match self {
            PublishError::Full(ev) | PublishError::LockTimeout(ev) | PublishError::Closed(ev) => {
                ev.as_ref()
            }
        }
    }

    /// Recover ownership of the rejected event.
    pub fn into_event(self) -> Box<dyn BusEvent> {
        match self {
            PublishError::Full(ev) | PublishError::LockTimeout(ev) | PublishError::Closed(ev) => ev,
        }
    }
}

impl fmt::Debug for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (variant, ev) = match self {
            PublishError::Full(ev) => ("Full", ev),
            PublishError::LockTimeout(ev) => ("LockTimeout", ev),
            PublishError::Closed(ev) => ("Closed", ev),
        };
        f.debug_struct(variant)
            .field("event", &ev.name())
            .field("priority", &ev.priority())
            .finish()
    }
}

/// Error returned by subscribe and unsubscribe.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeError {
    /// The event name is empty.
    #[error("event name must not be empty")]
    InvalidName,

    /// The registry guard could not be acquired within the lock-timeout budget.
    #[error("timed out acquiring the handler registry guard")]
    LockTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    struct Probe;

    impl BusEvent for Probe {
        fn name(&self) -> &str {
            "test.probe"
        }

        fn priority(&self) -> i8 {
            7
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn publish_error_returns_the_event() {
        let err = PublishError::Full(Box::new(Probe));
        assert_eq!(err.event().name(), "test.probe");

        let event = err.into_event();
        assert_eq!(event.priority(), 7);
    }

    #[test]
    fn publish_error_debug_names_the_event() {
        let err = PublishError::Closed(Box::new(Probe));
        let rendered = format!("{:?}", err);
        assert!(rendered.contains("Closed"));
        assert!(rendered.contains("test.probe"));
    }

    #[test]
    fn subscribe_error_display() {
        assert_eq!(
            SubscribeError::InvalidName.to_string(),
            "event name must not be empty"
        );
    }
}
