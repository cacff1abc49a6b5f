//! Typed application events published over the bus.
//!
//! Catalog of the event kinds the hub's collaborators exchange: the
//! station/network manager, the time-sync routine, the broker client,
//! and the status indicator. Each kind carries a fixed, globally unique
//! bus name and a documented dispatch rank (smaller ranks are dispatched
//! first). Payloads are serializable for logging.
//!
//! The bus itself has no knowledge of these kinds; any component may
//! define further events as long as names stay unique.

use std::any::Any;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::BusEvent;

/// Link state of the uplink interface changed.
///
/// Published by the network manager on association/loss. Most urgent
/// kind in the catalog: broker sessions, time sync, and the indicator
/// all key off the link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectivityChanged {
    /// Whether the hub currently holds a usable uplink.
    pub connected: bool,
    /// Wall-clock time the change was observed.
    pub at: DateTime<Utc>,
}

impl ConnectivityChanged {
    /// Bus name of this event kind.
    pub const NAME: &'static str = "net.connectivity";

    pub fn new(connected: bool) -> Self {
        Self {
            connected,
            at: Utc::now(),
        }
    }
}

impl BusEvent for ConnectivityChanged {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> i8 {
        0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Session state of the broker connection changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerSessionChanged {
    /// Whether a broker session is currently established.
    pub connected: bool,
    /// Wall-clock time the change was observed.
    pub at: DateTime<Utc>,
}

impl BrokerSessionChanged {
    /// Bus name of this event kind.
    pub const NAME: &'static str = "mqtt.session";

    pub fn new(connected: bool) -> Self {
        Self {
            connected,
            at: Utc::now(),
        }
    }
}

impl BusEvent for BrokerSessionChanged {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> i8 {
        5
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Wall clock was synchronized against an upstream time source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSynced {
    /// The synchronized wall-clock time.
    pub at: DateTime<Utc>,
}

impl TimeSynced {
    /// Bus name of this event kind.
    pub const NAME: &'static str = "time.synced";

    pub fn new() -> Self {
        Self { at: Utc::now() }
    }
}

impl Default for TimeSynced {
    fn default() -> Self {
        Self::new()
    }
}

impl BusEvent for TimeSynced {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> i8 {
        10
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Blink pattern shown by the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorPattern {
    /// Slow blink while the uplink is being established.
    Connecting,
    /// Steady on once the hub is fully up.
    Connected,
    /// Fast blink on a persistent fault.
    Fault,
    /// Indicator off.
    Off,
}

/// Request to change the status indicator pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorRequest {
    /// The pattern to show.
    pub pattern: IndicatorPattern,
    /// Wall-clock time of the request.
    pub at: DateTime<Utc>,
}

impl IndicatorRequest {
    /// Bus name of this event kind.
    pub const NAME: &'static str = "led.indicator";

    pub fn new(pattern: IndicatorPattern) -> Self {
        Self {
            pattern,
            at: Utc::now(),
        }
    }
}

impl BusEvent for IndicatorRequest {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> i8 {
        20
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The hub process finished its startup wiring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubStarted {
    /// Wall-clock startup time.
    pub at: DateTime<Utc>,
}

impl HubStarted {
    /// Bus name of this event kind.
    pub const NAME: &'static str = "hub.started";

    pub fn new() -> Self {
        Self { at: Utc::now() }
    }
}

impl Default for HubStarted {
    fn default() -> Self {
        Self::new()
    }
}

impl BusEvent for HubStarted {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> i8 {
        20
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_names_are_unique() {
        let names = [
            ConnectivityChanged::NAME,
            BrokerSessionChanged::NAME,
            TimeSynced::NAME,
            IndicatorRequest::NAME,
            HubStarted::NAME,
        ];
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn connectivity_outranks_the_rest_of_the_catalog() {
        let connectivity = ConnectivityChanged::new(true);
        let session = BrokerSessionChanged::new(true);
        let synced = TimeSynced::new();
        let indicator = IndicatorRequest::new(IndicatorPattern::Connected);

        // Smaller rank dispatches first.
        assert!(connectivity.priority() < session.priority());
        assert!(session.priority() < synced.priority());
        assert!(synced.priority() < indicator.priority());
    }

    #[test]
    fn payloads_downcast_through_as_any() {
        let event: Box<dyn BusEvent> = Box::new(ConnectivityChanged::new(true));
        let change = event
            .as_any()
            .downcast_ref::<ConnectivityChanged>()
            .expect("payload should downcast to its concrete type");
        assert!(change.connected);
    }

    #[test]
    fn payloads_serialize_for_logging() {
        let request = IndicatorRequest::new(IndicatorPattern::Fault);
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("Fault"));

        let parsed: IndicatorRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.pattern, IndicatorPattern::Fault);
    }
}
