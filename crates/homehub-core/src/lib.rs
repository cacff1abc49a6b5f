//! # HomeHub Core
//!
//! Core types and utilities for HomeHub.
//! Provides the priority event bus, the event and handler abstractions,
//! and the typed application event catalog.

pub mod error;
pub mod event_bus;

pub use error::{PublishError, SubscribeError};

// Re-export event bus for convenience
pub use event_bus::{
    event_bus, init_event_bus, BrokerSessionChanged, BusEvent, ConnectivityChanged, EventBus,
    EventBusConfig, EventHandler, HubStarted, IndicatorPattern, IndicatorRequest, TimeSynced,
};
