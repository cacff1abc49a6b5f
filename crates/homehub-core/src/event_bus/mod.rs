//! # Event Bus Module
//!
//! Bounded, priority-ordered publish/subscribe for decoupled
//! communication between hub components, with a dedicated dispatch
//! thread and an explicit shutdown/drain protocol.
//!
//! ## Overview
//!
//! - Producers publish owned events; acceptance is bounded by the queue
//!   capacity and a lock-timeout budget, never by blocking
//! - Pending events dequeue smallest rank first, FIFO within a rank
//! - One dispatch cycle at a time: the worker snapshots the handlers
//!   registered for the event's name and invokes them synchronously
//! - Shutdown stops delivery, drains the queue, and joins the worker
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use homehub_core::event_bus::{ConnectivityChanged, EventBus, EventHandler};
//!
//! let bus = EventBus::new();
//!
//! struct LinkWatcher;
//! impl EventHandler for LinkWatcher {
//!     fn handle(&self, event: &dyn homehub_core::event_bus::BusEvent) {
//!         if let Some(change) = event.as_any().downcast_ref::<ConnectivityChanged>() {
//!             println!("uplink: {}", change.connected);
//!         }
//!     }
//! }
//!
//! bus.subscribe(ConnectivityChanged::NAME, Arc::new(LinkWatcher))?;
//! bus.publish(Box::new(ConnectivityChanged::new(true)))?;
//!
//! bus.shutdown();
//! ```

mod bus;
mod event;
mod events;
mod queue;
mod registry;
mod worker;

pub use bus::{event_bus, init_event_bus, EventBus, EventBusConfig};
pub use event::{BusEvent, EventHandler};
pub use events::{
    BrokerSessionChanged, ConnectivityChanged, HubStarted, IndicatorPattern, IndicatorRequest,
    TimeSynced,
};
