//! # HomeHub
//!
//! A smart-home hub daemon built around a bounded, priority-ordered
//! event bus with a dedicated dispatch thread.
//!
//! ## Architecture
//!
//! HomeHub is organized as a workspace:
//!
//! 1. **homehub-core** - Priority event bus, event/handler traits, typed
//!    event catalog, error types
//! 2. **homehub** - Main binary wiring logging, the bus instance, and
//!    the boundary handlers
//!
//! Collaborators (network manager, broker client, time sync, status
//! indicator) interact with the hub only as event producers or as the
//! reason handlers exist; the bus has no knowledge of what they are.

pub mod handlers;

pub use homehub_core::{
    event_bus, init_event_bus, BrokerSessionChanged, BusEvent, ConnectivityChanged, EventBus,
    EventBusConfig, EventHandler, HubStarted, IndicatorPattern, IndicatorRequest, PublishError,
    SubscribeError, TimeSynced,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
/// - Thread ids and names (the dispatch worker logs under its own name)
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
