use std::sync::Arc;

use homehub::handlers::{ConnectivityTracker, EventLogger};
use homehub::init_logging;
use homehub_core::{
    BrokerSessionChanged, ConnectivityChanged, EventBus, EventBusConfig, HubStarted,
    IndicatorRequest, TimeSynced,
};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logging()?;
    info!(
        version = homehub::VERSION,
        built = homehub::BUILD_DATE,
        "starting homehub"
    );

    // The bus is constructed here and handed to whoever needs it; there
    // is no implicit first-use initialization in the daemon.
    let bus = Arc::new(EventBus::with_config(EventBusConfig {
        worker_name: "homehub-bus".to_string(),
        ..EventBusConfig::default()
    }));

    let logger = Arc::new(EventLogger);
    for name in [
        ConnectivityChanged::NAME,
        BrokerSessionChanged::NAME,
        TimeSynced::NAME,
        IndicatorRequest::NAME,
        HubStarted::NAME,
    ] {
        bus.subscribe(name, logger.clone())?;
    }

    let tracker = Arc::new(ConnectivityTracker::default());
    bus.subscribe(ConnectivityChanged::NAME, tracker.clone())?;

    // Rejections are logged by the bus itself.
    let _ = bus.publish(Box::new(HubStarted::new()));

    tokio::signal::ctrl_c().await?;
    info!(uplink = tracker.is_connected(), "shutdown requested");
    bus.shutdown();

    Ok(())
}
