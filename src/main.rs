use std::sync::Arc;

use stall_harness::client::TracingObserver;
use stall_harness::config::HarnessConfig;
use stall_harness::lifecycle::{signals, Harness};
use stall_harness::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = HarnessConfig::default();

    logging::init_tracing(&config.observability);
    metrics::configure(&config.observability);

    tracing::info!(
        stall_ms = config.server.stall_ms,
        retry_delay_ms = config.client.retry_delay_ms,
        "stall-harness v0.1.0 starting"
    );

    let harness = Harness::start(&config, Arc::new(TracingObserver)).await?;
    tokio::spawn(signals::shutdown_on_ctrl_c(harness.shutdown_handle()));

    let cycles = harness.wait().await?;

    tracing::info!(cycles, "Shutdown complete");
    Ok(())
}
