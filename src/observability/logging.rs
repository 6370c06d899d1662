//! Structured logging.
//!
//! Uses `tracing` with an `EnvFilter`; `RUST_LOG` wins over the configured
//! default level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Default filter directive for the configured level.
pub fn default_directive(config: &ObservabilityConfig) -> String {
    format!("stall_harness={}", config.log_level)
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
