//! Metrics collection.
//!
//! # Metrics
//! - `harness_connections_total` (counter): connections accepted by the server
//! - `harness_body_bytes_drained_total` (counter): request body bytes discarded
//! - `harness_cycles_total` (counter): completed client cycles, by `outcome`

use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::ObservabilityConfig;

static ENABLED: AtomicBool = AtomicBool::new(true);

/// Apply the observability config. Called once at startup.
pub fn configure(config: &ObservabilityConfig) {
    ENABLED.store(config.metrics_enabled, Ordering::Relaxed);
}

fn enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

pub fn record_connection() {
    if enabled() {
        ::metrics::counter!("harness_connections_total").increment(1);
    }
}

pub fn record_body_bytes(bytes: u64) {
    if enabled() {
        ::metrics::counter!("harness_body_bytes_drained_total").increment(bytes);
    }
}

pub fn record_cycle(outcome: &'static str) {
    if enabled() {
        ::metrics::counter!("harness_cycles_total", "outcome" => outcome).increment(1);
    }
}
