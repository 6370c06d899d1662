//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the harness.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long the request handler stalls before answering.
pub const DEFAULT_STALL: Duration = Duration::from_secs(2);

/// How long the driver waits after a completion before the next request.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Longest header line the request handler will buffer.
pub const DEFAULT_MAX_LINE_BYTES: usize = 8 * 1024;

/// Largest request head (all header lines together) the handler will read.
pub const DEFAULT_MAX_HEAD_BYTES: usize = 64 * 1024;

/// Root configuration for the harness.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HarnessConfig {
    /// Slow server settings.
    pub server: ServerConfig,

    /// Request cycle driver settings.
    pub client: ClientConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Server (listener + request handler) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address. Port 0 lets the OS pick an ephemeral port.
    pub bind_address: String,

    /// Stall before the response is written, in milliseconds.
    pub stall_ms: u64,

    /// Maximum length of a single request header line.
    pub max_line_bytes: usize,

    /// Maximum size of the whole request head, terminators included.
    pub max_head_bytes: usize,
}

impl ServerConfig {
    pub fn stall(&self) -> Duration {
        Duration::from_millis(self.stall_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:0".to_string(),
            stall_ms: DEFAULT_STALL.as_millis() as u64,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            max_head_bytes: DEFAULT_MAX_HEAD_BYTES,
        }
    }
}

/// Request cycle driver configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Target path every request is posted to.
    pub path: String,

    /// Delay between a completion and the next request, in milliseconds.
    pub retry_delay_ms: u64,

    /// Size of the chunks the payload is streamed in. Each chunk produces
    /// one upload progress event.
    pub upload_chunk_bytes: usize,
}

impl ClientConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            path: "/test/".to_string(),
            retry_delay_ms: DEFAULT_RETRY_DELAY.as_millis() as u64,
            upload_chunk_bytes: 16,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// Record counters through the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "debug".to_string(),
            metrics_enabled: true,
        }
    }
}
