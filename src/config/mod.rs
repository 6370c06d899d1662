//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or HarnessConfig::default()
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → HarnessConfig (validated, immutable)
//!     → ServerConfig to the listener/handler, ClientConfig to the driver
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; the binary runs on defaults alone
//! - The two timing knobs are exposed so tests can shrink them
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ClientConfig, HarnessConfig, ObservabilityConfig, ServerConfig, DEFAULT_MAX_HEAD_BYTES,
    DEFAULT_MAX_LINE_BYTES, DEFAULT_RETRY_DELAY, DEFAULT_STALL,
};
pub use validation::{validate_config, ValidationError};
