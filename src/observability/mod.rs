//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Server and driver produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters via the `metrics` facade)
//! ```
//!
//! # Design Decisions
//! - Wire-level traffic is logged at debug as `C:` / `S:` lines
//! - No metrics exporter is installed; an embedding program may set a recorder

pub mod logging;
pub mod metrics;
