//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Bind server → spawn accept loop → configure driver → spawn cycle loop
//!
//! Shutdown (shutdown.rs):
//!     Signal → accept loop and retry delay return → tasks joined
//!
//! Signals (signals.rs):
//!     SIGINT → trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: a bind failure or payload failure ends the process
//! - No exchange is cut short by shutdown

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Harness, HarnessError};
