//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind loopback:0, accept loop)
//!     → connection.rs (connection id, open/closed accounting)
//!     → Hand off to http::handler
//! ```
//!
//! # Design Decisions
//! - The OS picks the port; callers read it back from the listener
//! - Connections are never reused once the response is written

pub mod connection;
pub mod listener;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionTracker};
pub use listener::{Listener, ListenerError};
