//! HTTP protocol handling subsystem (server side).
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (accept loop, one connection at a time)
//!     → handler.rs (per-connection state machine)
//!         → request.rs (line scan, Content-Length, body drain)
//!         → stall
//!         → response.rs (fixed 500, flushed line by line)
//!     → close
//! ```

pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use handler::{HandlerReport, HandlerState, RequestHandler};
pub use request::{RequestError, RequestHead};
pub use server::HarnessServer;
