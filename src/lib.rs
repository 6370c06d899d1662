//! Slow, always-failing HTTP server plus a client that keeps hitting it.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────── one process ────────────────────────┐
//!   │                                                              │
//!   │  client::driver ──POST /test/──▶ net::listener               │
//!   │     ▲    │                          │                        │
//!   │     │    │ progress                 ▼                        │
//!   │     │    ▼                       http::handler               │
//!   │     │  observer                  read head → drain body      │
//!   │     │    │                        → stall → 500 → close      │
//!   │     └────┴── delay ◀── completion ◀──┘                       │
//!   │                                                              │
//!   │  config · lifecycle (startup/shutdown) · observability       │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The server never answers with anything but `500 Internal Server Error`;
//! the driver never looks at the status. What is exercised is the timing:
//! a fixed stall on the server, a fixed delay between client requests.

pub mod client;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use client::{CycleObserver, CycleOutcome, Endpoint, ProgressKind, RequestCycleDriver};
pub use config::HarnessConfig;
pub use http::HarnessServer;
pub use lifecycle::{Harness, Shutdown};
