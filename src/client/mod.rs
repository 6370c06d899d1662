//! Client side: the request cycle driver.
//!
//! # Data Flow
//! ```text
//! driver.rs
//!     → payload.rs (open read session over the constant form body)
//!     → reqwest POST /test/ (upload progress per streamed chunk)
//!     → response (download progress per received chunk)
//!     → progress.rs observer: on_completion
//!     → retry delay → next cycle
//! ```

pub mod driver;
pub mod endpoint;
pub mod payload;
pub mod progress;

pub use driver::{CycleError, CycleState, RequestCycleDriver};
pub use endpoint::Endpoint;
pub use payload::{Payload, PayloadError, FORM_CONTENT_TYPE, FORM_PAYLOAD};
pub use progress::{CycleObserver, CycleOutcome, ProgressKind, TracingObserver};
