//! Progress and completion callbacks.
//!
//! Observers are purely diagnostic: the driver never looks at what they do
//! and never branches on the outcome it hands them.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressKind {
    Upload,
    Download,
}

impl fmt::Display for ProgressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressKind::Upload => write!(f, "upload"),
            ProgressKind::Download => write!(f, "download"),
        }
    }
}

/// How one exchange ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The server answered; the status is whatever it sent.
    Responded { status: u16, body_bytes: u64 },
    /// The exchange failed at the transport level.
    Failed { error: String },
}

impl CycleOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            CycleOutcome::Responded { .. } => "responded",
            CycleOutcome::Failed { .. } => "failed",
        }
    }
}

pub trait CycleObserver: Send + Sync + 'static {
    /// A new request is about to be sent.
    fn on_cycle_start(&self, _cycle: u64) {}

    /// Bytes moved so far. `total` is `None` when the peer did not say.
    fn on_progress(&self, kind: ProgressKind, transferred: u64, total: Option<u64>);

    /// Called exactly once per cycle, success or not.
    fn on_completion(&self, cycle: u64, outcome: &CycleOutcome);
}

/// Total as it appears in the progress log: `-1` when unknown.
pub fn logged_total(total: Option<u64>) -> i64 {
    total.map_or(-1, |t| i64::try_from(t).unwrap_or(i64::MAX))
}

/// Logs every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CycleObserver for TracingObserver {
    fn on_cycle_start(&self, cycle: u64) {
        tracing::debug!("--");
        tracing::debug!(cycle, "new request");
    }

    fn on_progress(&self, kind: ProgressKind, transferred: u64, total: Option<u64>) {
        tracing::debug!("{} progress {} / {}", kind, transferred, logged_total(total));
    }

    fn on_completion(&self, cycle: u64, outcome: &CycleOutcome) {
        match outcome {
            CycleOutcome::Responded { status, body_bytes } => {
                tracing::debug!(cycle, status, body_bytes, "finished")
            }
            CycleOutcome::Failed { error } => {
                tracing::debug!(cycle, error = %error, "finished")
            }
        }
    }
}
