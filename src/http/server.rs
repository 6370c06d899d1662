//! The slow, always-failing HTTP server.
//!
//! # Responsibilities
//! - Own the listener and its resolved port
//! - Run the accept loop until shutdown
//! - Hand each connection to the request handler and wait for it to close
//!   before accepting the next one

use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::config::ServerConfig;
use crate::http::handler::RequestHandler;
use crate::net::{ConnectionTracker, Listener, ListenerError};
use crate::observability::metrics;

/// Pause after a failed accept so a persistent error (e.g. EMFILE) does not
/// spin the loop.
pub const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

async fn back_off_after_accept_error(error: &ListenerError) {
    tracing::warn!(error = %error, "Accept failed");
    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
}

pub struct HarnessServer {
    listener: Listener,
    handler: RequestHandler,
    tracker: ConnectionTracker,
}

impl HarnessServer {
    /// Bind the listener. Failing here is a startup error.
    pub async fn bind(config: &ServerConfig) -> Result<Self, ListenerError> {
        let listener = Listener::bind(config).await?;
        Ok(Self {
            listener,
            handler: RequestHandler::new(config),
            tracker: ConnectionTracker::new(),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    /// Shared handle on the connection counters.
    pub fn tracker(&self) -> ConnectionTracker {
        self.tracker.clone()
    }

    /// Accept and serve connections until `shutdown` fires.
    ///
    /// A connection in progress is finished before the signal is observed.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(address = %self.local_addr(), "HTTP server starting");

        loop {
            let accepted = tokio::select! {
                accepted = self.listener.accept() => accepted,
                _ = shutdown.recv() => {
                    tracing::info!("HTTP server received shutdown signal");
                    break;
                }
            };

            let (stream, peer_addr) = match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    back_off_after_accept_error(&e).await;
                    continue;
                }
            };

            let guard = self.tracker.track();
            metrics::record_connection();

            match self.handler.handle(stream, guard.id()).await {
                Ok(report) => tracing::debug!(
                    connection_id = %guard.id(),
                    peer_addr = %peer_addr,
                    body_bytes = report.body_bytes,
                    "Request answered"
                ),
                Err(e) => tracing::warn!(
                    connection_id = %guard.id(),
                    peer_addr = %peer_addr,
                    error = %e,
                    "Connection failed"
                ),
            }
        }

        tracing::info!("HTTP server stopped");
    }
}
