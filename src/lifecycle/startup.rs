//! Startup orchestration.
//!
//! Order: bind the server (fatal on failure), start its accept loop,
//! build the driver, point it at the resolved port, start the first cycle.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::client::{CycleError, CycleObserver, Endpoint, RequestCycleDriver};
use crate::config::HarnessConfig;
use crate::http::HarnessServer;
use crate::lifecycle::Shutdown;
use crate::net::{ConnectionTracker, ListenerError};

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("server startup failed: {0}")]
    Listener(#[from] ListenerError),

    #[error("driver failed: {0}")]
    Driver(#[from] CycleError),

    #[error("task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A running server and driver pair.
pub struct Harness {
    server_addr: SocketAddr,
    tracker: ConnectionTracker,
    shutdown: Shutdown,
    server: JoinHandle<()>,
    driver: JoinHandle<Result<u64, CycleError>>,
}

impl Harness {
    pub async fn start(
        config: &HarnessConfig,
        observer: Arc<dyn CycleObserver>,
    ) -> Result<Self, HarnessError> {
        let shutdown = Shutdown::new();

        let server = HarnessServer::bind(&config.server).await?;
        let server_addr = server.local_addr();
        let tracker = server.tracker();
        tracing::info!(port = server_addr.port(), "HTTP server is listening");

        let mut driver = RequestCycleDriver::new(config.client.clone(), observer)?;
        driver.configure(Endpoint::from(server_addr));

        let server = tokio::spawn(server.run(shutdown.subscribe()));
        let driver = tokio::spawn(driver.run(shutdown.subscribe()));

        Ok(Self {
            server_addr,
            tracker,
            shutdown,
            server,
            driver,
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    pub fn tracker(&self) -> ConnectionTracker {
        self.tracker.clone()
    }

    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Wait for the driver to stop, then stop the server.
    ///
    /// Returns the number of cycles the driver ran.
    pub async fn wait(self) -> Result<u64, HarnessError> {
        let cycles = self.driver.await?;
        self.shutdown.trigger();
        self.server.await?;
        Ok(cycles?)
    }

    /// Signal both loops and wait for them.
    pub async fn stop(self) -> Result<u64, HarnessError> {
        self.shutdown.trigger();
        self.wait().await
    }
}
