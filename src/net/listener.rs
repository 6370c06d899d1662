//! TCP listener for the slow server.
//!
//! # Responsibilities
//! - Bind to a loopback address on an OS-assigned port
//! - Expose the resolved port to the client side
//! - Accept incoming TCP connections

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};

use crate::config::ServerConfig;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("Failed to bind: {0}")]
    Bind(std::io::Error),
    /// Failed to accept connection.
    #[error("Failed to accept: {0}")]
    Accept(std::io::Error),
}

/// The single listening endpoint of a server instance.
pub struct Listener {
    inner: TcpListener,
    local_addr: SocketAddr,
}

impl Listener {
    /// Bind to the configured address.
    ///
    /// The port is resolved once here and stays fixed for the lifetime of
    /// the listener.
    pub async fn bind(config: &ServerConfig) -> Result<Self, ListenerError> {
        let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
            ListenerError::Bind(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
        })?;

        let inner = TcpListener::bind(addr).await.map_err(ListenerError::Bind)?;
        let local_addr = inner.local_addr().map_err(ListenerError::Bind)?;

        tracing::info!(address = %local_addr, "Listener bound");

        Ok(Self { inner, local_addr })
    }

    /// Accept the next inbound connection.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr), ListenerError> {
        let (stream, addr) = self.inner.accept().await.map_err(ListenerError::Accept)?;
        tracing::debug!(peer_addr = %addr, "Connection accepted");
        Ok((stream, addr))
    }

    /// The address this listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The OS-assigned port.
    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }
}
