//! Per-connection request handler.
//!
//! # State Machine
//! ```text
//! ReadingHeaders → DrainingBody (only if Content-Length > 0) → Stalling
//!     → WritingResponse → Closed
//! ```
//!
//! Header bytes are fully consumed before body bytes, and body bytes before
//! any response byte is written. Transport errors end the connection and are
//! returned to the caller; nothing is retried here.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::config::ServerConfig;
use crate::http::request::{RequestError, RequestHead, RequestReader};
use crate::http::response::write_failure_response;
use crate::net::ConnectionId;
use crate::observability::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerState {
    ReadingHeaders,
    DrainingBody,
    Stalling,
    WritingResponse,
    Closed,
}

/// What a handler saw on one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerReport {
    pub head: RequestHead,
    pub body_bytes: u64,
    /// States visited, in order.
    pub states: Vec<HandlerState>,
}

/// Answers every request with the fixed 500 after a stall.
#[derive(Debug, Clone)]
pub struct RequestHandler {
    stall: Duration,
    max_line_bytes: usize,
    max_head_bytes: usize,
}

impl RequestHandler {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            stall: config.stall(),
            max_line_bytes: config.max_line_bytes,
            max_head_bytes: config.max_head_bytes,
        }
    }

    pub fn stall(&self) -> Duration {
        self.stall
    }

    /// Run one connection from first header byte to close.
    pub async fn handle<S>(&self, stream: S, id: ConnectionId) -> Result<HandlerReport, RequestError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut states = Vec::with_capacity(5);
        let mut enter = |state: HandlerState| {
            tracing::trace!(connection_id = %id, ?state, "Handler state");
            states.push(state);
        };

        enter(HandlerState::ReadingHeaders);
        let mut reader = RequestReader::new(stream, self.max_line_bytes, self.max_head_bytes);
        let head = reader.read_head().await?;

        let mut body_bytes = 0;
        if head.content_length > 0 {
            enter(HandlerState::DrainingBody);
            tracing::debug!(
                "C: ({} additional bytes from request body)",
                head.content_length
            );
            body_bytes = reader.drain_body(head.content_length).await?;
            metrics::record_body_bytes(body_bytes);
        }

        enter(HandlerState::Stalling);
        tokio::time::sleep(self.stall).await;

        enter(HandlerState::WritingResponse);
        let mut stream = reader.into_inner();
        write_failure_response(&mut stream).await?;

        enter(HandlerState::Closed);
        stream.shutdown().await?;

        Ok(HandlerReport {
            head,
            body_bytes,
            states,
        })
    }
}
