//! Request cycle driver.
//!
//! # State Machine
//! ```text
//! Idle → Sending → AwaitingCompletion → Delaying → Idle → ...
//! ```
//!
//! `run` is a single loop that awaits each exchange to completion before
//! starting the retry delay, so two requests can never be in flight at
//! once. The delay is the only point where shutdown is observed.

use std::sync::Arc;

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client};
use thiserror::Error;
use tokio::sync::broadcast;
use url::Url;

use crate::client::endpoint::Endpoint;
use crate::client::payload::{Payload, PayloadBody, PayloadError, FORM_CONTENT_TYPE};
use crate::client::progress::{CycleObserver, CycleOutcome, ProgressKind};
use crate::config::ClientConfig;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("no endpoint configured")]
    NotConfigured,

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("cannot open payload: {0}")]
    Payload(#[from] PayloadError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    /// Request written, waiting for the response head.
    Sending,
    /// Response head received, reading the body.
    AwaitingCompletion,
    /// Between a completion and the next request.
    Delaying,
}

pub struct RequestCycleDriver {
    client: Client,
    config: ClientConfig,
    endpoint: Option<Endpoint>,
    payload: Payload,
    observer: Arc<dyn CycleObserver>,
    state: CycleState,
    cycles: u64,
}

impl RequestCycleDriver {
    pub fn new(config: ClientConfig, observer: Arc<dyn CycleObserver>) -> Result<Self, CycleError> {
        // One connection per exchange; the server closes after answering.
        let client = Client::builder()
            .pool_max_idle_per_host(0)
            .no_proxy()
            .build()
            .map_err(CycleError::Client)?;

        Ok(Self {
            client,
            config,
            endpoint: None,
            payload: Payload::form(),
            observer,
            state: CycleState::Idle,
            cycles: 0,
        })
    }

    /// Address all future requests to `endpoint`.
    pub fn configure(&mut self, endpoint: Endpoint) {
        tracing::debug!(endpoint = %endpoint, "Driver configured");
        self.endpoint = Some(endpoint);
    }

    pub fn endpoint(&self) -> Option<Endpoint> {
        self.endpoint
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Cycles started so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Send one request and wait for the exchange to finish.
    ///
    /// Network failures are not errors here: they complete the cycle with
    /// [`CycleOutcome::Failed`]. Only broken local preconditions return `Err`.
    pub async fn start_cycle(&mut self) -> Result<CycleOutcome, CycleError> {
        let endpoint = self.endpoint.ok_or(CycleError::NotConfigured)?;
        let url = endpoint.url(&self.config.path)?;
        let body = self.payload.open()?;

        self.cycles += 1;
        let cycle = self.cycles;
        self.state = CycleState::Sending;
        self.observer.on_cycle_start(cycle);

        let outcome = self.exchange(url, body).await;

        self.payload.close();
        self.state = CycleState::Idle;
        metrics::record_cycle(outcome.label());
        self.observer.on_completion(cycle, &outcome);
        Ok(outcome)
    }

    async fn exchange(&mut self, url: Url, body: PayloadBody) -> CycleOutcome {
        let stream = body.into_stream(self.config.upload_chunk_bytes, Arc::clone(&self.observer));
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(CONTENT_LENGTH, body.len())
            .body(Body::wrap_stream(stream));

        let mut response = match request.send().await {
            Ok(response) => response,
            Err(e) => return CycleOutcome::Failed { error: e.to_string() },
        };

        self.state = CycleState::AwaitingCompletion;
        let status = response.status().as_u16();
        let total = response.content_length();
        let mut received = 0u64;
        self.observer.on_progress(ProgressKind::Download, received, total);

        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    received += chunk.len() as u64;
                    self.observer.on_progress(ProgressKind::Download, received, total);
                }
                Ok(None) => break,
                Err(e) => return CycleOutcome::Failed { error: e.to_string() },
            }
        }

        CycleOutcome::Responded {
            status,
            body_bytes: received,
        }
    }

    /// Cycle forever: request, completion, delay, repeat.
    ///
    /// Returns the number of cycles run once `shutdown` fires, or the first
    /// precondition failure.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> Result<u64, CycleError> {
        let delay = self.config.retry_delay();
        loop {
            self.start_cycle().await?;

            self.state = CycleState::Delaying;
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.recv() => {
                    tracing::info!(cycles = self.cycles, "Driver received shutdown signal");
                    break;
                }
            }
            self.state = CycleState::Idle;
        }

        self.state = CycleState::Idle;
        Ok(self.cycles)
    }
}
