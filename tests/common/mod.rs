//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use stall_harness::client::{CycleObserver, CycleOutcome, ProgressKind};
use stall_harness::config::HarnessConfig;
use stall_harness::http::HarnessServer;
use stall_harness::lifecycle::Shutdown;
use stall_harness::net::ConnectionTracker;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

pub const STALL: Duration = Duration::from_millis(100);
pub const RETRY_DELAY: Duration = Duration::from_millis(150);

/// Defaults with the two timing knobs shortened.
pub fn fast_config() -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.server.stall_ms = STALL.as_millis() as u64;
    config.client.retry_delay_ms = RETRY_DELAY.as_millis() as u64;
    config
}

pub struct RunningServer {
    pub addr: SocketAddr,
    pub tracker: ConnectionTracker,
    pub shutdown: Shutdown,
    pub task: JoinHandle<()>,
}

impl RunningServer {
    pub async fn stop(self) {
        self.shutdown.trigger();
        self.task.await.unwrap();
    }
}

/// Bind a server on an ephemeral port and run it in the background.
pub async fn start_server(config: &HarnessConfig) -> RunningServer {
    let server = HarnessServer::bind(&config.server).await.unwrap();
    let addr = server.local_addr();
    let tracker = server.tracker();
    let shutdown = Shutdown::new();
    let task = tokio::spawn(server.run(shutdown.subscribe()));
    RunningServer {
        addr,
        tracker,
        shutdown,
        task,
    }
}

/// Write raw request bytes and read until the server closes.
pub async fn raw_exchange(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut conn = TcpStream::connect(addr).await.unwrap();
    conn.write_all(request).await.unwrap();
    let mut response = Vec::new();
    conn.read_to_end(&mut response).await.unwrap();
    response
}

/// Accept one connection, read the whole request, answer with `response`
/// verbatim and close.
pub async fn serve_once(response: &'static [u8]) -> (SocketAddr, JoinHandle<Vec<u8>>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let task = tokio::spawn(async move {
        let (mut conn, _) = listener.accept().await.unwrap();
        let request = read_request(&mut conn).await;
        conn.write_all(response).await.unwrap();
        conn.shutdown().await.unwrap();
        request
    });
    (addr, task)
}

/// Read a request head plus as many body bytes as its Content-Length names.
async fn read_request(conn: &mut TcpStream) -> Vec<u8> {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if request.len() >= end + 4 + length {
                return request;
            }
        }
        let n = conn.read(&mut buf).await.unwrap();
        assert!(n > 0, "client closed before the request was complete");
        request.extend_from_slice(&buf[..n]);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Start(u64),
    Progress(ProgressKind, u64, Option<u64>),
    Completion(u64, CycleOutcome),
}

/// Observer that timestamps every callback.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<(Instant, Event)>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<(Instant, Event)> {
        self.events.lock().unwrap().clone()
    }

    pub fn completions(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, e)| matches!(e, Event::Completion(..)))
            .count()
    }

    /// Poll until `n` completions have been recorded.
    pub async fn wait_for_completions(&self, n: usize, timeout: Duration) {
        let deadline = Instant::now() + timeout;
        while self.completions() < n {
            assert!(Instant::now() < deadline, "timed out waiting for {} completions", n);
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push((Instant::now(), event));
    }
}

impl CycleObserver for RecordingObserver {
    fn on_cycle_start(&self, cycle: u64) {
        self.push(Event::Start(cycle));
    }

    fn on_progress(&self, kind: ProgressKind, transferred: u64, total: Option<u64>) {
        self.push(Event::Progress(kind, transferred, total));
    }

    fn on_completion(&self, cycle: u64, outcome: &CycleOutcome) {
        self.push(Event::Completion(cycle, outcome.clone()));
    }
}
