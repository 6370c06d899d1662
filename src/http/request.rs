//! Request head parsing and body draining.
//!
//! # Responsibilities
//! - Split the inbound byte stream into lines without ever dropping a
//!   partially received line
//! - Collect the header block up to the first blank line
//! - Extract the declared body length (`Content-Length`) leniently
//! - Consume exactly the declared number of body bytes
//!
//! # Design Decisions
//! - `LineBuffer` is a pure state machine over a growable buffer; the only
//!   suspension point is "no complete line buffered yet"
//! - A line longer than the line cap, or a head larger than the head cap,
//!   fails the connection instead of growing memory without bound
//! - A missing or unparsable `Content-Length` means zero; it never fails

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

const CONTENT_LENGTH_PREFIX: &[u8] = b"Content-Length:";
const SCRATCH_BYTES: usize = 4096;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("connection closed by peer before the request was complete")]
    Closed,

    #[error("header line exceeds {limit} bytes")]
    LineTooLong { limit: usize },

    #[error("request head exceeds {limit} bytes")]
    HeadTooLarge { limit: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Growable byte buffer that hands out complete lines.
#[derive(Debug)]
pub struct LineBuffer {
    buf: Vec<u8>,
    max_line_bytes: usize,
    taken: usize,
}

impl LineBuffer {
    pub fn new(max_line_bytes: usize) -> Self {
        Self {
            buf: Vec::new(),
            max_line_bytes,
            taken: 0,
        }
    }

    /// Raw bytes handed out as lines so far, terminators included.
    pub fn taken(&self) -> usize {
        self.taken
    }

    /// Append freshly received bytes.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Number of bytes received but not yet handed out.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Take the next complete line with trailing whitespace (and the line
    /// terminator) removed.
    ///
    /// The cap applies to the line content: `\r\n` and `\n` terminators are
    /// not counted. Returns `Ok(None)` while no terminator has been received.
    pub fn next_line(&mut self) -> Result<Option<Vec<u8>>, RequestError> {
        match self.buf.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                let content = if pos > 0 && self.buf[pos - 1] == b'\r' {
                    pos - 1
                } else {
                    pos
                };
                if content > self.max_line_bytes {
                    return Err(self.line_too_long());
                }
                let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
                self.taken += line.len();
                let trimmed = line.trim_ascii_end().len();
                line.truncate(trimmed);
                Ok(Some(line))
            }
            // One extra byte may be the `\r` of a terminator still in transit.
            None if self.buf.len() > self.max_line_bytes + 1 => Err(self.line_too_long()),
            None => Ok(None),
        }
    }

    fn line_too_long(&self) -> RequestError {
        RequestError::LineTooLong {
            limit: self.max_line_bytes,
        }
    }

    /// Discard up to `max` buffered bytes, returning how many were taken.
    pub fn consume(&mut self, max: u64) -> u64 {
        let n = (self.buf.len() as u64).min(max) as usize;
        self.buf.drain(..n);
        n as u64
    }
}

/// If `line` is a `Content-Length` header (any casing), the declared length.
///
/// Anything after the colon that is not a base-10 `u64` counts as zero.
pub fn parse_content_length(line: &[u8]) -> Option<u64> {
    if line.len() < CONTENT_LENGTH_PREFIX.len()
        || !line[..CONTENT_LENGTH_PREFIX.len()].eq_ignore_ascii_case(CONTENT_LENGTH_PREFIX)
    {
        return None;
    }

    let value = std::str::from_utf8(&line[CONTENT_LENGTH_PREFIX.len()..])
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0);
    Some(value)
}

/// The header block of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHead {
    /// Every line before the blank terminator, request line first.
    pub lines: Vec<String>,
    /// Declared body length; 0 if absent or unparsable.
    pub content_length: u64,
}

impl RequestHead {
    pub fn request_line(&self) -> Option<&str> {
        self.lines.first().map(String::as_str)
    }
}

/// Reads one request off a stream.
pub struct RequestReader<R> {
    stream: R,
    lines: LineBuffer,
    max_head_bytes: usize,
}

impl<R: AsyncRead + Unpin> RequestReader<R> {
    pub fn new(stream: R, max_line_bytes: usize, max_head_bytes: usize) -> Self {
        Self {
            stream,
            lines: LineBuffer::new(max_line_bytes),
            max_head_bytes,
        }
    }

    /// Wait until a complete line is available and return it.
    pub async fn read_line(&mut self) -> Result<Vec<u8>, RequestError> {
        let mut scratch = [0u8; SCRATCH_BYTES];
        loop {
            if let Some(line) = self.lines.next_line()? {
                return Ok(line);
            }
            let n = self.stream.read(&mut scratch).await?;
            if n == 0 {
                return Err(RequestError::Closed);
            }
            self.lines.extend(&scratch[..n]);
        }
    }

    /// Read lines up to and including the first blank one.
    pub async fn read_head(&mut self) -> Result<RequestHead, RequestError> {
        let mut head = RequestHead::default();
        loop {
            let line = self.read_line().await?;
            if self.lines.taken() > self.max_head_bytes {
                return Err(RequestError::HeadTooLarge {
                    limit: self.max_head_bytes,
                });
            }
            tracing::debug!("C: {}", String::from_utf8_lossy(&line));
            if line.is_empty() {
                return Ok(head);
            }
            if let Some(len) = parse_content_length(&line) {
                if len == 0 {
                    tracing::debug!(header = %String::from_utf8_lossy(&line), "Content-Length treated as 0");
                }
                head.content_length = len;
            }
            head.lines.push(String::from_utf8_lossy(&line).into_owned());
        }
    }

    /// Consume exactly `len` body bytes, already-buffered ones first.
    pub async fn drain_body(&mut self, len: u64) -> Result<u64, RequestError> {
        let mut remaining = len - self.lines.consume(len);
        let mut scratch = [0u8; SCRATCH_BYTES];
        while remaining > 0 {
            let want = remaining.min(SCRATCH_BYTES as u64) as usize;
            let n = self.stream.read(&mut scratch[..want]).await?;
            if n == 0 {
                return Err(RequestError::Closed);
            }
            remaining -= n as u64;
        }
        Ok(len)
    }

    /// Bytes received past what has been parsed so far.
    pub fn buffered(&self) -> usize {
        self.lines.buffered()
    }

    pub fn into_inner(self) -> R {
        self.stream
    }
}
