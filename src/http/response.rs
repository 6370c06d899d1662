//! The fixed failure response.
//!
//! Every connection receives the same bytes: a 500 status line, three
//! headers, a blank line and no body.

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Response lines in wire order, without terminators.
pub const FAILURE_RESPONSE_LINES: [&str; 5] = [
    "HTTP/1.1 500 Internal Server Error",
    "X-HTTP-Reason: testing",
    "Content-Type: text/plain; charset=utf8",
    "Content-Length: 0",
    "",
];

/// The complete response as it appears on the wire.
pub fn failure_response_bytes() -> Vec<u8> {
    FAILURE_RESPONSE_LINES
        .iter()
        .flat_map(|line| line.bytes().chain(*b"\r\n"))
        .collect()
}

/// Write the failure response, flushing after every line.
pub async fn write_failure_response<W>(writer: &mut W) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    for line in FAILURE_RESPONSE_LINES {
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\r\n").await?;
        writer.flush().await?;
        tracing::debug!("S: {}", line);
    }
    Ok(())
}
