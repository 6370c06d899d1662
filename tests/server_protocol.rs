//! Wire-level tests against a running server.

use std::time::{Duration, Instant};

use stall_harness::http::response::failure_response_bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

mod common;

#[tokio::test]
async fn response_is_byte_identical_across_requests() {
    let server = common::start_server(&common::fast_config()).await;

    let requests: [&[u8]; 4] = [
        b"POST /test/ HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello",
        b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n",
        b"POST /x HTTP/1.1\r\nCONTENT-LENGTH: 3\r\nX-Other: y\r\n\r\nabc",
        b"POST /x HTTP/1.1\nX-Other: y\ncontent-length: 2\n\nok",
    ];
    for request in requests {
        let response = common::raw_exchange(server.addr, request).await;
        assert_eq!(response, failure_response_bytes());
    }

    assert_eq!(server.tracker.completed_count(), 4);
    server.stop().await;
}

#[tokio::test]
async fn response_lines_in_order() {
    let server = common::start_server(&common::fast_config()).await;
    let response = common::raw_exchange(server.addr, b"GET / HTTP/1.1\r\n\r\n").await;
    let text = String::from_utf8(response).unwrap();

    let lines: Vec<&str> = text.split("\r\n").collect();
    assert_eq!(
        lines,
        vec![
            "HTTP/1.1 500 Internal Server Error",
            "X-HTTP-Reason: testing",
            "Content-Type: text/plain; charset=utf8",
            "Content-Length: 0",
            "",
            "",
        ]
    );
    server.stop().await;
}

#[tokio::test]
async fn zero_length_proceeds_straight_to_response() {
    let server = common::start_server(&common::fast_config()).await;

    let started = Instant::now();
    let response = common::raw_exchange(
        server.addr,
        b"POST /test/ HTTP/1.1\r\nContent-Length: 0\r\n\r\n",
    )
    .await;

    assert_eq!(response, failure_response_bytes());
    assert!(started.elapsed() >= common::STALL);
    server.stop().await;
}

#[tokio::test]
async fn non_numeric_length_is_treated_as_zero() {
    let server = common::start_server(&common::fast_config()).await;
    let response = common::raw_exchange(
        server.addr,
        b"POST /test/ HTTP/1.1\r\nContent-Length: abc\r\n\r\n",
    )
    .await;
    assert_eq!(response, failure_response_bytes());
    server.stop().await;
}

#[tokio::test]
async fn waits_for_the_whole_declared_body() {
    let server = common::start_server(&common::fast_config()).await;
    let mut conn = TcpStream::connect(server.addr).await.unwrap();

    conn.write_all(b"POST /test/ HTTP/1.1\r\nContent-Length: 10\r\n\r\n01234")
        .await
        .unwrap();

    // Half the body: the server must still be draining, not responding.
    let mut first_byte = [0u8; 1];
    let early = tokio::time::timeout(common::STALL * 3, conn.read(&mut first_byte)).await;
    assert!(early.is_err(), "server answered before the body was complete");

    conn.write_all(b"56789").await.unwrap();
    let mut response = Vec::new();
    conn.read_to_end(&mut response).await.unwrap();
    assert_eq!(response, failure_response_bytes());

    server.stop().await;
}

#[tokio::test]
async fn header_split_across_writes_is_not_lost() {
    let server = common::start_server(&common::fast_config()).await;
    let mut conn = TcpStream::connect(server.addr).await.unwrap();

    conn.write_all(b"POST /test/ HTTP/1.1\r\nConte").await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    conn.write_all(b"nt-Length: 4\r").await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    conn.write_all(b"\n\r\nbody").await.unwrap();

    let mut response = Vec::new();
    conn.read_to_end(&mut response).await.unwrap();
    assert_eq!(response, failure_response_bytes());
    server.stop().await;
}

#[tokio::test]
async fn overlong_header_line_drops_connection() {
    let mut config = common::fast_config();
    config.server.max_line_bytes = 32;
    let server = common::start_server(&config).await;

    let mut request = b"GET / HTTP/1.1\r\nX-Long: ".to_vec();
    request.extend(std::iter::repeat(b'a').take(64));
    request.extend_from_slice(b"\r\n\r\n");

    let mut conn = TcpStream::connect(server.addr).await.unwrap();
    conn.write_all(&request).await.unwrap();
    let mut response = Vec::new();
    // Closed with unread input, the peer may see a reset instead of EOF.
    let _ = conn.read_to_end(&mut response).await;
    assert!(response.is_empty());

    // The server keeps accepting afterwards.
    let response = common::raw_exchange(server.addr, b"GET / HTTP/1.1\r\n\r\n").await;
    assert_eq!(response, failure_response_bytes());
    server.stop().await;
}
