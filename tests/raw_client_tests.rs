// File: raw_client_tests.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

//! Wire-level tests against a raw TCP capture server.
//!
//! The engine's contract is byte-literal emission; these tests read the
//! actual bytes off the socket instead of trusting a mock framework's
//! parsed view of the request.

use byprobe::http::HttpClient;
use byprobe::message::{Headers, HttpRequest};
use byprobe::techniques::protocol_abuse;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

const RESPONSE_403: &[u8] =
    b"HTTP/1.1 403 Forbidden\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n<html>denied</html>";

/// Accepts one connection, captures everything up to the header terminator,
/// answers with a canned response and hands the captured bytes back.
async fn capture_one_request(response: &'static [u8]) -> (String, oneshot::Receiver<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut captured = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            captured.extend_from_slice(&buf[..n]);
            if captured.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        socket.write_all(response).await.unwrap();
        socket.shutdown().await.ok();
        let _ = tx.send(captured);
    });

    (format!("127.0.0.1:{}", port), rx)
}

fn fast_client() -> HttpClient {
    let mut client = HttpClient::new();
    client.set_timeout_ms(3000);
    client
}

#[tokio::test]
async fn raw_nul_byte_reaches_the_wire() {
    let (addr, captured) = capture_one_request(RESPONSE_403).await;
    let client = fast_client();

    let response = client
        .get(&format!("http://{}/admin\u{0}", addr), Headers::new())
        .await;
    assert_eq!(response.status_code, 403);

    let wire = captured.await.unwrap();
    let line_end = wire.windows(2).position(|w| w == b"\r\n").unwrap();
    let request_line = &wire[..line_end];
    assert!(
        request_line.contains(&0u8),
        "request line should carry the raw NUL: {:?}",
        request_line
    );
    assert_eq!(request_line, &b"GET /admin\x00 HTTP/1.1"[..]);
}

#[tokio::test]
async fn mangled_method_tokens_are_not_repaired() {
    let (addr, captured) = capture_one_request(RESPONSE_403).await;
    let client = fast_client();

    let mut request = HttpRequest::new("GETT", format!("http://{}/admin", addr));
    request.timeout_ms = 3000;
    client.execute(&request).await;

    let wire = captured.await.unwrap();
    assert!(wire.starts_with(b"GETT /admin HTTP/1.1\r\n"));
}

#[tokio::test]
async fn trailing_space_method_reaches_the_wire() {
    let (addr, captured) = capture_one_request(RESPONSE_403).await;
    let client = fast_client();

    let mut request = HttpRequest::new("GET ", format!("http://{}/a", addr));
    request.timeout_ms = 3000;
    client.execute(&request).await;

    let wire = captured.await.unwrap();
    assert!(wire.starts_with(b"GET  /a HTTP/1.1\r\n"));
}

#[tokio::test]
async fn duplicate_host_headers_appear_in_order() {
    let (addr, captured) = capture_one_request(RESPONSE_403).await;
    let client = fast_client();

    let mut request = HttpRequest::new("GET", format!("http://{}/x", addr));
    request.timeout_ms = 3000;
    request.headers.append("Host", "127.0.0.1");
    protocol_abuse::add_duplicate_headers(&mut request);
    client.execute(&request).await;

    let wire = String::from_utf8_lossy(captured.await.unwrap().as_slice()).into_owned();
    let first = wire.find("Host: 127.0.0.1\r\n").unwrap();
    let second = wire.find("Host: localhost\r\n").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn conflicting_framing_headers_reach_the_wire() {
    let (addr, captured) = capture_one_request(RESPONSE_403).await;
    let client = fast_client();

    let mut request = HttpRequest::new("POST", format!("http://{}/x", addr));
    request.timeout_ms = 3000;
    protocol_abuse::add_conflicting_headers(&mut request);
    client.execute(&request).await;

    let wire = String::from_utf8_lossy(captured.await.unwrap().as_slice()).into_owned();
    assert!(wire.contains("Content-Length: 10\r\n"));
    assert!(wire.contains("Transfer-Encoding: chunked\r\n"));
}

#[tokio::test]
async fn version_downgrade_reaches_the_request_line() {
    let (addr, captured) = capture_one_request(RESPONSE_403).await;
    let client = fast_client();

    let mut request = HttpRequest::new("GET", format!("http://{}/x", addr));
    request.timeout_ms = 3000;
    protocol_abuse::downgrade_http10(&mut request);
    client.execute(&request).await;

    let wire = captured.await.unwrap();
    assert!(wire.starts_with(b"GET /x HTTP/1.0\r\n"));
}

#[tokio::test]
async fn response_fields_round_trip() {
    let (addr, _captured) = capture_one_request(RESPONSE_403).await;
    let client = fast_client();

    let response = client
        .get(&format!("http://{}/admin", addr), Headers::new())
        .await;
    assert_eq!(response.status_code, 403);
    assert_eq!(response.status_message, "Forbidden");
    assert_eq!(response.headers.get("content-type"), Some("text/html"));
    assert_eq!(response.body, b"<html>denied</html>");
    assert!(response.response_time_ms > 0.0);
}

#[tokio::test]
async fn connection_refused_yields_status_zero() {
    // Bind then drop to find a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = fast_client();
    let response = client
        .get(&format!("http://127.0.0.1:{}/x", port), Headers::new())
        .await;
    assert_eq!(response.status_code, 0);
    assert!(!response.status_message.is_empty());
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn early_close_yields_status_zero() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        drop(socket);
    });

    let client = fast_client();
    let response = client
        .get(&format!("http://127.0.0.1:{}/x", port), Headers::new())
        .await;
    assert_eq!(response.status_code, 0);
}

#[tokio::test]
async fn invalid_url_yields_status_zero_not_panic() {
    let client = fast_client();
    let response = client.get("http://:nonsense/", Headers::new()).await;
    assert_eq!(response.status_code, 0);
    assert!(response.status_message.contains("invalid url"));
}
