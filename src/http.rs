// File: http.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

//! Hand-rolled HTTP/1.1 client.
//!
//! Conventional clients normalize paths, reject odd method tokens and refuse
//! embedded NUL bytes; every one of those "fixes" destroys a bypass payload.
//! This client serializes requests byte for byte and hands back whatever the
//! peer sent. It never returns an error: transport, TLS and parse failures
//! become responses with `status_code == 0` so the probe loop can keep
//! going and count them.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, trace};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::{rustls, TlsConnector};

use crate::error::{ProbeError, Result};
use crate::message::{Headers, HttpRequest, HttpResponse, DEFAULT_TIMEOUT_MS, DEFAULT_USER_AGENT};
use crate::target::{self, ParsedUrl};

const READ_CHUNK: usize = 4096;
const READ_SLICE_MS: u64 = 500;
const MAX_REDIRECTS: u8 = 5;

#[derive(Debug, Clone)]
pub struct HttpClient {
    timeout_ms: u64,
    user_agent: String,
    verify_tls: bool,
    follow_redirects: bool,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            verify_tls: false,
            follow_redirects: false,
        }
    }

    pub fn set_timeout_ms(&mut self, timeout_ms: u64) {
        self.timeout_ms = timeout_ms;
    }

    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.user_agent = user_agent.into();
    }

    pub fn set_verify_tls(&mut self, verify: bool) {
        self.verify_tls = verify;
    }

    pub fn set_follow_redirects(&mut self, follow: bool) {
        self.follow_redirects = follow;
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub async fn get(&self, url: &str, headers: Headers) -> HttpResponse {
        self.execute(&self.request("GET", url, headers, Vec::new())).await
    }

    pub async fn post(&self, url: &str, body: Vec<u8>, headers: Headers) -> HttpResponse {
        self.execute(&self.request("POST", url, headers, body)).await
    }

    pub async fn head(&self, url: &str, headers: Headers) -> HttpResponse {
        self.execute(&self.request("HEAD", url, headers, Vec::new())).await
    }

    fn request(&self, method: &str, url: &str, headers: Headers, body: Vec<u8>) -> HttpRequest {
        let mut req = HttpRequest::new(method, url);
        req.headers = headers;
        req.body = body;
        req.timeout_ms = self.timeout_ms;
        req.verify_tls = self.verify_tls;
        req.follow_redirects = self.follow_redirects;
        req
    }

    /// Dispatches a request and always produces a response. Redirects are
    /// only chased when the request opts in; probing never does.
    pub async fn execute(&self, request: &HttpRequest) -> HttpResponse {
        let start = Instant::now();
        let mut current_url = request.url.clone();
        let mut hops = 0u8;

        loop {
            let outcome = self.dispatch_once(request, &current_url).await;
            let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

            match outcome {
                Ok(mut response) => {
                    response.response_time_ms = elapsed_ms;
                    if request.follow_redirects
                        && (300..400).contains(&response.status_code)
                        && hops < MAX_REDIRECTS
                    {
                        if let Some(location) = response.headers.get("Location") {
                            current_url = resolve_location(&current_url, location);
                            hops += 1;
                            trace!("following redirect {} -> {}", hops, current_url);
                            continue;
                        }
                    }
                    return response;
                }
                Err(err) => {
                    debug!("request to {} failed: {}", current_url, err);
                    return HttpResponse::failure(err.to_string(), elapsed_ms);
                }
            }
        }
    }

    async fn dispatch_once(&self, request: &HttpRequest, url: &str) -> Result<HttpResponse> {
        let parsed = target::parse_url(url)?;
        let wire = serialize_request(request, &parsed, &self.user_agent);
        let timeout = request.timeout();

        trace!(
            "dispatching {} byte request to {}:{}",
            wire.len(),
            parsed.host,
            parsed.port
        );

        let stream = connect(&parsed.host, parsed.port, timeout).await?;
        let raw = if parsed.is_tls() {
            let tls = handshake(stream, &parsed.host, request.verify_tls, timeout).await?;
            converse(tls, &wire, timeout).await?
        } else {
            converse(stream, &wire, timeout).await?
        };

        parse_response(&raw)
    }
}

/// Emits the request exactly as staged: no method validation, no header
/// casing fixups, no path escaping. The wire bytes are the whole point.
fn serialize_request(request: &HttpRequest, parsed: &ParsedUrl, user_agent: &str) -> Vec<u8> {
    let mut wire = Vec::with_capacity(256 + request.body.len());

    wire.extend_from_slice(request.method.as_bytes());
    wire.push(b' ');
    wire.extend_from_slice(parsed.request_target().as_bytes());
    wire.push(b' ');
    wire.extend_from_slice(request.http_version.as_bytes());
    wire.extend_from_slice(b"\r\n");

    wire.extend_from_slice(b"Host: ");
    wire.extend_from_slice(parsed.host.as_bytes());
    wire.extend_from_slice(b"\r\n");
    wire.extend_from_slice(b"User-Agent: ");
    wire.extend_from_slice(user_agent.as_bytes());
    wire.extend_from_slice(b"\r\n");
    wire.extend_from_slice(b"Connection: close\r\n");

    for (name, value) in request.headers.iter() {
        wire.extend_from_slice(name.as_bytes());
        wire.extend_from_slice(b": ");
        wire.extend_from_slice(value.as_bytes());
        wire.extend_from_slice(b"\r\n");
    }

    if !request.body.is_empty() {
        wire.extend_from_slice(format!("Content-Length: {}\r\n", request.body.len()).as_bytes());
    }

    wire.extend_from_slice(b"\r\n");
    wire.extend_from_slice(&request.body);
    wire
}

async fn connect(host: &str, port: u16, timeout: Duration) -> Result<TcpStream> {
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, port))
        .await
        .map_err(|e| ProbeError::Network(format!("failed to resolve {}: {}", host, e)))?
        .collect();

    if addrs.is_empty() {
        return Err(ProbeError::Network(format!("no addresses for {}", host)));
    }

    let mut last_err = ProbeError::Network(format!("unable to connect to {}:{}", host, port));
    for addr in addrs {
        match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                debug!("connected to {}", addr);
                return Ok(stream);
            }
            Ok(Err(e)) => last_err = ProbeError::Network(format!("connect {}: {}", addr, e)),
            Err(_) => last_err = ProbeError::Timeout(timeout.as_millis() as u64),
        }
    }
    Err(last_err)
}

async fn handshake(
    stream: TcpStream,
    host: &str,
    verify: bool,
    timeout: Duration,
) -> Result<tokio_rustls::client::TlsStream<TcpStream>> {
    // Fresh client config per request; a shared context would carry
    // resumption state between variants.
    let config = if verify {
        verifying_config()
    } else {
        trusting_config()
    };
    let connector = TlsConnector::from(Arc::new(config));
    let server_name = rustls::ServerName::try_from(host)
        .map_err(|_| ProbeError::Ssl(format!("invalid server name: {}", host)))?;

    match tokio::time::timeout(timeout, connector.connect(server_name, stream)).await {
        Ok(Ok(tls)) => Ok(tls),
        Ok(Err(e)) => Err(ProbeError::Ssl(format!("handshake with {}: {}", host, e))),
        Err(_) => Err(ProbeError::Timeout(timeout.as_millis() as u64)),
    }
}

fn verifying_config() -> rustls::ClientConfig {
    let mut root_store = rustls::RootCertStore::empty();
    root_store.add_trust_anchors(webpki_roots::TLS_SERVER_ROOTS.0.iter().map(|ta| {
        rustls::OwnedTrustAnchor::from_subject_spki_name_constraints(
            ta.subject,
            ta.spki,
            ta.name_constraints,
        )
    }));

    rustls::ClientConfig::builder()
        .with_safe_defaults()
        .with_root_certificates(root_store)
        .with_no_client_auth()
}

fn trusting_config() -> rustls::ClientConfig {
    rustls::ClientConfig::builder()
        .with_safe_defaults()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyCert))
        .with_no_client_auth()
}

/// Verifier that waves every certificate through. Expired, self-signed and
/// hostname-mismatched certs are routine on the targets this tool probes.
struct AcceptAnyCert;

impl rustls::client::ServerCertVerifier for AcceptAnyCert {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::Certificate,
        _intermediates: &[rustls::Certificate],
        _server_name: &rustls::ServerName,
        _scts: &mut dyn Iterator<Item = &[u8]>,
        _ocsp_response: &[u8],
        _now: std::time::SystemTime,
    ) -> std::result::Result<rustls::client::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::ServerCertVerified::assertion())
    }
}

async fn converse<S>(mut stream: S, wire: &[u8], timeout: Duration) -> Result<Vec<u8>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let timeout_ms = timeout.as_millis() as u64;

    match tokio::time::timeout(timeout, stream.write_all(wire)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(ProbeError::Network(format!("send failed: {}", e))),
        Err(_) => return Err(ProbeError::Timeout(timeout_ms)),
    }

    let deadline = Instant::now() + timeout;
    let mut response = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        let slice = remaining.min(Duration::from_millis(READ_SLICE_MS));
        match tokio::time::timeout(slice, stream.read(&mut chunk)).await {
            Ok(Ok(0)) => {
                if response.is_empty() {
                    return Err(ProbeError::Network(
                        "connection closed before response".to_string(),
                    ));
                }
                break;
            }
            Ok(Ok(n)) => response.extend_from_slice(&chunk[..n]),
            Ok(Err(e)) => {
                if response.is_empty() {
                    return Err(ProbeError::Network(format!("recv failed: {}", e)));
                }
                break;
            }
            // Slice elapsed without data; loop re-checks the deadline.
            Err(_) => continue,
        }
    }

    if response.is_empty() {
        return Err(ProbeError::Timeout(timeout_ms));
    }
    Ok(response)
}

/// Splits on the first `CRLF CRLF`; the status line yields code and message,
/// header lines split on the first colon with leading SP/HT trimmed from the
/// value. The body is raw bytes, untouched.
fn parse_response(raw: &[u8]) -> Result<HttpResponse> {
    let header_end = find_subslice(raw, b"\r\n\r\n")
        .ok_or_else(|| ProbeError::InvalidResponse("missing header terminator".to_string()))?;

    let head = String::from_utf8_lossy(&raw[..header_end]);
    let body = raw[header_end + 4..].to_vec();

    let mut lines = head.lines();
    let status_line = lines
        .next()
        .ok_or_else(|| ProbeError::InvalidResponse("empty response".to_string()))?;

    let mut parts = status_line.split_whitespace();
    let _version = parts
        .next()
        .ok_or_else(|| ProbeError::InvalidResponse("missing status line".to_string()))?;
    let status_code: u16 = parts
        .next()
        .ok_or_else(|| ProbeError::InvalidResponse("missing status code".to_string()))?
        .parse()
        .map_err(|_| ProbeError::InvalidResponse("non-numeric status code".to_string()))?;
    let status_message = parts.collect::<Vec<_>>().join(" ");

    let mut headers = Headers::new();
    for line in lines {
        if let Some(colon) = line.find(':') {
            let name = &line[..colon];
            let value = line[colon + 1..].trim_start_matches([' ', '\t']);
            headers.append(name, value);
        }
    }

    Ok(HttpResponse {
        status_code,
        status_message,
        headers,
        body,
        response_time_ms: 0.0,
    })
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn resolve_location(base_url: &str, location: &str) -> String {
    if location.starts_with("http://") || location.starts_with("https://") {
        return location.to_string();
    }
    match target::parse_url(base_url) {
        Ok(parsed) => {
            let prefix = format!("{}://{}", parsed.scheme, parsed.authority());
            if location.starts_with('/') {
                format!("{}{}", prefix, location)
            } else {
                format!("{}/{}", prefix, location)
            }
        }
        Err(_) => location.to_string(),
    }
}
