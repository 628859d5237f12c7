// File: message.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

//! Request and response types for the raw HTTP engine.
//!
//! Headers are an ordered, multi-valued list. Duplicate headers are a
//! first-class probing technique on the request side; on the response side
//! reads are case-insensitive and the last occurrence wins.

use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_USER_AGENT: &str = concat!("byprobe/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends without deduplication, preserving insertion order.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Case-insensitive lookup; the last stored value wins.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<S: Into<String>, T: Into<String>> FromIterator<(S, T)> for Headers {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (n, v) in iter {
            headers.append(n, v);
        }
        headers
    }
}

/// A single probe request. `method` and `http_version` are plain strings on
/// purpose: `GETT`, `get ` and `HTTP/0.9` are valid probe payloads and must
/// reach the wire untouched.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: Headers,
    pub body: Vec<u8>,
    pub timeout_ms: u64,
    pub follow_redirects: bool,
    pub verify_tls: bool,
    pub http_version: String,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: Headers::new(),
            body: Vec::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            follow_redirects: false,
            verify_tls: false,
            http_version: "HTTP/1.1".to_string(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// A parsed response, or the record of a failed dispatch: transport, TLS and
/// parse failures all surface as `status_code == 0` with a message instead
/// of an error, so a scan never aborts mid-run on a flaky variant.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub status_message: String,
    pub headers: Headers,
    pub body: Vec<u8>,
    pub response_time_ms: f64,
}

impl HttpResponse {
    pub fn failure(message: impl Into<String>, response_time_ms: f64) -> Self {
        Self {
            status_code: 0,
            status_message: message.into(),
            headers: Headers::new(),
            body: Vec::new(),
            response_time_ms,
        }
    }

    pub fn is_transport_failure(&self) -> bool {
        self.status_code == 0
    }

    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_preserve_order_and_duplicates() {
        let mut h = Headers::new();
        h.append("Host", "a");
        h.append("X-Test", "1");
        h.append("Host", "b");
        let collected: Vec<_> = h.iter().collect();
        assert_eq!(
            collected,
            vec![("Host", "a"), ("X-Test", "1"), ("Host", "b")]
        );
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn header_get_is_case_insensitive_last_wins() {
        let mut h = Headers::new();
        h.append("Content-Type", "text/plain");
        h.append("content-type", "text/html");
        assert_eq!(h.get("CONTENT-TYPE"), Some("text/html"));
        assert!(h.contains("content-Type"));
        assert_eq!(h.get("missing"), None);
    }

    #[test]
    fn request_defaults_suit_probing() {
        let req = HttpRequest::new("GET", "http://h/admin");
        assert_eq!(req.timeout_ms, 30_000);
        assert!(!req.follow_redirects);
        assert!(!req.verify_tls);
        assert_eq!(req.http_version, "HTTP/1.1");
    }

    #[test]
    fn failure_response_shape() {
        let resp = HttpResponse::failure("connect timeout", 12.5);
        assert!(resp.is_transport_failure());
        assert_eq!(resp.status_message, "connect timeout");
        assert!(resp.headers.is_empty());
        assert!(resp.body.is_empty());
    }
}
