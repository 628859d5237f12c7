// File: protocol_abuse.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

//! Method, version and framing abuse.
//!
//! Everything here depends on the engine's byte-literal serializer: a
//! trailing space in the method or a conflicting framing pair must reach the
//! wire exactly as constructed.

use crate::message::HttpRequest;

pub const HTTP_VERSIONS: &[&str] = &["HTTP/0.9", "HTTP/1.0", "HTTP/1.1", "HTTP/2.0"];

/// Method tokens some routers treat as unknown-but-forwardable.
pub const CUSTOM_METHODS: &[&str] = &["GETT", "POSTX", "PUTT", "DELETEX", "get", "Get", "GET "];

/// Fixed-order mutations of a base method: exact, lower, upper,
/// capitalized, trailing space, extra character.
pub fn method_variations(base: &str) -> Vec<String> {
    let lower = base.to_lowercase();
    let mut capitalized = lower.clone();
    if let Some(first) = capitalized.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    vec![
        base.to_string(),
        lower,
        base.to_uppercase(),
        capitalized,
        format!("{} ", base),
        format!("{}X", base),
    ]
}

/// Appends a second `Host: localhost` when a Host header is already staged.
/// Which of the two a hop honors is implementation-defined, which is the
/// point.
pub fn add_duplicate_headers(req: &mut HttpRequest) {
    if req.headers.contains("Host") {
        req.headers.append("Host", "localhost");
    }
}

/// Stages the classic request-smuggling probe: `Content-Length` and
/// `Transfer-Encoding: chunked` on the same request.
pub fn add_conflicting_headers(req: &mut HttpRequest) {
    req.headers.append("Content-Length", "10");
    req.headers.append("Transfer-Encoding", "chunked");
}

/// HTTP/0.9 carries no headers; drop whatever was staged.
pub fn downgrade_http09(req: &mut HttpRequest) {
    req.http_version = "HTTP/0.9".to_string();
    req.headers.clear();
}

pub fn downgrade_http10(req: &mut HttpRequest) {
    req.http_version = "HTTP/1.0".to_string();
}
