// File: target.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

//! Minimal URL model for probe targets.
//!
//! This parser is more permissive than RFC 3986: mutated
//! paths (raw NUL bytes, homographs, stacked percent encodings) must survive
//! a parse/build round-trip untouched, which rules out any normalizing URL
//! library for the request path.

use crate::error::{ProbeError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub path: String,
    pub query: String,
    pub fragment: String,
}

impl ParsedUrl {
    pub fn is_tls(&self) -> bool {
        self.scheme == "https"
    }

    fn default_port(scheme: &str) -> u16 {
        if scheme == "https" {
            443
        } else {
            80
        }
    }

    /// Host plus `:port` when the port differs from the scheme default.
    pub fn authority(&self) -> String {
        if self.port == Self::default_port(&self.scheme) {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Path plus `?query` as it appears on the request line.
    pub fn request_target(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

/// Splits a URL into scheme/host/port/path/query/fragment.
///
/// A missing scheme defaults to `http`, a missing path to `/`. The only
/// rejected inputs are an empty host and an unparsable port; everything else
/// is carried through byte for byte.
pub fn parse_url(url: &str) -> Result<ParsedUrl> {
    let (scheme, rest) = match url.find("://") {
        Some(pos) => (&url[..pos], &url[pos + 3..]),
        None => ("http", url),
    };

    let (host_port, after_authority) = match rest.find('/') {
        Some(pos) => (&rest[..pos], &rest[pos..]),
        None => (rest, ""),
    };

    let (host, port) = match host_port.find(':') {
        Some(pos) => {
            let host = &host_port[..pos];
            let port_str = &host_port[pos + 1..];
            let port: u16 = port_str
                .parse()
                .map_err(|_| ProbeError::InvalidUrl(format!("bad port in {}", url)))?;
            (host, port)
        }
        None => (host_port, ParsedUrl::default_port(scheme)),
    };

    if host.is_empty() {
        return Err(ProbeError::InvalidUrl(format!("empty host in {}", url)));
    }

    let (path, query, fragment) = if after_authority.is_empty() {
        ("/".to_string(), String::new(), String::new())
    } else {
        match (after_authority.find('?'), after_authority.find('#')) {
            (Some(q), Some(f)) if q < f => (
                after_authority[..q].to_string(),
                after_authority[q + 1..f].to_string(),
                after_authority[f + 1..].to_string(),
            ),
            (Some(_), Some(f)) => (
                // '#' before '?': the query belongs to the fragment.
                after_authority[..f].to_string(),
                String::new(),
                after_authority[f + 1..].to_string(),
            ),
            (Some(q), None) => (
                after_authority[..q].to_string(),
                after_authority[q + 1..].to_string(),
                String::new(),
            ),
            (None, Some(f)) => (
                after_authority[..f].to_string(),
                String::new(),
                after_authority[f + 1..].to_string(),
            ),
            (None, None) => (after_authority.to_string(), String::new(), String::new()),
        }
    };

    Ok(ParsedUrl {
        scheme: scheme.to_string(),
        host: host.to_string(),
        port,
        path,
        query,
        fragment,
    })
}

/// Reassembles a URL. Default ports are elided so that parse/build
/// round-trips inputs that did not spell the port out.
pub fn build_url(parsed: &ParsedUrl) -> String {
    let mut url = format!("{}://{}", parsed.scheme, parsed.host);
    if parsed.port != ParsedUrl::default_port(&parsed.scheme) {
        url.push(':');
        url.push_str(&parsed.port.to_string());
    }
    url.push_str(&parsed.path);
    if !parsed.query.is_empty() {
        url.push('?');
        url.push_str(&parsed.query);
    }
    if !parsed.fragment.is_empty() {
        url.push('#');
        url.push_str(&parsed.fragment);
    }
    url
}
