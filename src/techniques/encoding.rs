// File: encoding.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

//! Multi-level encoding variants.
//!
//! The mixed and partial forms are randomized per byte; the strategy owns a
//! seedable RNG so tests and replays can pin the output.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::codec;

pub fn single_url_encode(input: &str) -> String {
    codec::url_encode(input)
}

pub fn double_url_encode(input: &str) -> String {
    codec::url_encode_multi(input, 2)
}

pub fn triple_url_encode(input: &str) -> String {
    codec::url_encode_multi(input, 3)
}

/// `&#N;` per byte, decimal.
pub fn html_entity_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 5);
    for &b in input.as_bytes() {
        out.push_str(&format!("&#{};", b));
    }
    out
}

/// `\u00HH` per byte, lowercase hex.
pub fn unicode_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 6);
    for &b in input.as_bytes() {
        out.push_str(&format!("\\u00{:02x}", b));
    }
    out
}

pub struct EncodingStrategy {
    rng: StdRng,
    partial_probability: f64,
}

impl EncodingStrategy {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            partial_probability: 0.5,
        }
    }

    /// Deterministic variant generation for tests and reproducible scans.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            partial_probability: 0.5,
        }
    }

    /// Fixed emission order: single, double, triple, HTML entities, unicode
    /// escapes, mixed, partial. Only the last two consume the RNG.
    pub fn variations(&mut self, input: &str) -> Vec<String> {
        vec![
            single_url_encode(input),
            double_url_encode(input),
            triple_url_encode(input),
            html_entity_encode(input),
            unicode_escape(input),
            self.mixed_encode(input),
            self.partial_url_encode(input),
        ]
    }

    /// Per byte, uniformly one of: literal, `%HH`, `&#N;`.
    pub fn mixed_encode(&mut self, input: &str) -> String {
        let mut out = String::with_capacity(input.len() * 3);
        for &b in input.as_bytes() {
            match self.rng.gen_range(0..3) {
                0 => out.push(b as char),
                1 => out.push_str(&format!("%{:02x}", b)),
                _ => out.push_str(&format!("&#{};", b)),
            }
        }
        out
    }

    /// Each byte independently percent-encoded with the configured
    /// probability (default 0.5).
    pub fn partial_url_encode(&mut self, input: &str) -> String {
        let mut out = String::with_capacity(input.len() * 2);
        for &b in input.as_bytes() {
            if self.rng.gen_bool(self.partial_probability) {
                out.push_str(&format!("%{:02x}", b));
            } else {
                out.push(b as char);
            }
        }
        out
    }
}

impl Default for EncodingStrategy {
    fn default() -> Self {
        Self::new()
    }
}
