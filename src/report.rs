// File: report.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

//! Stable JSON report encoding.
//!
//! Variant strings carry raw NUL bytes, control characters and multi-byte
//! bypass payloads; the escaping here is hand-rolled so the output shape
//! stays fixed (`\u0000` for NUL, `\u00XX` uppercase for other control
//! bytes, everything printable passed through literally). Consumers decode
//! the string field and get the variant back byte for byte.

use crate::classifier::ScanResult;

/// Escapes a variant string for embedding in a JSON string literal.
pub fn escape_json(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

/// `scan` output: the target URL and the first `limit` generated variants.
pub fn scan_json(url: &str, variations: &[String], limit: usize) -> String {
    let mut json = String::from("{\"url\":\"");
    json.push_str(&escape_json(url));
    json.push_str("\",\"variations\":[");
    push_variant_list(&mut json, variations, limit);
    json.push_str("]}");
    json
}

/// `test_technique` output: like `scan_json` but tagged with the technique
/// name. An unknown technique produces an empty list, not an error.
pub fn technique_json(technique: &str, url: &str, variations: &[String], limit: usize) -> String {
    let mut json = String::from("{\"technique\":\"");
    json.push_str(&escape_json(technique));
    json.push_str("\",\"url\":\"");
    json.push_str(&escape_json(url));
    json.push_str("\",\"variations\":[");
    push_variant_list(&mut json, variations, limit);
    json.push_str("]}");
    json
}

fn push_variant_list(json: &mut String, variations: &[String], limit: usize) {
    for (i, variation) in variations.iter().take(limit).enumerate() {
        if i > 0 {
            json.push(',');
        }
        json.push('"');
        json.push_str(&escape_json(variation));
        json.push('"');
    }
}

/// `test_variations` output: baseline, per-variant records in dispatch
/// order, and the summary roll-up.
pub fn variations_json(result: &ScanResult) -> String {
    let mut json = String::from("{\"baseline\":{");
    json.push_str(&format!(
        "\"status\":{},\"size\":{},\"time\":{}",
        result.baseline.status, result.baseline.size, result.baseline.time
    ));
    json.push_str("},\"variations\":[");

    for (i, variant) in result.variations.iter().enumerate() {
        if i > 0 {
            json.push(',');
        }
        json.push_str("{\"variation\":\"");
        json.push_str(&escape_json(&variant.variation));
        json.push_str(&format!(
            "\",\"status\":{},\"size\":{},\"time\":{},\"bypass\":{},\"reason\":\"{}\"}}",
            variant.status,
            variant.size,
            variant.time,
            variant.bypass,
            variant.reason.as_str()
        ));
    }

    json.push_str("],\"summary\":{");
    json.push_str(&format!(
        "\"total_tested\":{},\"successful_bypasses\":{},\"failed_attempts\":{}",
        result.summary.total_tested,
        result.summary.successful_bypasses,
        result.summary.failed_attempts
    ));
    json.push_str("}}");
    json
}

/// Hard-coded WAF detection placeholder; fingerprinting is an extension
/// point, not implemented behavior.
pub fn waf_stub_json() -> String {
    "{\"type\":\"unknown\",\"confidence\":0.0}".to_string()
}
