// File: probe.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

//! Probe orchestration: baseline capture, variant dispatch, verdicts.
//!
//! One request in flight at a time, strictly in strategy order. Report
//! entry `i` always corresponds to the `i`-th dispatched variant, which is
//! what makes scan diffs between runs meaningful.

use log::{debug, info};

use crate::classifier::{self, BaselineReport, ScanResult, VariantReport};
use crate::http::HttpClient;
use crate::message::Headers;
use crate::target::{self, ParsedUrl};
use crate::techniques::path_bypass;

/// Hard ceiling on dispatched variants per scan. Path generation can easily
/// produce hundreds of candidates; an unattended scan must not hammer a
/// target with all of them.
pub const MAX_DISPATCHED: usize = 50;

pub struct Prober {
    client: HttpClient,
}

impl Prober {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Generates path variants for the target, deduplicated on exact string
    /// equality with first occurrences kept in place.
    pub fn generate_variants(parsed: &ParsedUrl) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        path_bypass::variants(&parsed.path)
            .into_iter()
            .filter(|v| seen.insert(v.clone()))
            .collect()
    }

    /// Full differential run: baseline first, then each variant in
    /// generation order, capped at `MAX_DISPATCHED`.
    pub async fn run(&self, url: &str) -> crate::error::Result<ScanResult> {
        let parsed = target::parse_url(url)?;
        let variants = Self::generate_variants(&parsed);
        self.run_variants(&parsed, variants).await
    }

    /// Dispatch loop over an explicit variant list. Split out so callers
    /// (and tests) can drive the cap and ordering guarantees directly.
    pub async fn run_variants(
        &self,
        parsed: &ParsedUrl,
        variants: Vec<String>,
    ) -> crate::error::Result<ScanResult> {
        let url = compose_url(parsed, &parsed.path);

        info!("probing {} with {} candidate variants", url, variants.len());

        let baseline_response = self.client.get(&url, Headers::new()).await;
        let baseline = BaselineReport {
            status: baseline_response.status_code,
            size: baseline_response.body.len(),
            time: baseline_response.response_time_ms,
        };
        debug!(
            "baseline for {}: status={} size={}",
            url, baseline.status, baseline.size
        );

        let mut reports = Vec::new();
        for variant in variants.into_iter().take(MAX_DISPATCHED) {
            let test_url = compose_url(parsed, &variant);
            let response = self.client.get(&test_url, Headers::new()).await;

            let verdict = classifier::classify(
                baseline.status,
                baseline.size,
                response.status_code,
                response.body.len(),
                &response.body,
            );

            debug!(
                "variant {:?} -> {}{}",
                variant,
                response.status_code,
                if verdict.bypass { " (bypass)" } else { "" }
            );

            reports.push(VariantReport {
                variation: variant,
                status: response.status_code,
                size: response.body.len(),
                time: response.response_time_ms,
                bypass: verdict.bypass,
                reason: verdict.reason,
            });
        }

        let result = ScanResult::new(baseline, reports);
        info!(
            "probe of {} finished: {}/{} bypasses",
            url, result.summary.successful_bypasses, result.summary.total_tested
        );
        Ok(result)
    }
}

/// Rebuilds the dispatch URL around a mutated path. The query survives; the
/// fragment never reaches the wire.
fn compose_url(parsed: &ParsedUrl, variant: &str) -> String {
    let mut url = format!("{}://{}", parsed.scheme, parsed.authority());
    url.push_str(variant);
    if !parsed.query.is_empty() {
        url.push('?');
        url.push_str(&parsed.query);
    }
    url
}
