// File: engine.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

//! The stable engine surface behind both the CLI and the C ABI.
//!
//! `Engine` is an ordinary value: construct, use, drop. All state lives in
//! the configured transport; nothing is shared between scans, so two
//! engines never interfere.

use log::info;

use crate::classifier::ScanResult;
use crate::config::ScanConfig;
use crate::error::Result;
use crate::http::HttpClient;
use crate::probe::Prober;
use crate::report;
use crate::target;
use crate::techniques::{encoding::EncodingStrategy, path_bypass};

/// Variant listing operations truncate to this many entries.
const LIST_LIMIT: usize = 10;

pub struct Engine {
    client: HttpClient,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(&ScanConfig::default())
    }

    pub fn with_config(config: &ScanConfig) -> Self {
        let mut client = HttpClient::new();
        client.set_timeout_ms(config.timeout_ms);
        client.set_user_agent(config.user_agent.clone());
        client.set_verify_tls(config.verify_tls);
        client.set_follow_redirects(config.follow_redirects);
        Self { client }
    }

    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Generates path variants for the target without touching the network.
    /// Returns the `{"url", "variations"}` document, first ten variants.
    pub fn scan(&self, url: &str, config_json: &str) -> Result<String> {
        let _config = ScanConfig::from_json(config_json)?;
        info!("scanning {}", url);

        let parsed = target::parse_url(url)?;
        let variations = path_bypass::variants(&parsed.path);
        Ok(report::scan_json(url, &variations, LIST_LIMIT))
    }

    /// Runs a single named technique against the target path. Unknown
    /// names yield an empty variation list, not an error.
    pub fn test_technique(&self, url: &str, technique: &str) -> Result<String> {
        info!("testing technique {} on {}", technique, url);

        let parsed = target::parse_url(url)?;
        let variations = match technique {
            "path_bypass" => path_bypass::variants(&parsed.path),
            "url_encoding" => EncodingStrategy::new().variations(&parsed.path),
            _ => Vec::new(),
        };
        Ok(report::technique_json(technique, url, &variations, LIST_LIMIT))
    }

    /// Full differential probe: baseline, capped variant dispatch,
    /// per-variant verdicts. Returns the report JSON.
    pub async fn test_variations(&self, url: &str, config_json: &str) -> Result<String> {
        let result = self.probe(url, config_json).await?;
        Ok(report::variations_json(&result))
    }

    /// Same probe, structured result. The CLI renders this through its
    /// formatters instead of re-parsing engine JSON.
    pub async fn probe(&self, url: &str, config_json: &str) -> Result<ScanResult> {
        let config = ScanConfig::from_json(config_json)?;
        let mut client = self.client.clone();
        client.set_timeout_ms(config.timeout_ms);
        client.set_user_agent(config.user_agent.clone());
        client.set_verify_tls(config.verify_tls);
        client.set_follow_redirects(config.follow_redirects);

        Prober::new(client).run(url).await
    }

    /// WAF fingerprinting placeholder. The endpoint is stable; the logic is
    /// an extension point.
    pub fn detect_waf(&self, url: &str) -> Result<String> {
        target::parse_url(url)?;
        Ok(report::waf_stub_json())
    }
}
