// File: config.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::{DEFAULT_TIMEOUT_MS, DEFAULT_USER_AGENT};

/// Scan configuration as accepted on the engine API (`config_json`).
///
/// Unknown fields are ignored and every field has a default, so older
/// callers keep working as the schema grows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub timeout_ms: u64,
    pub user_agent: String,
    pub verify_tls: bool,
    pub follow_redirects: bool,
    pub techniques: Vec<String>,
    pub strategy: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            verify_tls: false,
            follow_redirects: false,
            techniques: vec!["path_bypass".to_string()],
            strategy: "balanced".to_string(),
        }
    }
}

impl ScanConfig {
    /// Parses a config document; an empty or null input yields defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let trimmed = json.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(trimmed)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_suit_probing() {
        let config = ScanConfig::default();
        assert_eq!(config.timeout_ms, 30_000);
        assert!(!config.verify_tls);
        assert!(!config.follow_redirects);
    }

    #[test]
    fn empty_input_is_defaults() {
        assert_eq!(ScanConfig::from_json("").unwrap().timeout_ms, 30_000);
        assert_eq!(ScanConfig::from_json("{}").unwrap().strategy, "balanced");
    }

    #[test]
    fn partial_document_overrides_selected_fields() {
        let config = ScanConfig::from_json(r#"{"timeout_ms": 5000}"#).unwrap();
        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let config = ScanConfig::from_json(r#"{"future_knob": true}"#).unwrap();
        assert_eq!(config.timeout_ms, 30_000);
    }

    #[test]
    fn round_trips_through_json() {
        let config = ScanConfig::default();
        let json = config.to_json().unwrap();
        let back = ScanConfig::from_json(&json).unwrap();
        assert_eq!(back.timeout_ms, config.timeout_ms);
        assert_eq!(back.techniques, config.techniques);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(ScanConfig::from_json("{not json").is_err());
    }
}
