// File: json.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

use anyhow::Result;
use serde_json::Value;

use crate::output::OutputFormatter;

pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format(&self, data: &str) -> Result<String> {
        let value: Value = serde_json::from_str(data)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_prints_engine_output() {
        let formatted = JsonFormatter
            .format("{\"url\":\"http://x/\",\"variations\":[\"/a/\"]}")
            .unwrap();
        assert!(formatted.contains("\"url\": \"http://x/\""));
    }

    #[test]
    fn escaped_nul_survives_reformatting() {
        let formatted = JsonFormatter
            .format("{\"variations\":[\"/a\\u0000b\"]}")
            .unwrap();
        let value: Value = serde_json::from_str(&formatted).unwrap();
        assert_eq!(value["variations"][0].as_str().unwrap(), "/a\u{0}b");
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(JsonFormatter.format("{oops").is_err());
    }
}
