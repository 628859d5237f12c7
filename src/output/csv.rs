// File: csv.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

use anyhow::Result;
use serde_json::Value;

use crate::output::OutputFormatter;

pub struct CsvFormatter;

fn csv_escape(field: &str) -> String {
    field.replace('"', "\"\"")
}

impl OutputFormatter for CsvFormatter {
    fn format(&self, data: &str) -> Result<String> {
        let value: Value = serde_json::from_str(data)?;
        let mut out = String::new();

        if value.get("baseline").is_some() {
            out.push_str("variation,status,size,time,bypass,reason\n");
            if let Some(variations) = value["variations"].as_array() {
                for v in variations {
                    out.push_str(&format!(
                        "\"{}\",{},{},{},{},{}\n",
                        csv_escape(v["variation"].as_str().unwrap_or("")),
                        v["status"],
                        v["size"],
                        v["time"],
                        v["bypass"],
                        v["reason"].as_str().unwrap_or("")
                    ));
                }
            }
        } else {
            out.push_str("variation\n");
            if let Some(variations) = value["variations"].as_array() {
                for v in variations {
                    out.push_str(&format!("\"{}\"\n", csv_escape(v.as_str().unwrap_or(""))));
                }
            }
        }

        Ok(out)
    }
}
