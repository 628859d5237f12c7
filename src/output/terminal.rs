// File: terminal.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

use anyhow::Result;
use colored::Colorize;
use serde_json::Value;

use crate::output::OutputFormatter;

pub struct TerminalFormatter;

impl TerminalFormatter {
    pub fn print_colored(&self, data: &str) -> Result<()> {
        println!("{}", self.format(data)?);
        Ok(())
    }
}

impl OutputFormatter for TerminalFormatter {
    fn format(&self, data: &str) -> Result<String> {
        let value: Value = serde_json::from_str(data)?;
        let mut out = String::new();

        if let Some(baseline) = value.get("baseline") {
            out.push_str(&format!(
                "{} status={} size={} time={:.1}ms\n",
                "Baseline:".bold(),
                baseline["status"],
                baseline["size"],
                baseline["time"].as_f64().unwrap_or(0.0)
            ));
            out.push('\n');

            if let Some(variations) = value["variations"].as_array() {
                for v in variations {
                    let bypass = v["bypass"].as_bool().unwrap_or(false);
                    let marker = if bypass {
                        "BYPASS".green().bold().to_string()
                    } else {
                        "      ".to_string()
                    };
                    out.push_str(&format!(
                        "  {} {:40} -> {} ({})\n",
                        marker,
                        printable(v["variation"].as_str().unwrap_or("?")),
                        v["status"],
                        v["reason"].as_str().unwrap_or("")
                    ));
                }
            }

            if let Some(summary) = value.get("summary") {
                out.push('\n');
                out.push_str(&format!(
                    "{} tested={} bypasses={} failed={}\n",
                    "Summary:".bold(),
                    summary["total_tested"],
                    summary["successful_bypasses"].to_string().green(),
                    summary["failed_attempts"].to_string().red()
                ));
            }
        } else if let Some(variations) = value["variations"].as_array() {
            if let Some(url) = value["url"].as_str() {
                out.push_str(&format!("{} {}\n", "Target:".bold(), url.yellow()));
            }
            if let Some(technique) = value["technique"].as_str() {
                out.push_str(&format!("{} {}\n", "Technique:".bold(), technique.cyan()));
            }
            out.push_str(&format!("{} variant(s):\n", variations.len()));
            for v in variations {
                out.push_str(&format!("  {}\n", printable(v.as_str().unwrap_or("?"))));
            }
        }

        Ok(out)
    }
}

/// Control bytes would mangle the terminal; show them as escapes.
fn printable(s: &str) -> String {
    s.chars()
        .map(|c| {
            if (c as u32) < 0x20 || c as u32 == 0x7f {
                format!("\\u{:04X}", c as u32)
            } else {
                c.to_string()
            }
        })
        .collect()
}
