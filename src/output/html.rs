// File: html.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

use anyhow::Result;
use chrono::Utc;
use serde_json::Value;

use crate::output::OutputFormatter;

pub struct HtmlFormatter;

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl OutputFormatter for HtmlFormatter {
    fn format(&self, data: &str) -> Result<String> {
        let value: Value = serde_json::from_str(data)?;
        let mut html = String::new();

        html.push_str("<!DOCTYPE html><html><head><title>byprobe report</title>");
        html.push_str("<style>");
        html.push_str("body { font-family: monospace; margin: 40px; }");
        html.push_str(".bypass { color: #28a745; font-weight: bold; }");
        html.push_str(".failed { color: #6c757d; }");
        html.push_str("table { border-collapse: collapse; width: 100%; }");
        html.push_str("th, td { border: 1px solid #ddd; padding: 6px; text-align: left; }");
        html.push_str("th { background-color: #f2f2f2; }");
        html.push_str("</style></head><body>");
        html.push_str("<h1>byprobe report</h1>");
        html.push_str(&format!(
            "<p>Generated: {}</p>",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        ));

        if value.get("baseline").is_some() {
            let baseline = &value["baseline"];
            html.push_str(&format!(
                "<p>Baseline: status {} / {} bytes</p>",
                baseline["status"], baseline["size"]
            ));

            html.push_str("<table><tr><th>Variation</th><th>Status</th><th>Size</th><th>Bypass</th><th>Reason</th></tr>");
            if let Some(variations) = value["variations"].as_array() {
                for v in variations {
                    let bypass = v["bypass"].as_bool().unwrap_or(false);
                    html.push_str(&format!(
                        "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                        if bypass { "bypass" } else { "failed" },
                        html_escape(v["variation"].as_str().unwrap_or("")),
                        v["status"],
                        v["size"],
                        bypass,
                        v["reason"].as_str().unwrap_or("")
                    ));
                }
            }
            html.push_str("</table>");

            if let Some(summary) = value.get("summary") {
                html.push_str(&format!(
                    "<p>Tested {} variants, {} bypasses, {} failed.</p>",
                    summary["total_tested"],
                    summary["successful_bypasses"],
                    summary["failed_attempts"]
                ));
            }
        } else {
            if let Some(url) = value["url"].as_str() {
                html.push_str(&format!("<p>Target: {}</p>", html_escape(url)));
            }
            html.push_str("<ul>");
            if let Some(variations) = value["variations"].as_array() {
                for v in variations {
                    html.push_str(&format!(
                        "<li>{}</li>",
                        html_escape(v.as_str().unwrap_or(""))
                    ));
                }
            }
            html.push_str("</ul>");
        }

        html.push_str("</body></html>");
        Ok(html)
    }
}
