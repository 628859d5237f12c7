// File: mod.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

pub mod csv;
pub mod html;
pub mod json;
pub mod terminal;

use anyhow::Result;
use std::path::Path;

/// Renders engine report JSON into one of the output formats.
pub trait OutputFormatter {
    fn format(&self, data: &str) -> Result<String>;

    fn write_to_file(&self, data: &str, path: &str) -> Result<()> {
        let formatted = self.format(data)?;
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, formatted)?;
        Ok(())
    }
}

pub fn formatter_for(name: &str) -> Box<dyn OutputFormatter> {
    match name {
        "csv" => Box::new(csv::CsvFormatter),
        "html" => Box::new(html::HtmlFormatter),
        "terminal" => Box::new(terminal::TerminalFormatter),
        _ => Box::new(json::JsonFormatter),
    }
}
