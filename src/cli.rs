// File: cli.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long = "log-level", default_value = "warn", global = true)]
    pub log_level: String,

    #[arg(long = "log-file", help = "Write log output to a file", global = true)]
    pub log_file: Option<PathBuf>,

    #[arg(
        short = 'v',
        long = "verbose",
        help = "Enable verbose output",
        global = true
    )]
    pub verbose: bool,

    #[arg(long = "no-color", help = "Disable colored output", global = true)]
    pub no_color: bool,

    #[arg(
        short = 'f',
        long = "format",
        default_value = "terminal",
        help = "Output format: terminal, json, csv, html",
        global = true
    )]
    pub format: String,

    #[arg(
        short = 'o',
        long = "output-file",
        help = "Write results to a file instead of stdout",
        global = true
    )]
    pub output_file: Option<String>,

    #[arg(
        short = 't',
        long = "timeout",
        default_value_t = 30_000,
        help = "Request timeout in milliseconds",
        global = true
    )]
    pub timeout_ms: u64,

    #[arg(long = "user-agent", help = "Override the User-Agent header", global = true)]
    pub user_agent: Option<String>,

    #[arg(
        long = "verify-tls",
        help = "Verify TLS certificates (off by default; probes routinely hit broken certs)",
        global = true
    )]
    pub verify_tls: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate bypass variations for a target without sending requests
    Scan {
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Generate variations for a single technique
    Test {
        #[arg(value_name = "URL")]
        url: String,

        #[arg(short = 'T', long = "technique", value_name = "TECHNIQUE")]
        technique: String,
    },

    /// Dispatch variants against the target and classify the responses
    Probe {
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Fingerprint the WAF in front of a target (placeholder)
    Detect {
        #[arg(value_name = "URL")]
        url: String,
    },

    /// List available bypass techniques
    List {
        #[arg(short = 'c', long = "category")]
        category: Option<String>,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
