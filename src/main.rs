// File: main.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use byprobe::cli::{parse_args, Cli, Commands};
use byprobe::config::ScanConfig;
use byprobe::engine::Engine;
use byprobe::output::{formatter_for, terminal::TerminalFormatter, OutputFormatter};
use byprobe::techniques::{is_known, TECHNIQUES};

fn init_logging(level: &str, log_file: Option<&Path>) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(level);
    if let Some(path) = log_file {
        match std::fs::File::create(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("could not open log file {}: {}", path.display(), e),
        }
    }
    builder.init();
}

fn scan_config(args: &Cli) -> ScanConfig {
    let mut config = ScanConfig::default();
    config.timeout_ms = args.timeout_ms;
    config.verify_tls = args.verify_tls;
    if let Some(agent) = &args.user_agent {
        config.user_agent = agent.clone();
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args();

    init_logging(&args.log_level, args.log_file.as_deref());
    if args.no_color {
        colored::control::set_override(false);
    }

    if args.verbose {
        println!(
            "{} {}",
            env!("CARGO_PKG_NAME").bold().green(),
            Engine::version()
        );
        println!();
    }

    let config = scan_config(&args);
    let engine = Engine::with_config(&config);
    let config_json = config.to_json()?;

    let result_json = match &args.command {
        Commands::Scan { url } => {
            if args.verbose {
                println!("{} {}", "Scanning".bold(), url.yellow());
            }
            engine.scan(url, &config_json)?
        }
        Commands::Test { url, technique } => {
            if args.verbose {
                println!(
                    "{} {} on {}",
                    "Testing technique".bold(),
                    technique.cyan(),
                    url.yellow()
                );
            }
            if !is_known(technique) {
                eprintln!(
                    "{} unknown technique {:?}; see `byprobe list`",
                    "warning:".yellow().bold(),
                    technique
                );
            }
            engine.test_technique(url, technique)?
        }
        Commands::Probe { url } => {
            if args.verbose {
                println!("{} {}", "Probing".bold(), url.yellow());
            }
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner:.green} {msg}")
                    .unwrap()
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
            );
            spinner.set_message(format!("dispatching variants against {}", url));
            spinner.enable_steady_tick(Duration::from_millis(120));

            let outcome = engine.test_variations(url, &config_json).await;
            spinner.finish_and_clear();
            outcome?
        }
        Commands::Detect { url } => {
            if args.verbose {
                println!("{} {}", "Detecting WAF for".bold(), url.yellow());
            }
            engine.detect_waf(url)?
        }
        Commands::List { category } => {
            print_technique_list(category.as_deref());
            return Ok(());
        }
    };

    emit(&args, &result_json)?;
    Ok(())
}

fn emit(args: &Cli, result_json: &str) -> Result<()> {
    if let Some(path) = &args.output_file {
        let formatter = formatter_for(&args.format);
        formatter.write_to_file(result_json, path)?;
        println!("{} {}", "Results written to".green(), path);
        return Ok(());
    }

    match args.format.as_str() {
        "terminal" => TerminalFormatter.print_colored(result_json)?,
        other => {
            let formatter = formatter_for(other);
            println!("{}", formatter.format(result_json)?);
        }
    }
    Ok(())
}

fn print_technique_list(category: Option<&str>) {
    println!("{}", "Available bypass techniques:".bold().green());
    println!();
    for (name, description) in TECHNIQUES {
        if let Some(filter) = category {
            if !name.contains(filter) {
                continue;
            }
        }
        println!("  {:16} {}", name.cyan().bold(), description);
    }
    println!();
    println!("{}", "Examples:".bold().yellow());
    println!("  byprobe test https://example.com/admin -T path_bypass");
    println!("  byprobe probe https://example.com/admin -f json -o report.json");
}
