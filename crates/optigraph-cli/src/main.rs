#![allow(clippy::doc_markdown)]
//! optigraph - workload harness for the optigraph graph variants.
//!
//! Runs a multi-threaded random operation mix against each selected graph
//! variant and reports throughput and final vertex counts.

mod config;
mod report;
mod workload;

#[cfg(test)]
mod workload_tests;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use optigraph_core::{GraphVariant, ReclamationPolicy};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::BenchConfig;
use crate::report::{append_log, RunReport};
use crate::workload::run_variant;

/// optigraph - compare concurrent graph implementations under load
#[derive(Parser, Debug)]
#[command(name = "optigraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true, env = "OPTIGRAPH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the workload against one or more graph variants
    Run(RunArgs),
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Worker threads per variant
    #[arg(short, long)]
    threads: Option<usize>,

    /// Operations per worker thread
    #[arg(long)]
    ops: Option<u64>,

    /// Graph variant to run (repeatable; default: all)
    #[arg(long = "variant", value_parser = parse_variant)]
    variants: Vec<GraphVariant>,

    /// Reclamation policy of the versioned graph
    #[arg(long, value_parser = parse_policy)]
    policy: Option<ReclamationPolicy>,

    /// Append one line per variant to this file
    #[arg(long)]
    log: Option<PathBuf>,

    /// Seed worker RNGs for a reproducible operation sequence
    #[arg(long)]
    seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    /// Command-line values win over file and environment values.
    fn apply(&self, config: &mut BenchConfig) {
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(ops) = self.ops {
            config.ops_per_thread = ops;
        }
        if !self.variants.is_empty() {
            config.variants.clone_from(&self.variants);
        }
        if let Some(policy) = self.policy {
            config.graph.reclamation = policy;
        }
        if self.log.is_some() {
            config.log_path.clone_from(&self.log);
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

fn parse_variant(value: &str) -> Result<GraphVariant, String> {
    value.parse().map_err(|e: optigraph_core::Error| e.to_string())
}

fn parse_policy(value: &str) -> Result<ReclamationPolicy, String> {
    value.parse().map_err(|e: optigraph_core::Error| e.to_string())
}

fn main() -> Result<()> {
    // Logs go to stderr so `--json` output stays parseable.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = BenchConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Run(args) => run(config, &args),
        Command::Config => {
            let rendered =
                toml::to_string_pretty(&config).context("Failed to render configuration")?;
            print!("{rendered}");
            Ok(())
        }
    }
}

fn run(mut config: BenchConfig, args: &RunArgs) -> Result<()> {
    args.apply(&mut config);
    config.validate().context("Invalid command-line options")?;

    let mut report = RunReport::new(&config);
    for &variant in &config.variants {
        let result = run_variant(variant, &config);
        if let Some(path) = &config.log_path {
            append_log(path, &result)?;
        }
        report.variants.push(result);
    }

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print!("{}", report.render(&config.variants));
    }
    Ok(())
}
