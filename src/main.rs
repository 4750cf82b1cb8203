//! Command-line interface for netperf
//!
//! # Usage Examples
//!
//! ```bash
//! # Default profile: 4 units, 10-20 rounds each, 100-300ms startup jitter
//! netperf run
//!
//! # Heavier load with per-unit output
//! netperf run --preset heavy --units 64 --format table
//!
//! # Keep going when rounds fail, rounds as nested tasks, JSON report
//! netperf run --lenient --nested --seed 42 --format json
//!
//! # Show built-in presets
//! netperf presets
//! ```
//!
//! Set `RUST_LOG=netperf=info,load_generator=debug` to watch unit state changes.

mod cli;
mod environment;
mod output;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, OutputFormat, RunArgs};
use load_generator::LoadGenerator;
use output::RunOutput;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_load(args).await,
        Commands::Presets => {
            println!("{}", output::format_presets());
            Ok(())
        }
    }
}

async fn run_load(args: RunArgs) -> anyhow::Result<()> {
    let environment = environment::log_runtime_environment();
    let request = args.to_request();

    info!(
        "Starting load: {} units, rounds {}..{}, delay {:?}..{:?}",
        request.unit_count, request.iter_min, request.iter_max, request.delay_min, request.delay_max
    );

    let generator = match args.seed {
        Some(seed) => LoadGenerator::with_seed(seed),
        None => LoadGenerator::new(),
    };

    let report = generator
        .execute(&request)
        .await
        .context("Load generation failed")?;

    match args.format {
        OutputFormat::Summary => println!("{}", report.summary()),
        OutputFormat::Table => println!("{}", output::format_table(&report)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&RunOutput {
                environment: &environment,
                report: &report,
            })?;
            println!("{json}");
        }
    }

    Ok(())
}
