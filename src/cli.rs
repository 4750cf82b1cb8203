//! CLI argument definitions for netperf.

use clap::{Args, Parser, Subcommand, ValueEnum};
use load_generator::{FailurePolicy, LoadRequest, Preset, RoundMode};
use std::time::Duration;

/// Synthetic CPU and memory load for benchmarking.
#[derive(Parser)]
#[command(name = "netperf")]
#[command(about = "Generate bounded synthetic CPU and memory load")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fan out work units and report how many rounds verified
    Run(RunArgs),

    /// List the built-in load presets
    Presets,
}

/// Output format for a run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Summary,
    Table,
    Json,
}

/// Preset choice for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PresetChoice {
    Quick,
    Heavy,
    Delayed,
}

impl From<PresetChoice> for Preset {
    fn from(choice: PresetChoice) -> Self {
        match choice {
            PresetChoice::Quick => Preset::Quick,
            PresetChoice::Heavy => Preset::Heavy,
            PresetChoice::Delayed => Preset::Delayed,
        }
    }
}

/// Arguments for the run command.
#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Base profile; explicit flags below override its values
    #[arg(long, short = 'p', default_value = "quick", env = "NETPERF_PRESET")]
    pub preset: PresetChoice,

    /// Number of concurrent work units
    #[arg(long, short = 'u', env = "NETPERF_UNITS")]
    pub units: Option<usize>,

    /// Minimum rounds per unit
    #[arg(long, env = "NETPERF_ITER_MIN")]
    pub iter_min: Option<u64>,

    /// Maximum rounds per unit (exclusive unless equal to the minimum)
    #[arg(long, env = "NETPERF_ITER_MAX")]
    pub iter_max: Option<u64>,

    /// Minimum startup delay per unit, in milliseconds
    #[arg(long, env = "NETPERF_DELAY_MIN_MS")]
    pub delay_min_ms: Option<u64>,

    /// Maximum startup delay per unit, in milliseconds (exclusive unless equal to the minimum)
    #[arg(long, env = "NETPERF_DELAY_MAX_MS")]
    pub delay_max_ms: Option<u64>,

    /// Count failed rounds instead of aborting the run
    #[arg(long, env = "NETPERF_LENIENT")]
    pub lenient: bool,

    /// Run each round as its own task inside a unit
    #[arg(long, env = "NETPERF_NESTED")]
    pub nested: bool,

    /// Seed for reproducible unit plans and payloads
    #[arg(long, env = "NETPERF_SEED")]
    pub seed: Option<u64>,

    /// Output format
    #[arg(long, short = 'f', default_value = "summary")]
    pub format: OutputFormat,
}

impl RunArgs {
    /// Layer explicit flags over the chosen preset.
    pub fn to_request(&self) -> LoadRequest {
        let base = Preset::from(self.preset).request();

        let policy = if self.lenient {
            FailurePolicy::Lenient
        } else {
            FailurePolicy::Strict
        };
        let mode = if self.nested {
            RoundMode::Nested
        } else {
            RoundMode::Sequential
        };

        LoadRequest::new(self.units.unwrap_or(base.unit_count))
            .with_iterations(
                self.iter_min.unwrap_or(base.iter_min),
                self.iter_max.unwrap_or(base.iter_max),
            )
            .with_delay(
                self.delay_min_ms
                    .map(Duration::from_millis)
                    .unwrap_or(base.delay_min),
                self.delay_max_ms
                    .map(Duration::from_millis)
                    .unwrap_or(base.delay_max),
            )
            .with_policy(policy)
            .with_mode(mode)
    }
}
