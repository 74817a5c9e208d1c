// src/cli/commands.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// multipow CLI - multi-algorithm proof-of-work inspection tools
#[derive(Parser, Debug)]
#[command(name = "multipow")]
#[command(version, about, long_about = None)]
pub struct Commands {
    /// The action to perform
    #[command(subcommand)]
    pub action: Action,
}

/// Top-level subcommands
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Decode or look up a proof-of-work algorithm
    Algo(AlgoOptions),

    /// Inspect the epoch seed schedule for a height
    Seed(SeedOptions),

    /// Benchmark the memory-hard engine
    Bench(BenchOptions),

    /// Generate a configuration file template
    Config(ConfigOptions),
}

/// Options for algorithm lookups
#[derive(Parser, Debug)]
pub struct AlgoOptions {
    /// Algorithm name or alias (e.g. "sha", "odosha3", "rx/0")
    #[arg(short, long, conflicts_with = "bits")]
    pub name: Option<String>,

    /// Block version word, hex or decimal (e.g. 0x0e00)
    #[arg(short, long)]
    pub bits: Option<String>,
}

/// Options for seed schedule inspection
#[derive(Parser, Debug)]
pub struct SeedOptions {
    /// Block height to inspect
    pub height: u32,

    /// Epoch length in blocks (overrides config)
    #[arg(short, long)]
    pub epoch_length: Option<u32>,

    /// Path to configuration file
    #[arg(short, long, default_value = "multipow.toml")]
    pub config: PathBuf,
}

/// Options for the engine benchmark
#[derive(Parser, Debug)]
pub struct BenchOptions {
    /// Duration of the benchmark in seconds
    #[arg(short, long, default_value_t = 30)]
    pub duration: u64,

    /// Seed to key the engine with (hex, display order; defaults to zero)
    #[arg(short, long)]
    pub seed: Option<String>,

    /// Use fast mode (full dataset, ~2 GiB) instead of light mode
    #[arg(short, long)]
    pub fast: bool,
}

/// Options for generating configuration files
#[derive(Parser, Debug)]
pub struct ConfigOptions {
    /// Output file path
    #[arg(short, long, default_value = "multipow.toml")]
    pub output: PathBuf,
}
