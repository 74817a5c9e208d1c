// src/cli/mod.rs
//! Command-line interface definitions

/// Subcommand and option structs
pub mod commands;

pub use commands::{Action, AlgoOptions, BenchOptions, Commands, ConfigOptions, SeedOptions};
