// src/utils/logging.rs
//! Logging configuration
//!
//! Thin wrapper around `env_logger` with a compact single-line format.
//! Seed transitions are logged at info, epoch arithmetic and per-branch
//! digest traces at debug, so `RUST_LOG=debug` reproduces the verbose
//! trace of the reference node.

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;

/// Initializes logging with info as the default level
///
/// Logs to stdout; `RUST_LOG` overrides the filter when set.
pub fn init_logging() {
    let mut builder = common_log_config();
    if env::var("RUST_LOG").is_err() {
        builder.filter_level(LevelFilter::Info);
    } else {
        builder.parse_env("RUST_LOG");
    }
    builder.init();
}

/// Initializes logging for the benchmark subcommand
///
/// Defaults to debug so per-second hashrate lines are visible without
/// extra flags.
pub fn init_bench_logging() {
    let mut builder = common_log_config();
    if env::var("RUST_LOG").is_err() {
        builder.filter_level(LevelFilter::Debug);
    } else {
        builder.parse_env("RUST_LOG");
    }
    builder.init();
}

fn common_log_config() -> Builder {
    let mut builder = Builder::new();

    builder
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {} {}] {}",
                buf.timestamp_seconds(),
                record.level(),
                record.module_path().unwrap_or_default(),
                record.args()
            )
        })
        .target(Target::Stdout);

    builder
}
