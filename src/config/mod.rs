// src/config/mod.rs
//! Configuration management
//!
//! TOML-backed consensus parameters for the validation core. The
//! embedding node normally supplies [`ConsensusParams`] directly; the
//! file loader exists for the CLI tools and for tests.

/// Core configuration implementation
pub mod config;

// Re-export key items for easy access
pub use config::{Config, ConsensusParams};

use crate::utils::error::PowError;
use std::path::PathBuf;

/// Loads configuration from a TOML file
///
/// # Arguments
/// * `path` - Path to the configuration file
pub fn load(path: impl Into<PathBuf>) -> Result<Config, PowError> {
    Config::load(path)
}

/// Generates a commented configuration template
pub fn generate_template() -> String {
    Config::generate_template()
}
