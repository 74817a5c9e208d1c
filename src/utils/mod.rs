// src/utils/mod.rs
//! Shared utilities: error taxonomy and logging setup.

/// Error types for the validation core
///
/// Contains the [`PowError`] enum covering seed resolution, engine
/// resource and configuration failures.
pub mod error;

/// Logging initialization built on `env_logger`
pub mod logging;

// Re-export for easier access
pub use error::PowError;
pub use logging::init_logging;
