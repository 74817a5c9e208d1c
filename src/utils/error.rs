// src/utils/error.rs
use crate::types::Uint256;
use std::io;
use thiserror::Error;

/// Main error type for the proof-of-work validation core
///
/// Covers every failure the seed lifecycle, the memory-hard engine and
/// the surrounding configuration/CLI glue can surface. Seed-resolution
/// errors are deterministic over chain state and should not be retried
/// without new chain data; resource errors may be retried by the caller.
#[derive(Error, Debug)]
pub enum PowError {
    /// The seed-source ancestor for a height is in neither the epoch
    /// seed cache nor the canonical index. Proceeding would mean
    /// hashing with a guessed seed, so this is fatal to the current
    /// validation call; it usually indicates a missing header-first
    /// caching step.
    #[error("no seed ancestor for height {height}: header at {offset} unresolved")]
    UnresolvableSeedAncestor {
        /// Height the seed was requested for
        height: u32,
        /// Epoch-offset height whose header could not be resolved
        offset: u32,
    },

    /// An epoch seed cache slot was re-inserted with a different value.
    /// Entries are write-once; two values for one height means the
    /// caller fed inconsistent chain data.
    #[error("seed cache conflict at height {height}: held {existing}, got {new}")]
    SeedCacheConflict {
        /// Height of the conflicting slot
        height: u32,
        /// Value already held for that height
        existing: Uint256,
        /// Differing value the caller tried to insert
        new: Uint256,
    },

    /// Allocation of the memory-hard cache or execution context failed
    #[error("Engine resource initialization failed: {0}")]
    ResourceInit(String),

    /// Configuration file or parameter errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or parameter errors
    #[error("Invalid input: {0}")]
    Input(String),

    /// Standard I/O operation errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Converts hex decoding errors into PowError
///
/// Hit when parsing seeds, merkle roots or version words from CLI
/// arguments and configuration files.
impl From<hex::FromHexError> for PowError {
    fn from(e: hex::FromHexError) -> Self {
        PowError::Input(format!("Hex conversion failed: {}", e))
    }
}
