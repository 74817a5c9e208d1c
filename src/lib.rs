//! multipow - proof-of-work validation core for a multi-algorithm chain
//!
//! This crate decides which hashing algorithm secures a block header,
//! computes the canonical proof-of-work digest for it, and manages the
//! epoch-seeded memory-hard (RandomX) engine whose state must track
//! chain history correctly under headers-first sync and reorgs:
//! - Version-bit algorithm selection with name/alias lookups
//! - Epoch seed derivation with a headers-first resilience cache
//! - Lazy, rebuild-on-seed-change RandomX engine lifecycle
//! - Dispatch across SHA256D, scrypt, Groestl, Skein, Qubit, Odo and
//!   RandomX, with external digest functions behind a trait boundary

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Chain-state boundary: headers and the canonical-chain view
pub mod chain;

/// Command-line interface definitions
pub mod cli;

/// Configuration management
pub mod config;

/// Proof-of-work core: seeds, engine and dispatch
pub mod pow;

/// Shared type definitions
pub mod types;

/// Utility functions and error handling
pub mod utils;

// Core exports
pub use chain::{BlockHeader, ChainEntry, ChainView, MemoryChain};
pub use cli::Commands;
pub use config::{Config, ConsensusParams};
pub use pow::{
    DigestProvider, EngineBackend, EpochSeedCache, MemoryHardEngine, PowContext, RandomXBackend,
    SeedManager, SeedState,
};
pub use types::{Algorithm, Uint256};
pub use utils::{PowError, init_logging};
