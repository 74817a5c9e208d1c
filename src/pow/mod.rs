// src/pow/mod.rs
//! Proof-of-work core
//!
//! Everything consensus-critical lives here: the epoch seed lifecycle,
//! the memory-hard engine and the per-algorithm dispatch.

/// Top-level dispatch and the per-process [`PowContext`]
pub mod dispatcher;

/// Memory-hard engine lifecycle and the RandomX backend
pub mod engine;

/// Epoch seed derivation and the headers-first resilience cache
pub mod seed;

/// Foreign wire encoding consumed by the memory-hard algorithm
pub mod wire;

// Re-export main components for cleaner imports
pub use self::dispatcher::{DigestProvider, PowContext, odo_key};
pub use self::engine::{EngineBackend, MemoryHardEngine, RandomXBackend};
pub use self::seed::{EpochSeedCache, SeedManager, SeedState, seed_offset};
