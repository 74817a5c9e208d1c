// src/pow/seed.rs
//! Epoch seed derivation
//!
//! The memory-hard algorithm is re-keyed every epoch from the merkle
//! root of a header two epochs back (clamped at the chain start). That
//! ancestor may not be resolvable through the canonical index during
//! headers-first sync, so boundary headers are cached eagerly the
//! moment they are observed, before they are linked into the chain.
//!
//! All mutation happens through [`SeedManager`] under whatever lock the
//! embedding node uses for chain state; the types here carry no locking
//! of their own.

use crate::chain::ChainView;
use crate::config::ConsensusParams;
use crate::types::Uint256;
use crate::utils::error::PowError;
use std::collections::HashMap;

/// Process-wide seed state wired into the memory-hard engine
///
/// `initial_seed` is fixed at construction; `current_seed` tracks the
/// seed required for the most recently refreshed height. The dirty
/// flag is raised on every transition and cleared only when the engine
/// finishes rebuilding, so it is true exactly while the engine's
/// resources are keyed to a stale seed.
#[derive(Debug, Clone)]
pub struct SeedState {
    initial_seed: Uint256,
    current_seed: Uint256,
    dirty: bool,
}

impl SeedState {
    /// Creates the state with a fixed epoch-0 seed.
    ///
    /// `current_seed` starts at zero, not at `initial_seed`; the first
    /// refresh inside epoch 0 therefore marks dirty whenever the
    /// configured initial seed is nonzero.
    pub fn new(initial_seed: Uint256) -> Self {
        SeedState {
            initial_seed,
            current_seed: Uint256::ZERO,
            dirty: false,
        }
    }

    /// Seed for epoch-0 heights, immutable for the process lifetime
    pub fn initial_seed(&self) -> Uint256 {
        self.initial_seed
    }

    /// Seed the engine must be keyed to for the current height
    pub fn current_seed(&self) -> Uint256 {
        self.current_seed
    }

    /// True while the engine still holds resources built from a
    /// previous seed
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn set_current(&mut self, seed: Uint256) {
        self.current_seed = seed;
        self.dirty = true;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

/// Height → seed-source map surviving out-of-order header delivery
///
/// Entries are write-once: re-inserting the held value is a no-op,
/// a differing value is a [`PowError::SeedCacheConflict`]. Not
/// persisted; rebuilt on demand from chain data after a restart.
#[derive(Debug, Default)]
pub struct EpochSeedCache {
    entries: HashMap<u32, Uint256>,
}

impl EpochSeedCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        EpochSeedCache::default()
    }

    /// Looks up the cached seed source for a height
    pub fn get(&self, height: u32) -> Option<Uint256> {
        self.entries.get(&height).copied()
    }

    /// Idempotent insert of a seed source for a height
    pub fn insert(&mut self, height: u32, seed: Uint256) -> Result<(), PowError> {
        match self.entries.get(&height) {
            None => {
                self.entries.insert(height, seed);
                Ok(())
            }
            Some(existing) if *existing == seed => Ok(()),
            Some(existing) => Err(PowError::SeedCacheConflict {
                height,
                existing: *existing,
                new: seed,
            }),
        }
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Seed-source height for `height` under epoch length `epoch_length`
///
/// `(epoch_current - epoch_length) - epoch_length`, each step clamped
/// at zero: two epochs back from the epoch containing `height`. The
/// two-epoch lag is consensus; do not "correct" it to one.
pub fn seed_offset(height: u32, epoch_length: u32) -> u32 {
    let epoch_current = (height / epoch_length) * epoch_length;
    let epoch_prev = epoch_current.saturating_sub(epoch_length);
    epoch_prev.saturating_sub(epoch_length)
}

/// Computes and caches the seed required for each refreshed height
///
/// One instance per process, owned by the validation context and
/// driven under the chain-state lock.
#[derive(Debug)]
pub struct SeedManager {
    state: SeedState,
    cache: EpochSeedCache,
}

impl SeedManager {
    /// Creates a manager with a fixed epoch-0 seed and an empty cache
    pub fn new(initial_seed: Uint256) -> Self {
        SeedManager {
            state: SeedState::new(initial_seed),
            cache: EpochSeedCache::new(),
        }
    }

    /// The current seed state
    pub fn state(&self) -> &SeedState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut SeedState {
        &mut self.state
    }

    /// The epoch seed cache
    pub fn cache(&self) -> &EpochSeedCache {
        &self.cache
    }

    /// Records a header observed at an exact epoch boundary
    ///
    /// Must be called for every header accepted during headers-first
    /// sync, before it is connectable: descendants two epochs later
    /// resolve their seed from this cache when the canonical index
    /// cannot answer the lookup yet. Non-boundary heights are ignored.
    pub fn observe_header(
        &mut self,
        height: u32,
        merkle_root: Uint256,
        params: &ConsensusParams,
    ) -> Result<(), PowError> {
        if height != 0 && height % params.epoch_length == 0 {
            log::debug!("caching boundary header at height {}", height);
            self.cache.insert(height, merkle_root)?;
        }
        Ok(())
    }

    /// Recomputes the seed that should be active for `height`
    ///
    /// With `height = None` the tip height is used; an empty chain
    /// forces the zero seed and marks dirty (bootstrap). On a seed
    /// mismatch `current_seed` is updated and the dirty flag raised so
    /// the engine rebuilds before its next hash.
    ///
    /// # Errors
    /// [`PowError::UnresolvableSeedAncestor`] when the seed-source
    /// header is in neither the cache nor the canonical index. The
    /// caller must not proceed to hash at this height.
    pub fn refresh<C: ChainView>(
        &mut self,
        chain: &C,
        height: Option<u32>,
        params: &ConsensusParams,
    ) -> Result<(), PowError> {
        let height = match height {
            Some(h) => h,
            None => match chain.tip() {
                Some(entry) => entry.height,
                None => {
                    // Fresh chain: no header exists to derive from.
                    self.state.set_current(Uint256::ZERO);
                    return Ok(());
                }
            },
        };

        let epoch_length = params.epoch_length;
        let epoch_current = (height / epoch_length) * epoch_length;
        let epoch_prev = epoch_current.saturating_sub(epoch_length);
        let offset = seed_offset(height, epoch_length);

        log::debug!(
            "height {} epoch_length {} epoch_prev {} epoch_current {}",
            height,
            epoch_length,
            epoch_prev,
            epoch_current
        );

        // Boundary heights feed later epochs; cache them whenever the
        // index can already see the header. Headers-first sync covers
        // the remaining cases through observe_header.
        if height != 0 && height % epoch_length == 0 {
            if let Some(header) = chain.header_at(height) {
                self.cache.insert(height, header.merkle_root)?;
            }
        }

        let prestage = if height < epoch_length {
            self.state.initial_seed()
        } else if let Some(seed) = self.cache.get(offset) {
            seed
        } else {
            let header = chain
                .header_at(offset)
                .ok_or(PowError::UnresolvableSeedAncestor { height, offset })?;
            self.cache.insert(offset, header.merkle_root)?;
            header.merkle_root
        };

        if self.state.current_seed() != prestage {
            log::info!(
                "seed has changed (from {} to {})",
                self.state.current_seed(),
                prestage
            );
            self.state.set_current(prestage);
        }

        Ok(())
    }
}
