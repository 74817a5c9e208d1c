// src/pow/engine.rs
//! Memory-hard hashing engine
//!
//! Owns the two expensive RandomX resources: the cache (keyed by the
//! epoch seed, hundreds of MB) and the execution context built on top
//! of it. Both come up lazily on the first hash and are torn down and
//! rebuilt exactly once per seed transition, never speculatively; a
//! rebuild costs seconds. The engine is not safe for
//! concurrent hashing on one instance; callers serialize through it.

use crate::pow::seed::SeedState;
use crate::types::Uint256;
use crate::utils::error::PowError;
use rust_randomx::{Context, Hasher};
use std::sync::Arc;

/// Resource constructors the engine drives
///
/// Splitting cache and execution-context construction behind a trait
/// keeps the rebuild state machine testable without paying for real
/// RandomX allocations; production uses [`RandomXBackend`].
pub trait EngineBackend {
    /// The seed-keyed cache resource
    type Cache;
    /// The execution context built from a cache
    type Vm;

    /// Allocates and initializes a cache from a 256-bit seed
    fn alloc_cache(&self, seed: &Uint256) -> Result<Self::Cache, PowError>;

    /// Builds an execution context over an initialized cache
    fn create_vm(&self, cache: &Self::Cache) -> Result<Self::Vm, PowError>;

    /// Computes the digest of `input` on a ready execution context
    fn hash(&self, vm: &Self::Vm, input: &[u8]) -> Uint256;
}

/// Engine lifecycle, encoded so invalid transitions are unrepresentable
///
/// A context without a cache simply cannot be constructed. The `vm`
/// field is declared before `cache` so drop order destroys the context
/// before the cache it references is released.
enum EngineState<B: EngineBackend> {
    /// No resources allocated
    Uninitialized,
    /// Cache initialized, no execution context yet
    CacheReady {
        /// The seed-keyed cache
        cache: B::Cache,
    },
    /// Steady state: ready to hash
    ContextReady {
        /// Execution context over `cache`
        vm: B::Vm,
        /// The cache the context was built from
        cache: B::Cache,
    },
}

/// Lazily initialized, seed-tracking memory-hard engine
///
/// `hash` observes the shared [`SeedState`]: a dirty flag triggers a
/// full teardown-and-rebuild from `current_seed` before the digest is
/// computed, and is cleared only once the rebuild completed. Build
/// counters are exposed for observability and for the rebuild
/// discipline tests.
pub struct MemoryHardEngine<B: EngineBackend> {
    backend: B,
    state: EngineState<B>,
    cache_builds: u64,
    vm_builds: u64,
    rebuilds: u64,
}

impl<B: EngineBackend> MemoryHardEngine<B> {
    /// Creates an uninitialized engine over a backend
    pub fn new(backend: B) -> Self {
        MemoryHardEngine {
            backend,
            state: EngineState::Uninitialized,
            cache_builds: 0,
            vm_builds: 0,
            rebuilds: 0,
        }
    }

    /// True once the cache has been allocated
    pub fn cache_ready(&self) -> bool {
        !matches!(self.state, EngineState::Uninitialized)
    }

    /// True once the execution context is up (steady state)
    pub fn context_ready(&self) -> bool {
        matches!(self.state, EngineState::ContextReady { .. })
    }

    /// Number of cache allocations performed so far
    pub fn cache_builds(&self) -> u64 {
        self.cache_builds
    }

    /// Number of execution contexts built so far
    pub fn vm_builds(&self) -> u64 {
        self.vm_builds
    }

    /// Number of full seed-change rebuilds performed so far
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Computes the memory-hard digest of `input`
    ///
    /// Side effects, in order: lazy first-use bring-up (cache from the
    /// initial seed, then the context), then a teardown-and-rebuild
    /// from `current_seed` if the seed state is dirty. The dirty flag
    /// is cleared only after the rebuild completed.
    ///
    /// # Errors
    /// [`PowError::ResourceInit`] when the backend fails to allocate;
    /// the engine stays in its last fully constructed state so the
    /// next call retries instead of assuming partial success.
    pub fn hash(&mut self, seeds: &mut SeedState, input: &[u8]) -> Result<Uint256, PowError> {
        if matches!(self.state, EngineState::Uninitialized) {
            let cache = self.build_cache(&seeds.initial_seed())?;
            self.state = EngineState::CacheReady { cache };
        }

        if matches!(self.state, EngineState::CacheReady { .. }) {
            let EngineState::CacheReady { cache } =
                std::mem::replace(&mut self.state, EngineState::Uninitialized)
            else {
                unreachable!()
            };
            match self.build_vm(&cache) {
                Ok(vm) => self.state = EngineState::ContextReady { vm, cache },
                Err(e) => {
                    // Keep the cache so only the context is retried.
                    self.state = EngineState::CacheReady { cache };
                    return Err(e);
                }
            }
        }

        if seeds.is_dirty() {
            self.teardown();
            let cache = self.build_cache(&seeds.current_seed())?;
            let vm = match self.build_vm(&cache) {
                Ok(vm) => vm,
                Err(e) => {
                    self.state = EngineState::CacheReady { cache };
                    return Err(e);
                }
            };
            self.state = EngineState::ContextReady { vm, cache };
            seeds.clear_dirty();
            self.rebuilds += 1;
            log::info!("memory-hard engine rebuilt for seed {}", seeds.current_seed());
        }

        let EngineState::ContextReady { vm, .. } = &self.state else {
            unreachable!("hash past bring-up without a ready context")
        };
        Ok(self.backend.hash(vm, input))
    }

    /// Releases the execution context and the cache
    ///
    /// Idempotent; called on shutdown and before every rebuild. Drop
    /// order within the state guarantees the context goes first.
    pub fn teardown(&mut self) {
        self.state = EngineState::Uninitialized;
    }

    fn build_cache(&mut self, seed: &Uint256) -> Result<B::Cache, PowError> {
        let cache = self.backend.alloc_cache(seed)?;
        self.cache_builds += 1;
        log::debug!("cache init complete (seed {})", seed);
        Ok(cache)
    }

    fn build_vm(&mut self, cache: &B::Cache) -> Result<B::Vm, PowError> {
        let vm = self.backend.create_vm(cache)?;
        self.vm_builds += 1;
        log::debug!("vm init complete");
        Ok(vm)
    }
}

/// Production backend over the `rust_randomx` bindings
///
/// The RandomX `Context` plays the cache role (in fast mode it also
/// carries the 2 GiB dataset), the `Hasher` is the execution context.
pub struct RandomXBackend {
    fast: bool,
}

impl RandomXBackend {
    /// Light mode: ~256 MB cache, slower hashing. The right choice for
    /// validation-only nodes.
    pub fn light() -> Self {
        RandomXBackend { fast: false }
    }

    /// Fast mode: full dataset (~2 GiB), mining-grade throughput
    pub fn fast() -> Self {
        RandomXBackend { fast: true }
    }
}

impl EngineBackend for RandomXBackend {
    type Cache = Arc<Context>;
    type Vm = Hasher;

    fn alloc_cache(&self, seed: &Uint256) -> Result<Self::Cache, PowError> {
        Ok(Arc::new(Context::new(seed.as_bytes(), self.fast)))
    }

    fn create_vm(&self, cache: &Self::Cache) -> Result<Self::Vm, PowError> {
        Ok(Hasher::new(Arc::clone(cache)))
    }

    fn hash(&self, vm: &Self::Vm, input: &[u8]) -> Uint256 {
        let output = vm.hash(input);
        let bytes: [u8; 32] = output
            .as_ref()
            .try_into()
            .expect("RandomX output is 32 bytes");
        Uint256::from_bytes(bytes)
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Cheap instrumented backend standing in for RandomX in tests.

    use super::*;
    use sha2::{Digest, Sha256};
    use std::cell::Cell;

    /// Backend whose "cache" is just the seed it was built from and
    /// whose digest is SHA-256 over seed-then-input. Deterministic,
    /// collision-free across distinct inputs, and failable on demand.
    #[derive(Default)]
    pub(crate) struct MockBackend {
        pub(crate) fail_cache: Cell<bool>,
        pub(crate) fail_vm: Cell<bool>,
    }

    impl EngineBackend for MockBackend {
        type Cache = Uint256;
        type Vm = Uint256;

        fn alloc_cache(&self, seed: &Uint256) -> Result<Self::Cache, PowError> {
            if self.fail_cache.get() {
                return Err(PowError::ResourceInit("mock cache allocation".into()));
            }
            Ok(*seed)
        }

        fn create_vm(&self, cache: &Self::Cache) -> Result<Self::Vm, PowError> {
            if self.fail_vm.get() {
                return Err(PowError::ResourceInit("mock vm construction".into()));
            }
            Ok(*cache)
        }

        fn hash(&self, vm: &Self::Vm, input: &[u8]) -> Uint256 {
            let mut hasher = Sha256::new();
            hasher.update(vm.as_bytes());
            hasher.update(input);
            Uint256::from_bytes(hasher.finalize().into())
        }
    }

    /// The digest the mock backend produces for a given seed and input.
    pub(crate) fn expected_digest(seed: &Uint256, input: &[u8]) -> Uint256 {
        MockBackend::default().hash(seed, input)
    }
}
