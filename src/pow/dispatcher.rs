// src/pow/dispatcher.rs
//! Proof-of-work dispatch
//!
//! Entry point for validation: decode the algorithm from the header's
//! version bits, refresh the epoch seed for the height, and route to
//! the right digest. The seed refresh runs unconditionally, also for
//! non-memory-hard headers, so the engine stays continuously correct
//! across algorithm transitions at a fork height.

use crate::chain::{BlockHeader, ChainView};
use crate::config::ConsensusParams;
use crate::pow::engine::{EngineBackend, MemoryHardEngine, RandomXBackend};
use crate::pow::seed::SeedManager;
use crate::pow::wire;
use crate::types::{Algorithm, Uint256};
use crate::utils::error::PowError;

/// Externally supplied digest functions
///
/// The byte-level scrypt/groestl/skein/qubit/odo implementations live
/// outside this crate; each is a pure function over the native 80-byte
/// header encoding (odo additionally takes its timestamp-derived key).
pub trait DigestProvider {
    /// scrypt (1024, 1, 1) digest
    fn scrypt(&self, data: &[u8]) -> Uint256;
    /// Groestl digest
    fn groestl(&self, data: &[u8]) -> Uint256;
    /// Skein digest
    fn skein(&self, data: &[u8]) -> Uint256;
    /// Qubit chained digest
    fn qubit(&self, data: &[u8]) -> Uint256;
    /// Odo digest under a shape key
    fn odo(&self, data: &[u8], key: u32) -> Uint256;
}

/// Odo shape key for a block timestamp: the timestamp rounded down to
/// a multiple of the shape change interval
pub fn odo_key(params: &ConsensusParams, time: u32) -> u32 {
    time - time % params.odo_shapechange_interval
}

/// Per-process proof-of-work context
///
/// Owns the seed lifecycle and the memory-hard engine: exactly one
/// instance per process, constructed at startup, torn down at
/// shutdown. Methods take `&mut self`; callers serialize access under
/// the same discipline that guards their chain state.
pub struct PowContext<B: EngineBackend> {
    seeds: SeedManager,
    engine: MemoryHardEngine<B>,
}

impl PowContext<RandomXBackend> {
    /// Creates a context backed by RandomX in light (validation) mode
    pub fn new_light(initial_seed: Uint256) -> Self {
        PowContext::with_backend(initial_seed, RandomXBackend::light())
    }

    /// Creates a context backed by RandomX in fast (mining) mode
    pub fn new_fast(initial_seed: Uint256) -> Self {
        PowContext::with_backend(initial_seed, RandomXBackend::fast())
    }
}

impl<B: EngineBackend> PowContext<B> {
    /// Creates a context over an explicit engine backend
    pub fn with_backend(initial_seed: Uint256, backend: B) -> Self {
        PowContext {
            seeds: SeedManager::new(initial_seed),
            engine: MemoryHardEngine::new(backend),
        }
    }

    /// The seed manager, for state inspection
    pub fn seeds(&self) -> &SeedManager {
        &self.seeds
    }

    /// The memory-hard engine, for counter inspection
    pub fn engine(&self) -> &MemoryHardEngine<B> {
        &self.engine
    }

    /// Records a headers-first header; epoch boundary headers feed the
    /// seed cache before they are connectable
    pub fn observe_header(
        &mut self,
        height: u32,
        header: &BlockHeader,
        params: &ConsensusParams,
    ) -> Result<(), PowError> {
        self.seeds.observe_header(height, header.merkle_root, params)
    }

    /// Refreshes the seed for the current chain tip (bootstrap and
    /// reorg notifications)
    pub fn refresh_from_tip<C: ChainView>(
        &mut self,
        chain: &C,
        params: &ConsensusParams,
    ) -> Result<(), PowError> {
        self.seeds.refresh(chain, None, params)
    }

    /// Memory-hard digest of arbitrary input under the current seed
    ///
    /// Rebuilds the engine first when the seed is dirty. Exposed for
    /// benchmarks and mining callers that assemble their own blobs.
    pub fn memory_hard_hash(&mut self, input: &[u8]) -> Result<Uint256, PowError> {
        self.engine.hash(self.seeds.state_mut(), input)
    }

    /// Releases the engine's resources; idempotent
    pub fn shutdown(&mut self) {
        self.engine.teardown();
    }

    /// Computes the canonical proof-of-work digest for a header
    ///
    /// Refreshes the seed for `height`, then routes on the header's
    /// version bits. Headers with no recognized algorithm yield
    /// [`Uint256::MAX`], an always-invalid digest that lets normal
    /// block rejection handle them without extra branching.
    ///
    /// # Errors
    /// Seed-resolution failures ([`PowError::UnresolvableSeedAncestor`])
    /// and engine resource failures ([`PowError::ResourceInit`]); never
    /// a silently wrong digest.
    pub fn compute_pow_hash<C: ChainView, D: DigestProvider>(
        &mut self,
        header: &BlockHeader,
        height: u32,
        chain: &C,
        params: &ConsensusParams,
        digests: &D,
    ) -> Result<Uint256, PowError> {
        // Keep the seed current even when this header is not
        // memory-hard; algorithm mixes at fork heights rely on it.
        self.seeds.refresh(chain, Some(height), params)?;

        let serialized = header.serialize();
        let digest = match header.algorithm() {
            Algorithm::Sha256d => {
                let digest = header.hash();
                log::debug!("SHA256D - {}", digest);
                digest
            }
            Algorithm::Scrypt => {
                let digest = digests.scrypt(&serialized);
                log::debug!("SCRYPT - {}", digest);
                digest
            }
            Algorithm::Groestl => {
                let digest = digests.groestl(&serialized);
                log::debug!("GROESTL - {}", digest);
                digest
            }
            Algorithm::Skein => {
                let digest = digests.skein(&serialized);
                log::debug!("SKEIN - {}", digest);
                digest
            }
            Algorithm::Qubit => {
                let digest = digests.qubit(&serialized);
                log::debug!("QUBIT - {}", digest);
                digest
            }
            Algorithm::Odo => {
                let key = odo_key(params, header.time);
                let digest = digests.odo(&serialized, key);
                log::debug!("ODO - {}", digest);
                digest
            }
            Algorithm::RandomX => {
                let blob = wire::hashing_blob(header);
                let digest = self.engine.hash(self.seeds.state_mut(), &blob)?;
                log::debug!("RANDOMX - {}", digest);
                digest
            }
            // Rejected anyway; an always-invalid digest rejects it sooner.
            Algorithm::Unknown => Uint256::MAX,
        };

        Ok(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::MemoryChain;
    use crate::pow::engine::mock::{MockBackend, expected_digest};
    use std::cell::RefCell;

    const EPOCH: u32 = 100;

    fn params() -> ConsensusParams {
        ConsensusParams {
            epoch_length: EPOCH,
            odo_shapechange_interval: 600,
            initial_seed: Uint256::ZERO,
        }
    }

    fn merkle(tag: u32) -> Uint256 {
        let mut bytes = [0u8; 32];
        bytes[..4].copy_from_slice(&tag.to_le_bytes());
        Uint256::from_bytes(bytes)
    }

    fn header(algo: Algorithm, height: u32) -> BlockHeader {
        BlockHeader {
            version: algo.version_bits(),
            prev_hash: Uint256::ZERO,
            merkle_root: merkle(height),
            time: 1000 + height,
            bits: 0x1d00_ffff,
            nonce: height,
        }
    }

    fn chain_of(len: u32) -> MemoryChain {
        let mut chain = MemoryChain::new();
        for h in 0..len {
            chain.push(header(Algorithm::RandomX, h));
        }
        chain
    }

    /// Tags each digest with the branch that produced it so routing is
    /// observable.
    #[derive(Default)]
    struct RecordingDigests {
        calls: RefCell<Vec<String>>,
    }

    impl RecordingDigests {
        fn tagged(&self, name: &str, tag: u8) -> Uint256 {
            self.calls.borrow_mut().push(name.to_string());
            let mut bytes = [0u8; 32];
            bytes[0] = tag;
            Uint256::from_bytes(bytes)
        }
    }

    impl DigestProvider for RecordingDigests {
        fn scrypt(&self, _data: &[u8]) -> Uint256 {
            self.tagged("scrypt", 1)
        }
        fn groestl(&self, _data: &[u8]) -> Uint256 {
            self.tagged("groestl", 2)
        }
        fn skein(&self, _data: &[u8]) -> Uint256 {
            self.tagged("skein", 3)
        }
        fn qubit(&self, _data: &[u8]) -> Uint256 {
            self.tagged("qubit", 4)
        }
        fn odo(&self, _data: &[u8], key: u32) -> Uint256 {
            self.calls.borrow_mut().push(format!("odo:{}", key));
            let mut bytes = [0u8; 32];
            bytes[0] = 5;
            Uint256::from_bytes(bytes)
        }
    }

    fn context() -> PowContext<MockBackend> {
        PowContext::with_backend(Uint256::ZERO, MockBackend::default())
    }

    #[test]
    fn each_algorithm_routes_to_its_digest_function() {
        let chain = chain_of(10);
        let digests = RecordingDigests::default();
        let mut ctx = context();

        for (algo, expected_call) in [
            (Algorithm::Scrypt, "scrypt"),
            (Algorithm::Groestl, "groestl"),
            (Algorithm::Skein, "skein"),
            (Algorithm::Qubit, "qubit"),
        ] {
            ctx.compute_pow_hash(&header(algo, 5), 5, &chain, &params(), &digests)
                .unwrap();
            assert_eq!(
                digests.calls.borrow().last().map(String::as_str),
                Some(expected_call),
                "{} header must reach the {} provider",
                algo,
                expected_call
            );
        }
    }

    #[test]
    fn sha256d_returns_the_headers_own_hash() {
        let chain = chain_of(10);
        let digests = RecordingDigests::default();
        let mut ctx = context();

        let h = header(Algorithm::Sha256d, 3);
        let digest = ctx
            .compute_pow_hash(&h, 3, &chain, &params(), &digests)
            .unwrap();
        assert_eq!(digest, h.hash());
        assert!(digests.calls.borrow().is_empty(), "no provider involved");
    }

    #[test]
    fn odo_key_rounds_the_timestamp_down() {
        let p = params();
        assert_eq!(odo_key(&p, 600), 600);
        assert_eq!(odo_key(&p, 1199), 600);
        assert_eq!(odo_key(&p, 1200), 1200);
        assert_eq!(odo_key(&p, 0), 0);

        let chain = chain_of(10);
        let digests = RecordingDigests::default();
        let mut ctx = context();

        let mut h = header(Algorithm::Odo, 2);
        h.time = 1337;
        ctx.compute_pow_hash(&h, 2, &chain, &p, &digests).unwrap();
        assert_eq!(
            digests.calls.borrow().last().map(String::as_str),
            Some("odo:1200")
        );
    }

    #[test]
    fn unknown_algorithm_yields_the_invalid_sentinel() {
        let chain = chain_of(10);
        let digests = RecordingDigests::default();
        let mut ctx = context();

        let mut h = header(Algorithm::Sha256d, 1);
        h.version = 0; // no algorithm code
        let digest = ctx
            .compute_pow_hash(&h, 1, &chain, &params(), &digests)
            .unwrap();
        assert_eq!(digest, Uint256::MAX);
        assert!(digests.calls.borrow().is_empty());
    }

    #[test]
    fn memory_hard_header_hashes_the_wire_blob_under_the_epoch_seed() {
        let chain = chain_of(400);
        let digests = RecordingDigests::default();
        let mut ctx = context();

        let h = header(Algorithm::RandomX, 350);
        let digest = ctx
            .compute_pow_hash(&h, 350, &chain, &params(), &digests)
            .unwrap();

        // Height 350 takes its seed from the height-100 merkle root.
        let expected = expected_digest(&merkle(100), &wire::hashing_blob(&h));
        assert_eq!(digest, expected);
        assert!(digests.calls.borrow().is_empty());
    }

    #[test]
    fn same_epoch_calls_do_not_rebuild_twice() {
        let chain = chain_of(400);
        let digests = RecordingDigests::default();
        let mut ctx = context();

        ctx.compute_pow_hash(&header(Algorithm::RandomX, 310), 310, &chain, &params(), &digests)
            .unwrap();
        let rebuilds = ctx.engine().rebuilds();
        assert!(!ctx.seeds().state().is_dirty());

        ctx.compute_pow_hash(&header(Algorithm::RandomX, 377), 377, &chain, &params(), &digests)
            .unwrap();
        assert_eq!(
            ctx.engine().rebuilds(),
            rebuilds,
            "second hash in the same epoch must not rebuild"
        );
        assert!(!ctx.seeds().state().is_dirty());
    }

    #[test]
    fn non_memory_hard_headers_still_refresh_the_seed() {
        let chain = chain_of(400);
        let digests = RecordingDigests::default();
        let mut ctx = context();

        // A sha256d block at height 350 moves the seed for the randomx
        // block that may follow at the same height range.
        ctx.compute_pow_hash(&header(Algorithm::Sha256d, 350), 350, &chain, &params(), &digests)
            .unwrap();
        assert_eq!(ctx.seeds().state().current_seed(), merkle(100));
        assert!(ctx.seeds().state().is_dirty(), "engine rebuild is pending");
    }

    #[test]
    fn unresolvable_seed_fails_the_whole_call() {
        let chain = chain_of(10);
        let digests = RecordingDigests::default();
        let mut ctx = context();

        let err = ctx
            .compute_pow_hash(
                &header(Algorithm::Sha256d, 999_999),
                999_999,
                &chain,
                &params(),
                &digests,
            )
            .unwrap_err();
        assert!(matches!(err, PowError::UnresolvableSeedAncestor { .. }));
    }

    #[test]
    fn end_to_end_epoch_walk() {
        let chain = chain_of(400);
        let digests = RecordingDigests::default();
        let initial = merkle(0xbeef);
        let mut ctx = PowContext::with_backend(initial, MockBackend::default());
        let p = params();

        // Height 50: epoch 0, initial seed. current_seed starts at
        // zero, so this very first refresh already dirties the engine.
        ctx.compute_pow_hash(&header(Algorithm::RandomX, 50), 50, &chain, &p, &digests)
            .unwrap();
        assert_eq!(ctx.seeds().state().current_seed(), initial);
        assert_eq!(ctx.engine().rebuilds(), 1);

        // Height 150: genesis merkle root.
        ctx.compute_pow_hash(&header(Algorithm::RandomX, 150), 150, &chain, &p, &digests)
            .unwrap();
        assert_eq!(ctx.seeds().state().current_seed(), merkle(0));

        // Height 300: height-100 merkle root, one more rebuild.
        ctx.compute_pow_hash(&header(Algorithm::RandomX, 300), 300, &chain, &p, &digests)
            .unwrap();
        assert_eq!(ctx.seeds().state().current_seed(), merkle(100));
        assert_eq!(ctx.engine().rebuilds(), 3);
    }
}
