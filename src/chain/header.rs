// src/chain/header.rs
use crate::types::{Algorithm, Uint256};
use sha2::{Digest, Sha256};

/// Byte length of the native serialized header
pub const HEADER_SIZE: usize = 80;

/// A block header as seen by the validation core
///
/// Read-only view over the fields PoW selection and hashing consume:
/// the version word picks the algorithm, the merkle root seeds the
/// memory-hard epochs and the timestamp keys Odo.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockHeader {
    /// Version word; bits 9..12 select the PoW algorithm
    pub version: u32,
    /// Hash of the previous block
    pub prev_hash: Uint256,
    /// Merkle root of the block's transactions
    pub merkle_root: Uint256,
    /// Block timestamp (seconds since epoch)
    pub time: u32,
    /// Compact difficulty target
    pub bits: u32,
    /// PoW nonce
    pub nonce: u32,
}

impl BlockHeader {
    /// Serializes the header in the native encoding
    ///
    /// Little-endian integers, hashes in internal byte order: the
    /// 80-byte layout every non-memory-hard digest function consumes.
    pub fn serialize(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&self.version.to_le_bytes());
        out[4..36].copy_from_slice(self.prev_hash.as_bytes());
        out[36..68].copy_from_slice(self.merkle_root.as_bytes());
        out[68..72].copy_from_slice(&self.time.to_le_bytes());
        out[72..76].copy_from_slice(&self.bits.to_le_bytes());
        out[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        out
    }

    /// Double SHA-256 of the native encoding: the header's identity
    /// hash, and also its PoW digest under the SHA256D algorithm.
    pub fn hash(&self) -> Uint256 {
        let first = Sha256::digest(self.serialize());
        let second = Sha256::digest(first);
        Uint256::from_bytes(second.into())
    }

    /// Algorithm selected by this header's version bits
    pub fn algorithm(&self) -> Algorithm {
        Algorithm::from_version(self.version)
    }
}
