// src/pow/wire.rs
//! Foreign header encoding for the memory-hard algorithm
//!
//! RandomX reference implementations hash an 80-byte block laid out in
//! their own convention, not the native header encoding: integers stay
//! little-endian but both hashes are emitted in reversed (display)
//! byte order. Cross-implementation hash agreement requires this
//! layout bit for bit.

use crate::chain::{BlockHeader, HEADER_SIZE};

/// Re-encodes a native header into the memory-hard wire layout
///
/// Field order: version, previous hash, merkle root, timestamp,
/// difficulty bits, nonce.
pub fn hashing_blob(header: &BlockHeader) -> [u8; HEADER_SIZE] {
    let mut out = [0u8; HEADER_SIZE];
    out[0..4].copy_from_slice(&header.version.to_le_bytes());
    out[4..36].copy_from_slice(&header.prev_hash.to_display_bytes());
    out[36..68].copy_from_slice(&header.merkle_root.to_display_bytes());
    out[68..72].copy_from_slice(&header.time.to_le_bytes());
    out[72..76].copy_from_slice(&header.bits.to_le_bytes());
    out[76..80].copy_from_slice(&header.nonce.to_le_bytes());
    out
}
