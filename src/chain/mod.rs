// src/chain/mod.rs
//! Chain-state boundary
//!
//! The seed lifecycle needs exactly two lookups from the surrounding
//! node: the canonical tip and a header by canonical height. Both are
//! expressed through the [`ChainView`] trait so the core stays
//! agnostic of the node's index structures and locking. Callers must
//! hand in a consistent snapshot; refreshing the seed against a view
//! that mutates mid-call is a caller bug.

/// Block header type and native serialization
pub mod header;

pub use header::{BlockHeader, HEADER_SIZE};

/// A header paired with its canonical height
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChainEntry {
    /// Canonical height of the header
    pub height: u32,
    /// The header itself
    pub header: BlockHeader,
}

/// Read-only view of the canonical chain
///
/// Implementations fail gracefully: out-of-range heights and an empty
/// chain return `None`, never panic.
pub trait ChainView {
    /// Returns the current chain tip, or `None` for an empty chain
    fn tip(&self) -> Option<ChainEntry>;

    /// Returns the header at a canonical height, or `None` when the
    /// index cannot resolve it (yet)
    fn header_at(&self, height: u32) -> Option<BlockHeader>;
}

/// In-memory canonical chain backed by a `Vec`
///
/// Index `i` holds the header at height `i`. Used by tests and the CLI
/// tools; real nodes implement [`ChainView`] over their own index.
#[derive(Default)]
pub struct MemoryChain {
    headers: Vec<BlockHeader>,
}

impl MemoryChain {
    /// Creates an empty chain
    pub fn new() -> Self {
        MemoryChain::default()
    }

    /// Appends a header at the next height
    pub fn push(&mut self, header: BlockHeader) {
        self.headers.push(header);
    }

    /// Current chain length in headers
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// True when no headers are connected
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Drops every header above `height`, simulating a reorg that
    /// rewinds the canonical chain
    pub fn truncate_to(&mut self, height: u32) {
        self.headers.truncate(height as usize + 1);
    }
}

impl ChainView for MemoryChain {
    fn tip(&self) -> Option<ChainEntry> {
        let header = *self.headers.last()?;
        Some(ChainEntry {
            height: (self.headers.len() - 1) as u32,
            header,
        })
    }

    fn header_at(&self, height: u32) -> Option<BlockHeader> {
        self.headers.get(height as usize).copied()
    }
}
