//! # VTable Cache
//!
//! Content-addressed lookup from serialized vtable bytes to the offset where
//! an identical vtable was already written. Keys are the exact bytes the
//! vtable occupies in the buffer, so two tables share a vtable only when
//! their vtables would be byte-for-byte equal.
//!
//! The offsets stored here are builder offsets (distance from the end of the
//! buffer) and remain valid across growth. The cache must be cleared whenever
//! the buffer it describes is reset.

use hashbrown::HashMap;
use smallvec::SmallVec;

/// Inline capacity covers vtables of up to 14 fields without allocating.
pub type VtableBytes = SmallVec<[u8; 32]>;

#[derive(Debug, Default)]
pub struct VtableCache {
    entries: HashMap<VtableBytes, u32>,
    hits: usize,
}

impl VtableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&mut self, vtable: &[u8]) -> Option<u32> {
        let found = self.entries.get(vtable).copied();
        if found.is_some() {
            self.hits += 1;
        }
        found
    }

    /// Records `vtable` as written at `offset`. The first offset recorded for
    /// a given content wins.
    pub fn insert(&mut self, vtable: VtableBytes, offset: u32) {
        self.entries.entry(vtable).or_insert(offset);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of lookups answered from the cache since the last clear.
    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
    }
}
