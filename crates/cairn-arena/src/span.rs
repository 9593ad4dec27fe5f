//! Allocation handles and arena identity.
//!
//! A [`Span`] names one allocation by `(arena, block, offset, len)`. It is
//! resolved to bytes through the arena that created it, which turns
//! "don't outlive the arena" into a borrow-checked invariant: the slices
//! handed out borrow the arena.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`ArenaId`] allocation.
static ARENA_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for an [`Arena`](crate::Arena).
///
/// Used to reject spans resolved against an arena other than the one that
/// created them. Never reused within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaId(u64);

impl ArenaId {
    /// Allocate a fresh, unique arena ID. Thread-safe.
    pub(crate) fn next() -> Self {
        Self(ARENA_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[cfg(test)]
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Location of a single allocation within an arena.
///
/// Spans are cheap to copy and stay valid for the whole life of the arena
/// that issued them; nothing is ever freed individually.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct Span {
    /// Arena that issued this span.
    pub(crate) arena: ArenaId,
    /// Index into the arena's block list.
    pub(crate) block: usize,
    /// Byte offset within the block.
    pub(crate) offset: usize,
    /// Length of the allocation in bytes.
    pub(crate) len: usize,
}

impl Span {
    pub(crate) fn new(arena: ArenaId, block: usize, offset: usize, len: usize) -> Self {
        Self {
            arena,
            block,
            offset,
            len,
        }
    }

    /// The arena that issued this span.
    pub fn arena(&self) -> ArenaId {
        self.arena
    }

    /// Index of the block holding this span.
    pub fn block(&self) -> usize {
        self.block
    }

    /// Byte offset of this span within its block.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this is a zero-length span.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether two spans share any byte. Empty spans overlap nothing.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.arena == other.arena
            && self.block == other.block
            && !self.is_empty()
            && !other.is_empty()
            && self.offset < other.offset + other.len
            && other.offset < self.offset + self.len
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Span(arena={}, block={}, off={}, len={})",
            self.arena, self.block, self.offset, self.len
        )
    }
}
