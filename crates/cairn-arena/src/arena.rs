//! The block-based bump arena.
//!
//! [`Arena`] serves allocations from a cursor over the active block. When
//! the cursor cannot satisfy a request it falls back to one of two paths:
//!
//! 1. **Large request** (`size > block_size / 4`): a dedicated block of
//!    exactly `size` bytes. The cursor is untouched, so the active block's
//!    leftover space remains available for later small requests.
//! 2. **Small request**: a fresh `block_size` block becomes active. The
//!    tail of the previous block is wasted.
//!
//! Blocks are released together when the arena is dropped.

use std::fmt;
use std::ptr;

use tracing::{debug, trace};

use crate::config::{ArenaConfig, ALIGN, BLOCK_OVERHEAD};
use crate::error::ArenaError;
use crate::metrics::ArenaStats;
use crate::raw::RawBlock;
use crate::span::{ArenaId, Span};
use crate::usage::{UsageCell, UsageCounter};

/// Bump position within the active block.
///
/// Invariant: `offset + remaining` equals the active block's length once
/// a regular block exists; before that `remaining` is zero.
#[derive(Clone, Copy, Debug, Default)]
struct Cursor {
    block: usize,
    offset: usize,
    remaining: usize,
}

/// Region allocator for many small allocations sharing one lifetime.
///
/// Allocation takes `&mut self`; resolving a [`Span`] to bytes borrows the
/// arena, so no slice can outlive it. Memory usage can be observed from
/// other threads through a [`UsageCounter`].
///
/// `Arena` is deliberately not `Clone`: a copied cursor without copied
/// blocks would hand out the same bytes twice.
///
/// # Example
///
/// ```
/// use cairn_arena::Arena;
///
/// let mut arena = Arena::new();
/// let key = arena.allocate_copy(b"apple");
/// let node = arena.allocate_aligned(32);
/// assert_eq!(arena.get(key).unwrap(), b"apple");
/// assert_eq!(arena.as_ptr(node).unwrap() as usize % cairn_arena::ALIGN, 0);
/// ```
pub struct Arena {
    id: ArenaId,
    config: ArenaConfig,
    /// Every block ever created, in creation order. `Span::block` indexes here.
    blocks: Vec<RawBlock>,
    cursor: Cursor,
    usage: UsageCell,
    bytes_allocated: usize,
    bytes_wasted: usize,
}

// Compile-time assertion: Arena must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Arena>();
};

impl Arena {
    /// Create an empty arena with the default 4096-byte block size.
    ///
    /// No memory is allocated until the first request.
    pub fn new() -> Self {
        Self::from_config(ArenaConfig::default())
    }

    /// Create an empty arena with a custom configuration.
    ///
    /// Returns `Err(ArenaError::InvalidConfig)` if the config fails
    /// [`ArenaConfig::validate`].
    pub fn with_config(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: ArenaConfig) -> Self {
        Self {
            id: ArenaId::next(),
            config,
            blocks: Vec::new(),
            cursor: Cursor::default(),
            usage: UsageCell::new(),
            bytes_allocated: 0,
            bytes_wasted: 0,
        }
    }

    /// Allocate `size` bytes with no alignment guarantee.
    ///
    /// The returned span is exclusively owned by the caller and valid
    /// until the arena is dropped. Its bytes are zero on first access.
    ///
    /// `size` must be non-zero. Debug builds panic on a zero-byte request;
    /// release builds return an empty span and consume nothing.
    pub fn allocate(&mut self, size: usize) -> Span {
        debug_assert!(size > 0, "zero-byte arena allocation");
        if size == 0 {
            return self.empty_span();
        }
        if size <= self.cursor.remaining {
            return self.carve(0, size);
        }
        self.allocate_fallback(size)
    }

    /// Allocate `size` bytes at an address that is a multiple of [`ALIGN`].
    ///
    /// Padding needed to align the cursor is skipped over and counted as
    /// waste. Same zero-size contract as [`Arena::allocate`].
    pub fn allocate_aligned(&mut self, size: usize) -> Span {
        debug_assert!(size > 0, "zero-byte arena allocation");
        if size == 0 {
            return self.empty_span();
        }
        let current_mod = self.cursor_addr() & (ALIGN - 1);
        let slop = if current_mod == 0 { 0 } else { ALIGN - current_mod };
        let span = match size.checked_add(slop) {
            Some(needed) if needed <= self.cursor.remaining => self.carve(slop, size),
            // Fresh blocks start ALIGN-aligned.
            _ => self.allocate_fallback(size),
        };
        debug_assert_eq!(self.span_addr(span) % ALIGN, 0);
        span
    }

    /// Allocate a copy of `bytes` with no alignment guarantee.
    ///
    /// `bytes` must be non-empty.
    pub fn allocate_copy(&mut self, bytes: &[u8]) -> Span {
        let span = self.allocate(bytes.len());
        self.resolve_mut(span).copy_from_slice(bytes);
        span
    }

    /// Allocate an [`ALIGN`]-aligned copy of `bytes`.
    ///
    /// `bytes` must be non-empty.
    pub fn allocate_aligned_copy(&mut self, bytes: &[u8]) -> Span {
        let span = self.allocate_aligned(bytes.len());
        self.resolve_mut(span).copy_from_slice(bytes);
        span
    }

    /// Approximate bytes consumed by all blocks created so far.
    ///
    /// Counts block payload plus [`BLOCK_OVERHEAD`] per block, not the bytes
    /// requested by callers. Non-decreasing over the arena's lifetime.
    pub fn memory_usage(&self) -> usize {
        self.usage.get()
    }

    /// A thread-safe reader for [`Arena::memory_usage`].
    ///
    /// The reader shares the arena's counter and may be polled from any
    /// thread while this arena keeps allocating. Reads are relaxed and
    /// can observe a stale value.
    pub fn usage_counter(&self) -> UsageCounter {
        self.usage.reader()
    }

    /// Borrow the bytes of a span issued by this arena.
    pub fn get(&self, span: Span) -> Result<&[u8], ArenaError> {
        self.check_owner(span)?;
        Ok(self.resolve(span))
    }

    /// Mutably borrow the bytes of a span issued by this arena.
    pub fn get_mut(&mut self, span: Span) -> Result<&mut [u8], ArenaError> {
        self.check_owner(span)?;
        Ok(self.resolve_mut(span))
    }

    /// Raw address of the first byte of a span.
    ///
    /// The pointer is valid for `span.len()` bytes until the arena is
    /// dropped. Empty spans may yield a null pointer.
    pub fn as_ptr(&self, span: Span) -> Result<*const u8, ArenaError> {
        self.check_owner(span)?;
        Ok(self.span_ptr(span))
    }

    /// Number of blocks created so far.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Bytes left in the active block.
    pub fn remaining(&self) -> usize {
        self.cursor.remaining
    }

    /// The configuration this arena was created with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// This arena's unique identifier.
    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// Snapshot of the arena's allocation statistics.
    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            block_count: self.blocks.len(),
            memory_usage: self.usage.get(),
            bytes_allocated: self.bytes_allocated,
            bytes_wasted: self.bytes_wasted,
            remaining: self.cursor.remaining,
        }
    }

    fn allocate_fallback(&mut self, size: usize) -> Span {
        if size > self.config.large_threshold() {
            // Dedicated block: leave the cursor where it is so the active
            // block's tail stays usable.
            let block = self.new_block(size);
            debug!(arena = %self.id, block, size, "dedicated block for large allocation");
            self.bytes_allocated += size;
            return Span::new(self.id, block, 0, size);
        }

        if self.cursor.remaining > 0 {
            debug!(
                arena = %self.id,
                wasted = self.cursor.remaining,
                size,
                "abandoning tail of active block"
            );
            self.bytes_wasted += self.cursor.remaining;
        }
        let block = self.new_block(self.config.block_size);
        self.cursor = Cursor {
            block,
            offset: 0,
            remaining: self.blocks[block].len(),
        };
        self.carve(0, size)
    }

    /// Create a block of `len` bytes and return its index.
    fn new_block(&mut self, len: usize) -> usize {
        let index = self.blocks.len();
        self.blocks.push(RawBlock::new(len));
        self.usage.add(len + BLOCK_OVERHEAD);
        trace!(
            arena = %self.id,
            block = index,
            len,
            memory_usage = self.usage.get(),
            "arena block created"
        );
        index
    }

    /// Skip `slop` bytes, then take `size` bytes from the cursor.
    ///
    /// Caller guarantees `slop + size <= self.cursor.remaining`.
    fn carve(&mut self, slop: usize, size: usize) -> Span {
        let needed = slop + size;
        debug_assert!(needed <= self.cursor.remaining);
        let span = Span::new(self.id, self.cursor.block, self.cursor.offset + slop, size);
        self.cursor.offset += needed;
        self.cursor.remaining -= needed;
        self.bytes_allocated += size;
        self.bytes_wasted += slop;
        span
    }

    fn empty_span(&self) -> Span {
        Span::new(self.id, self.cursor.block, self.cursor.offset, 0)
    }

    /// Address of the cursor, or 0 before the first regular block.
    fn cursor_addr(&self) -> usize {
        if self.cursor.remaining == 0 {
            return 0;
        }
        self.blocks[self.cursor.block].addr() + self.cursor.offset
    }

    fn span_ptr(&self, span: Span) -> *const u8 {
        self.blocks
            .get(span.block)
            .map_or(ptr::null(), |b| b.as_ptr().wrapping_add(span.offset))
    }

    fn span_addr(&self, span: Span) -> usize {
        self.span_ptr(span) as usize
    }

    fn check_owner(&self, span: Span) -> Result<(), ArenaError> {
        if span.arena != self.id {
            return Err(ArenaError::ForeignSpan {
                span_arena: span.arena,
                arena: self.id,
            });
        }
        Ok(())
    }

    /// Resolve a span known to belong to this arena.
    fn resolve(&self, span: Span) -> &[u8] {
        if span.is_empty() {
            return &[];
        }
        &self.blocks[span.block].as_slice()[span.offset..span.offset + span.len]
    }

    fn resolve_mut(&mut self, span: Span) -> &mut [u8] {
        if span.is_empty() {
            return &mut [];
        }
        &mut self.blocks[span.block].as_mut_slice()[span.offset..span.offset + span.len]
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("id", &self.id)
            .field("block_size", &self.config.block_size)
            .field("block_count", &self.blocks.len())
            .field("remaining", &self.cursor.remaining)
            .field("memory_usage", &self.usage.get())
            .finish()
    }
}
