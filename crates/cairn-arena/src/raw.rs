//! Low-level block storage.
//!
//! This is the only module in the crate allowed to use `unsafe`. It owns
//! one heap allocation per [`RawBlock`] and exposes it as plain byte
//! slices; everything above this module is safe code.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::process;
use std::ptr::NonNull;
use std::slice;

use tracing::error;

use crate::config::ALIGN;

/// A fixed-size, zero-filled, `ALIGN`-aligned heap buffer.
///
/// The buffer never moves or resizes, so addresses derived from it stay
/// stable for as long as the block is alive, including across moves of
/// the `RawBlock` value itself.
pub(crate) struct RawBlock {
    ptr: NonNull<u8>,
    len: usize,
}

// SAFETY: a RawBlock uniquely owns its allocation, like `Box<[u8]>`.
unsafe impl Send for RawBlock {}
// SAFETY: shared access only hands out `&[u8]`; mutation requires `&mut self`.
unsafe impl Sync for RawBlock {}

impl RawBlock {
    /// Allocate a new zero-filled block of `len` bytes.
    ///
    /// Aborts the process if the block cannot be obtained: either `len`
    /// exceeds the largest valid allocation, or the global allocator fails
    /// (via [`alloc::handle_alloc_error`]).
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    pub(crate) fn new(len: usize) -> Self {
        assert!(len > 0, "RawBlock length must be non-zero");
        let Some(layout) = Self::layout(len) else {
            error!(len, "arena block exceeds the maximum allocation size");
            process::abort();
        };
        // SAFETY: `layout` has non-zero size (asserted above).
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let Some(ptr) = NonNull::new(raw) else {
            alloc::handle_alloc_error(layout);
        };
        Self { ptr, len }
    }

    /// Layout of a `len`-byte block, or `None` if `len` rounded up to
    /// `ALIGN` overflows `isize`.
    fn layout(len: usize) -> Option<Layout> {
        Layout::from_size_align(len, ALIGN).ok()
    }

    /// Block length in bytes.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Address of the first byte.
    pub(crate) fn addr(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    pub(crate) fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        // SAFETY: `ptr` points to `len` initialised (zero-filled) bytes owned
        // by `self`, and the returned borrow is tied to `&self`.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as in `as_slice`; `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for RawBlock {
    fn drop(&mut self) {
        // `new` only builds blocks whose layout is valid.
        if let Some(layout) = Self::layout(self.len) {
            // SAFETY: `ptr` was returned by `alloc_zeroed` with this exact
            // layout and has not been freed; `drop` runs at most once.
            unsafe { alloc::dealloc(self.ptr.as_ptr(), layout) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_block_is_zeroed_and_aligned() {
        let block = RawBlock::new(100);
        assert_eq!(block.len(), 100);
        assert_eq!(block.addr() % ALIGN, 0);
        assert!(block.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn writes_are_visible_through_shared_slice() {
        let mut block = RawBlock::new(16);
        block.as_mut_slice()[3] = 0xAB;
        block.as_mut_slice()[15] = 0xCD;
        assert_eq!(block.as_slice()[3], 0xAB);
        assert_eq!(block.as_slice()[15], 0xCD);
    }

    #[test]
    fn address_survives_move() {
        let block = RawBlock::new(64);
        let before = block.addr();
        let moved = vec![block];
        assert_eq!(moved[0].addr(), before);
    }

    #[test]
    fn layout_rejects_lengths_past_isize_max() {
        assert!(RawBlock::layout(isize::MAX as usize + 1).is_none());
        assert!(RawBlock::layout(usize::MAX).is_none());
        let layout = RawBlock::layout(4096).unwrap();
        assert_eq!(layout.size(), 4096);
        assert_eq!(layout.align(), ALIGN);
    }

    #[test]
    #[should_panic(expected = "must be non-zero")]
    fn zero_length_rejected() {
        let _ = RawBlock::new(0);
    }
}
