//! Arena configuration parameters and platform constants.

use std::mem;

use crate::error::ArenaError;

/// Alignment guaranteed by [`Arena::allocate_aligned`](crate::Arena::allocate_aligned).
///
/// The larger of the platform pointer width and 8 bytes. Every block is
/// allocated with this alignment, so the start of any block is aligned.
pub const ALIGN: usize = if mem::size_of::<*const u8>() > 8 {
    mem::size_of::<*const u8>()
} else {
    8
};

const _: () = assert!(ALIGN.is_power_of_two(), "ALIGN must be a power of two");

/// Bookkeeping bytes charged to the usage counter for every block.
///
/// Approximates the owning pointer kept in the block list.
pub const BLOCK_OVERHEAD: usize = mem::size_of::<*const u8>();

/// Configuration for the arena allocator.
///
/// Validated at construction; immutable for the lifetime of the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Size of each regular block in bytes.
    ///
    /// Default: 4096. Requests larger than a quarter of this get a
    /// dedicated block of their exact size. Must be a non-zero multiple
    /// of [`ALIGN`] and at least `4 * ALIGN`.
    pub block_size: usize,
}

impl ArenaConfig {
    /// Default block size in bytes.
    pub const DEFAULT_BLOCK_SIZE: usize = 4096;

    /// Create a config with the given block size.
    pub fn new(block_size: usize) -> Self {
        Self { block_size }
    }

    /// Requests strictly larger than this many bytes bypass the shared
    /// block and are served from a dedicated block.
    pub fn large_threshold(&self) -> usize {
        self.block_size / 4
    }

    /// Check the invariants documented on [`ArenaConfig::block_size`].
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.block_size < 4 * ALIGN || self.block_size % ALIGN != 0 {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "block_size must be a multiple of {ALIGN} and >= {} (got {})",
                    4 * ALIGN,
                    self.block_size,
                ),
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BLOCK_SIZE)
    }
}
