//! Point-in-time arena statistics.
//!
//! [`ArenaStats`] is a plain snapshot taken by [`Arena::stats`](crate::Arena::stats).
//! Unlike the usage counter it is exact, but it can only be read by the
//! thread that owns the arena.

/// Allocation statistics for a single arena.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Number of blocks created, regular and dedicated.
    pub block_count: usize,
    /// Value of the approximate usage counter, in bytes.
    pub memory_usage: usize,
    /// Sum of all requested allocation sizes, in bytes.
    pub bytes_allocated: usize,
    /// Bytes that can never be handed out: block tails abandoned when a
    /// fresh block became active, plus alignment padding.
    pub bytes_wasted: usize,
    /// Capacity left in the active block, in bytes.
    pub remaining: usize,
}

impl ArenaStats {
    /// Fraction of block payload handed out to callers, in `[0, 1]`.
    ///
    /// Returns 1.0 for an arena that has not created any block yet.
    pub fn utilization(&self) -> f64 {
        let overhead = self.block_count * crate::config::BLOCK_OVERHEAD;
        let payload = self.memory_usage.saturating_sub(overhead);
        if payload == 0 {
            return 1.0;
        }
        self.bytes_allocated as f64 / payload as f64
    }
}
