//! Approximate memory-usage counter.
//!
//! The counter is one `AtomicUsize` shared between the arena (the only
//! writer) and any number of [`UsageCounter`] readers. Both sides use
//! `Ordering::Relaxed`: readers get atomicity but no happens-before edge
//! with the allocations that bumped the value, so they may see a stale
//! figure. The value never decreases.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Writer side, owned by the arena.
pub(crate) struct UsageCell {
    bytes: Arc<AtomicUsize>,
}

impl UsageCell {
    pub(crate) fn new() -> Self {
        Self {
            bytes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add `bytes` to the counter.
    ///
    /// Load-then-store rather than `fetch_add`: there is a single writer,
    /// which `&mut self` enforces.
    pub(crate) fn add(&mut self, bytes: usize) {
        let current = self.bytes.load(Ordering::Relaxed);
        self.bytes
            .store(current.saturating_add(bytes), Ordering::Relaxed);
    }

    pub(crate) fn get(&self) -> usize {
        self.bytes.load(Ordering::Relaxed)
    }

    pub(crate) fn reader(&self) -> UsageCounter {
        UsageCounter {
            bytes: Arc::clone(&self.bytes),
        }
    }
}

/// Read-only, thread-safe view of an arena's memory usage.
///
/// Obtained from [`Arena::usage_counter`](crate::Arena::usage_counter).
/// Can be sent to other threads and read while the arena keeps
/// allocating. Outlives the arena harmlessly: after the arena is dropped
/// it reports the final value.
#[derive(Clone, Debug)]
pub struct UsageCounter {
    bytes: Arc<AtomicUsize>,
}

// Compile-time assertion: UsageCounter must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<UsageCounter>();
};

impl UsageCounter {
    /// Approximate bytes consumed by the arena's blocks.
    ///
    /// Relaxed load: may lag behind the owning thread, never goes backwards.
    pub fn get(&self) -> usize {
        self.bytes.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let cell = UsageCell::new();
        assert_eq!(cell.get(), 0);
        assert_eq!(cell.reader().get(), 0);
    }

    #[test]
    fn reader_sees_writes() {
        let mut cell = UsageCell::new();
        let reader = cell.reader();
        cell.add(4096);
        cell.add(8);
        assert_eq!(cell.get(), 4104);
        assert_eq!(reader.get(), 4104);
    }

    #[test]
    fn reader_outlives_writer() {
        let mut cell = UsageCell::new();
        let reader = cell.reader();
        cell.add(100);
        drop(cell);
        assert_eq!(reader.get(), 100);
    }

    #[test]
    fn add_saturates() {
        let mut cell = UsageCell::new();
        cell.add(usize::MAX);
        cell.add(1);
        assert_eq!(cell.get(), usize::MAX);
    }
}
