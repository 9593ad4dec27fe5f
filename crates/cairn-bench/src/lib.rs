//! Benchmark workloads for the cairn arena.
//!
//! Provides deterministic allocation profiles shared by the criterion
//! benches:
//!
//! - [`memtable_profile`]: key/value/node size mix of an in-memory sorted table
//! - [`uniform_profile`]: fixed-size small allocations
//! - [`run_profile`]: replay a profile against an [`Arena`]

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use cairn_arena::{Arena, Span};

/// One allocation request in a workload profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    /// Unaligned allocation of the given size (keys, values).
    Bytes(usize),
    /// Aligned allocation of the given size (nodes holding pointers).
    Aligned(usize),
}

/// Build a memtable-style profile with `entries` entries.
///
/// Each entry is one aligned node (32..=112 bytes, tower height varies),
/// one key (16..=47 bytes) and one value (64..=575 bytes, with every
/// 64th value large enough to take the dedicated-block path).
/// Sizes come from a simple LCG seeded by `seed`.
pub fn memtable_profile(entries: usize, seed: u64) -> Vec<Request> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as usize
    };

    let mut requests = Vec::with_capacity(entries * 3);
    for i in 0..entries {
        let height = 1 + next() % 12;
        requests.push(Request::Aligned(16 + height * 8));
        requests.push(Request::Bytes(16 + next() % 32));
        let value = if i % 64 == 63 {
            2048 + next() % 2048
        } else {
            64 + next() % 512
        };
        requests.push(Request::Bytes(value));
    }
    requests
}

/// Build a profile of `count` unaligned allocations of `size` bytes.
pub fn uniform_profile(count: usize, size: usize) -> Vec<Request> {
    vec![Request::Bytes(size); count]
}

/// Replay `requests` against `arena`, returning the issued spans.
pub fn run_profile(arena: &mut Arena, requests: &[Request]) -> Vec<Span> {
    requests
        .iter()
        .map(|req| match *req {
            Request::Bytes(n) => arena.allocate(n),
            Request::Aligned(n) => arena.allocate_aligned(n),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memtable_profile_deterministic() {
        assert_eq!(memtable_profile(100, 42), memtable_profile(100, 42));
        assert_ne!(memtable_profile(100, 42), memtable_profile(100, 43));
    }

    #[test]
    fn memtable_profile_has_no_zero_sizes() {
        for req in memtable_profile(1000, 7) {
            let (Request::Bytes(n) | Request::Aligned(n)) = req;
            assert!(n > 0);
        }
    }

    #[test]
    fn run_profile_issues_one_span_per_request() {
        let profile = memtable_profile(200, 1);
        let mut arena = Arena::new();
        let spans = run_profile(&mut arena, &profile);
        assert_eq!(spans.len(), profile.len());
        let requested: usize = profile
            .iter()
            .map(|r| match *r {
                Request::Bytes(n) | Request::Aligned(n) => n,
            })
            .sum();
        assert_eq!(arena.stats().bytes_allocated, requested);
    }

    #[test]
    fn uniform_profile_fills_blocks_exactly() {
        let mut arena = Arena::new();
        let _ = run_profile(&mut arena, &uniform_profile(64, 64));
        assert_eq!(arena.block_count(), 1);
        assert_eq!(arena.remaining(), 0);
    }
}
