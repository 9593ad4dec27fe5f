//! Block-based bump arena for many small allocations with one shared lifetime.
//!
//! Built for structures such as an in-memory sorted table that create lots
//! of node objects and free them all at once. Memory comes from large
//! blocks carved with a bump cursor and is only returned when the arena
//! is dropped. This crate is the only place in the workspace that
//! contains `unsafe` code, confined to `raw.rs`.
//!
//! # Architecture
//!
//! ```text
//! Arena
//! ├── Vec<RawBlock>   (owned heap blocks, ALIGN-aligned, freed on drop)
//! ├── Cursor          (active block, offset, remaining)
//! └── UsageCell       (Arc<AtomicUsize>, relaxed) ──► UsageCounter readers
//! ```
//!
//! # Allocation paths
//!
//! - **Fast:** the request fits the active block; O(1) cursor bump.
//! - **Large:** the request exceeds a quarter of the block size; it gets
//!   a dedicated block and the cursor is left alone.
//! - **Refill:** otherwise a fresh block becomes active and the old tail
//!   is wasted.
//!
//! Allocations are named by [`Span`] handles and resolved through the
//! arena, so the borrow checker ties every byte slice to the arena's
//! lifetime.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
pub mod metrics;
mod raw;
pub mod span;
pub mod usage;

// Public re-exports for the primary API surface.
pub use arena::Arena;
pub use config::{ArenaConfig, ALIGN, BLOCK_OVERHEAD};
pub use error::ArenaError;
pub use metrics::ArenaStats;
pub use span::{ArenaId, Span};
pub use usage::UsageCounter;
