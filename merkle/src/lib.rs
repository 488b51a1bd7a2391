//! Authenticated leaf set for the Shadow Vote indexer.
//!
//! A [`MerkleStore`] owns the writable tree. Every mutation recomputes the
//! affected root path and then publishes an immutable [`Snapshot`]; readers
//! obtained through [`MerkleStore::reader`] only ever see whole snapshots, so
//! a root and a proof taken from the same snapshot always agree.

pub mod error;
pub mod leaf;
pub mod proof;
pub mod snapshot;
pub mod store;
mod tree;

pub use error::MerkleError;
pub use leaf::{Leaf, LeafEntry, LeafIndex};
pub use proof::{AccountProof, MerkleProof};
pub use snapshot::{Snapshot, SnapshotReader};
pub use store::MerkleStore;

/// Depth used when none is configured (capacity 2^20 accounts).
pub const DEFAULT_DEPTH: u32 = 20;

/// Largest supported depth. Leaf indices are `u64` and sparse levels are
/// addressed with `usize`.
pub const MAX_DEPTH: u32 = 32;
