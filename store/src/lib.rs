//! Durable log contract for the Shadow Vote indexer.
//!
//! Every storage backend (LMDB for the daemon, in-memory for tests)
//! implements these traits. The indexer depends only on the traits.

pub mod error;
pub mod leaf;
pub mod meta;
pub mod proposal;

pub use error::StoreError;
pub use leaf::{LeafRecord, LeafStore};
pub use meta::MetaStore;
pub use proposal::{ProposalRecord, ProposalStore};

/// Everything the indexer needs from a backend.
pub trait IndexerStore: LeafStore + ProposalStore + MetaStore + Send + Sync {}

impl<T> IndexerStore for T where T: LeafStore + ProposalStore + MetaStore + Send + Sync {}
