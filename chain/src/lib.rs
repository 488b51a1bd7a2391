//! Remote ledger access for the Shadow Vote indexer.
//!
//! - [`block`]: the subset of the explorer's block JSON the indexer reads.
//! - [`literal`]: parsing of typed Aleo literals (`100u64`, `7field`, arrays).
//! - [`ChainSource`]: the two calls the poller needs, implemented over HTTP
//!   by [`ChainClient`] and in memory by the nullables crate.

pub mod block;
pub mod client;
pub mod error;
pub mod literal;
pub mod source;

pub use block::{Block, Execution, Transaction, Transition, TransitionInput};
pub use client::{ChainClient, DEFAULT_CHAIN_API_URL};
pub use error::{ChainError, LiteralError};
pub use source::ChainSource;
