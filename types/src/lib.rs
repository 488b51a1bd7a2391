//! Fundamental types for the Shadow Vote indexer.
//!
//! This crate defines the identifiers shared across every other crate in the
//! workspace: voter accounts, proposal ids and the chain network selector.

pub mod account;
pub mod error;
pub mod network;
pub mod proposal;

pub use account::AccountId;
pub use error::TypesError;
pub use network::ChainNetwork;
pub use proposal::ProposalId;
