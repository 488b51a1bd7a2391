//! Error type for identifier validation.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid account identifier: {0}")]
    InvalidAccount(String),

    #[error("invalid proposal id: {0}")]
    InvalidProposalId(String),

    #[error("unknown chain network: {0}")]
    UnknownNetwork(String),
}
