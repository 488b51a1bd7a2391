use shadow_chain::{ChainError, LiteralError};
use shadow_crypto::CryptoError;
use shadow_merkle::MerkleError;
use shadow_store::StoreError;
use shadow_types::ProposalId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("config error: {0}")]
    Config(String),

    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("merkle error: {0}")]
    Merkle(#[from] MerkleError),

    #[error("hash engine error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("malformed event: {0}")]
    Malformed(#[from] LiteralError),

    #[error("unknown proposal {0}")]
    UnknownProposal(ProposalId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IndexerError {
    /// Errors after which the indexer must stop rather than risk serving
    /// proofs against a wrong tree.
    pub fn is_fatal(&self) -> bool {
        match self {
            IndexerError::Config(_) | IndexerError::Crypto(_) => true,
            IndexerError::Merkle(e) => e.is_fatal(),
            IndexerError::Store(e) => !e.is_transient() && !matches!(e, StoreError::NotFound(_)),
            IndexerError::Chain(_)
            | IndexerError::Malformed(_)
            | IndexerError::UnknownProposal(_)
            | IndexerError::Io(_) => false,
        }
    }

    /// Errors confined to a single event: the event is dropped and the block
    /// still counts as processed.
    pub fn is_event_local(&self) -> bool {
        matches!(
            self,
            IndexerError::Malformed(_)
                | IndexerError::UnknownProposal(_)
                | IndexerError::Store(StoreError::NotFound(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        let overflow = IndexerError::Merkle(MerkleError::CapacityExceeded { capacity: 4 });
        assert!(overflow.is_fatal());
        assert!(!overflow.is_event_local());

        let fetch = IndexerError::Chain(ChainError::Unreachable("down".into()));
        assert!(!fetch.is_fatal());
        assert!(!fetch.is_event_local());

        let write = IndexerError::Store(StoreError::Backend("disk".into()));
        assert!(!write.is_fatal());

        let corrupt = IndexerError::Store(StoreError::Corruption("bad".into()));
        assert!(corrupt.is_fatal());

        let malformed = IndexerError::Malformed(LiteralError::InvalidNumber("xu64".into()));
        assert!(!malformed.is_fatal());
        assert!(malformed.is_event_local());

        assert!(IndexerError::UnknownProposal(ProposalId::new(9)).is_event_local());
    }
}
