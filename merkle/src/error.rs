use shadow_crypto::CryptoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MerkleError {
    #[error("invalid tree depth {0} (expected 1..={max})", max = crate::MAX_DEPTH)]
    InvalidDepth(u32),

    #[error("tree is full: capacity {capacity} leaves")]
    CapacityExceeded { capacity: u64 },

    #[error("unknown account: {0}")]
    UnknownAccount(String),

    #[error("leaf index {index} out of range for capacity {capacity}")]
    IndexOutOfRange { index: u64, capacity: u64 },

    #[error("leaf index {0} assigned twice")]
    DuplicateIndex(u64),

    #[error("leaf indices are not contiguous: index {index} with only {leaves} leaves")]
    IndexGap { index: u64, leaves: usize },

    #[error("account {0} stored twice")]
    DuplicateAccount(String),

    #[error("hash engine: {0}")]
    Crypto(#[from] CryptoError),
}

impl MerkleError {
    /// Whether the tree can no longer be trusted or extended after this error.
    /// Every variant except an unknown-account lookup is fatal to the caller.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, MerkleError::UnknownAccount(_))
    }
}
