use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid field element: {0}")]
    InvalidFieldElement(String),

    #[error("field element out of range: {0}")]
    OutOfRange(String),

    #[error("unsupported hash arity {0} (expected 1..={max})", max = crate::HashEngine::MAX_INPUTS)]
    UnsupportedArity(usize),

    #[error("poseidon error: {0}")]
    Poseidon(String),
}
