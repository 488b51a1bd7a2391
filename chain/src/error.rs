use thiserror::Error;

/// Failures talking to the remote chain API. All of them are transient from
/// the poller's point of view.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("chain API unreachable: {0}")]
    Unreachable(String),

    #[error("chain API request failed: {0}")]
    RequestFailed(String),

    #[error("chain API returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("invalid chain API response: {0}")]
    InvalidResponse(String),

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl From<reqwest::Error> for ChainError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ChainError::Unreachable(format!("request timed out: {e}"))
        } else if e.is_connect() {
            ChainError::Unreachable(format!("connection failed: {e}"))
        } else if e.is_decode() {
            ChainError::InvalidResponse(e.to_string())
        } else {
            ChainError::RequestFailed(e.to_string())
        }
    }
}

/// A typed literal that does not parse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LiteralError {
    #[error("expected a {expected} literal, got {value:?}")]
    WrongType { expected: &'static str, value: String },

    #[error("invalid number in {0:?}")]
    InvalidNumber(String),

    #[error("invalid field element: {0}")]
    InvalidField(String),

    #[error("expected an array literal, got {0:?}")]
    NotAnArray(String),

    #[error("invalid address {0:?}")]
    InvalidAddress(String),

    #[error("input {0} is missing or not public")]
    MissingInput(usize),
}
