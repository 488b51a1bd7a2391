//! Voter account identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// The on-chain identity a leaf belongs to.
///
/// Usually an `aleo1…` address, but the indexer treats it as an opaque,
/// whitespace-free string: the tree only ever sees its field encoding.
/// Numeric identifiers are stored in canonical form (`007` and `7field`
/// both become `7`), so one number is always one account.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Longest identifier accepted (an Aleo address is 63 characters).
    pub const MAX_LEN: usize = 256;

    /// Create an account identifier, rejecting empty or malformed strings.
    pub fn new(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        if s.is_empty() || s.len() > Self::MAX_LEN {
            return Err(TypesError::InvalidAccount(s));
        }
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(TypesError::InvalidAccount(s));
        }
        match canonical_numeric(&s) {
            Some(canonical) => Ok(Self(canonical)),
            None => Ok(Self(s)),
        }
    }

    /// The value of a numeric identifier, if it fits in a `u64`.
    pub fn numeric_value(&self) -> Option<u64> {
        if self.0.bytes().all(|b| b.is_ascii_digit()) {
            self.0.parse().ok()
        } else {
            None
        }
    }

    /// Return the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this looks like an Aleo address (`aleo1` prefix).
    pub fn is_aleo_address(&self) -> bool {
        self.0.starts_with("aleo1")
    }
}

fn canonical_numeric(s: &str) -> Option<String> {
    let digits = s.strip_suffix("field").unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let trimmed = digits.trim_start_matches('0');
    Some(if trimmed.is_empty() { "0" } else { trimmed }.to_string())
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}
