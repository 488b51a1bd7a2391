use serde::{Deserialize, Serialize};
use shadow_crypto::FieldElement;
use shadow_types::AccountId;

/// Position of a leaf in level 0.
pub type LeafIndex = u64;

/// Leaf contents as loaded from durable storage: everything except the hash,
/// which is always recomputed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafEntry {
    pub index: LeafIndex,
    pub account: AccountId,
    pub balance: u64,
    pub salt: FieldElement,
    pub encrypted_salt: String,
}

/// A materialized leaf. `hash` is `Hash(account, balance, salt)` for the
/// current `balance` and `salt`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    pub index: LeafIndex,
    pub account: AccountId,
    pub balance: u64,
    pub salt: FieldElement,
    /// Opaque client ciphertext. Never hashed.
    pub encrypted_salt: String,
    pub hash: FieldElement,
}

impl Leaf {
    /// Strip the hash, producing the form that gets persisted.
    pub fn to_entry(&self) -> LeafEntry {
        LeafEntry {
            index: self.index,
            account: self.account.clone(),
            balance: self.balance,
            salt: self.salt,
            encrypted_salt: self.encrypted_salt.clone(),
        }
    }
}
