//! Leaf persistence.

use serde::{Deserialize, Serialize};
use shadow_crypto::FieldElement;
use shadow_merkle::LeafEntry;
use shadow_types::AccountId;

use crate::StoreError;

/// A persisted leaf. The leaf hash is not stored; it is recomputed on load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafRecord {
    pub account: AccountId,
    pub balance: u64,
    pub salt: FieldElement,
    pub encrypted_salt: String,
    /// Tree position assigned on first insert.
    pub index: u64,
}

impl From<LeafRecord> for LeafEntry {
    fn from(r: LeafRecord) -> Self {
        LeafEntry {
            index: r.index,
            account: r.account,
            balance: r.balance,
            salt: r.salt,
            encrypted_salt: r.encrypted_salt,
        }
    }
}

impl From<LeafEntry> for LeafRecord {
    fn from(e: LeafEntry) -> Self {
        LeafRecord {
            account: e.account,
            balance: e.balance,
            salt: e.salt,
            encrypted_salt: e.encrypted_salt,
            index: e.index,
        }
    }
}

/// Trait for storing leaf records, keyed by account.
pub trait LeafStore {
    /// Every stored leaf, in no particular order.
    fn load_all_leaves(&self) -> Result<Vec<LeafRecord>, StoreError>;

    /// Insert or replace the record for `record.account`.
    fn upsert_leaf(&self, record: &LeafRecord) -> Result<(), StoreError>;

    /// Look up one account.
    fn get_leaf(&self, account: &AccountId) -> Result<Option<LeafRecord>, StoreError>;
}
