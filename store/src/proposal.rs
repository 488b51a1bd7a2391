//! Proposal persistence.

use serde::{Deserialize, Serialize};
use shadow_crypto::FieldElement;
use shadow_types::{AccountId, ProposalId};

use crate::StoreError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub id: ProposalId,
    pub description: FieldElement,
    /// Non-empty options only; `0field` padding is dropped at parse time.
    pub options: Vec<FieldElement>,
    pub end_block: u32,
    pub quorum: u64,
    pub admin: Option<AccountId>,
    pub is_active: bool,
    pub is_finalized: bool,
    /// Chain transition that created the proposal. Unique.
    pub source_transition: String,
    pub created_height: u64,
}

/// Trait for storing proposals. The indexer only inserts rows and flips the
/// lifecycle flags.
pub trait ProposalStore {
    /// Insert a new proposal. Fails with `Duplicate` if the id or the source
    /// transition is already present.
    fn insert_proposal(&self, record: &ProposalRecord) -> Result<(), StoreError>;

    fn get_proposal(&self, id: ProposalId) -> Result<Option<ProposalRecord>, StoreError>;

    /// Update lifecycle flags. `is_finalized: None` keeps the stored value.
    /// Fails with `NotFound` for unknown ids.
    fn set_proposal_flags(
        &self,
        id: ProposalId,
        is_active: bool,
        is_finalized: Option<bool>,
    ) -> Result<(), StoreError>;

    /// One past the highest stored id, or [`ProposalId::FIRST`] when empty.
    fn next_proposal_id(&self) -> Result<ProposalId, StoreError>;

    /// All proposals, newest id first.
    fn list_proposals(&self) -> Result<Vec<ProposalRecord>, StoreError>;

    /// The proposal created by a given transition, if any.
    fn proposal_by_transition(
        &self,
        transition_id: &str,
    ) -> Result<Option<ProposalRecord>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape() {
        let record = ProposalRecord {
            id: ProposalId::new(3),
            description: FieldElement::from_u64(77),
            options: vec![FieldElement::from_u64(1), FieldElement::from_u64(2)],
            end_block: 500,
            quorum: 10,
            admin: None,
            is_active: true,
            is_finalized: false,
            source_transition: "au1abc".into(),
            created_height: 42,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["description"], "77");
        assert_eq!(json["options"], serde_json::json!(["1", "2"]));
        assert_eq!(json["admin"], serde_json::Value::Null);
        assert_eq!(json["is_active"], true);
    }
}
