//! Nullable store: thread-safe in-memory durable log for testing.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use shadow_store::{
    LeafRecord, LeafStore, MetaStore, ProposalRecord, ProposalStore, StoreError,
};
use shadow_types::{AccountId, ProposalId};

#[derive(Default)]
struct StoreState {
    leaves: HashMap<AccountId, LeafRecord>,
    proposals: BTreeMap<ProposalId, ProposalRecord>,
    meta: HashMap<String, Vec<u8>>,
    cursor: Option<u64>,
    schema_version: u32,
    write_failures: u32,
    writes_before_failure: u32,
    cursor_writes: Vec<u64>,
}

impl StoreState {
    fn check_write(&mut self) -> Result<(), StoreError> {
        if self.write_failures == 0 {
            return Ok(());
        }
        if self.writes_before_failure > 0 {
            self.writes_before_failure -= 1;
            return Ok(());
        }
        self.write_failures -= 1;
        Err(StoreError::Backend("null store: injected write failure".into()))
    }
}

/// In-memory implementation of every store trait.
#[derive(Default)]
pub struct NullStore {
    state: Mutex<StoreState>,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The next `times` writes (leaf, proposal, flags or cursor) fail with a
    /// transient backend error.
    pub fn fail_writes(&self, times: u32) {
        self.fail_writes_after(0, times);
    }

    /// Let `skip` writes succeed, then fail the following `times`.
    pub fn fail_writes_after(&self, skip: u32, times: u32) {
        let mut state = self.state();
        state.writes_before_failure = skip;
        state.write_failures = times;
    }

    /// Every cursor value written, in order.
    pub fn cursor_writes(&self) -> Vec<u64> {
        self.state().cursor_writes.clone()
    }
}

impl LeafStore for NullStore {
    fn load_all_leaves(&self) -> Result<Vec<LeafRecord>, StoreError> {
        Ok(self.state().leaves.values().cloned().collect())
    }

    fn upsert_leaf(&self, record: &LeafRecord) -> Result<(), StoreError> {
        let mut state = self.state();
        state.check_write()?;
        state.leaves.insert(record.account.clone(), record.clone());
        Ok(())
    }

    fn get_leaf(&self, account: &AccountId) -> Result<Option<LeafRecord>, StoreError> {
        Ok(self.state().leaves.get(account).cloned())
    }
}

impl ProposalStore for NullStore {
    fn insert_proposal(&self, record: &ProposalRecord) -> Result<(), StoreError> {
        let mut state = self.state();
        state.check_write()?;
        if state.proposals.contains_key(&record.id) {
            return Err(StoreError::Duplicate(format!("proposal {}", record.id)));
        }
        if state
            .proposals
            .values()
            .any(|p| p.source_transition == record.source_transition)
        {
            return Err(StoreError::Duplicate(format!(
                "proposal source {}",
                record.source_transition
            )));
        }
        state.proposals.insert(record.id, record.clone());
        Ok(())
    }

    fn get_proposal(&self, id: ProposalId) -> Result<Option<ProposalRecord>, StoreError> {
        Ok(self.state().proposals.get(&id).cloned())
    }

    fn set_proposal_flags(
        &self,
        id: ProposalId,
        is_active: bool,
        is_finalized: Option<bool>,
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        state.check_write()?;
        let record = state
            .proposals
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("proposal {id}")))?;
        record.is_active = is_active;
        if let Some(is_finalized) = is_finalized {
            record.is_finalized = is_finalized;
        }
        Ok(())
    }

    fn next_proposal_id(&self) -> Result<ProposalId, StoreError> {
        Ok(self
            .state()
            .proposals
            .keys()
            .next_back()
            .map_or(ProposalId::FIRST, ProposalId::next))
    }

    fn list_proposals(&self) -> Result<Vec<ProposalRecord>, StoreError> {
        Ok(self.state().proposals.values().rev().cloned().collect())
    }

    fn proposal_by_transition(
        &self,
        transition_id: &str,
    ) -> Result<Option<ProposalRecord>, StoreError> {
        Ok(self
            .state()
            .proposals
            .values()
            .find(|p| p.source_transition == transition_id)
            .cloned())
    }
}

impl MetaStore for NullStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.state().meta.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.state().meta.get(key).cloned())
    }

    fn get_schema_version(&self) -> Result<u32, StoreError> {
        Ok(self.state().schema_version)
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        self.state().schema_version = version;
        Ok(())
    }

    fn get_cursor(&self) -> Result<Option<u64>, StoreError> {
        Ok(self.state().cursor)
    }

    fn put_cursor(&self, height: u64) -> Result<(), StoreError> {
        let mut state = self.state();
        state.check_write()?;
        state.cursor = Some(height);
        state.cursor_writes.push(height);
        Ok(())
    }
}
