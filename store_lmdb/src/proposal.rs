//! LMDB implementation of ProposalStore.
//!
//! Proposal keys are big-endian ids so cursor order is id order.

use shadow_store::{ProposalRecord, ProposalStore, StoreError};
use shadow_types::ProposalId;

use crate::{LmdbEnvironment, LmdbError};

fn id_key(id: ProposalId) -> [u8; 8] {
    id.as_u64().to_be_bytes()
}

fn decode(value: &[u8]) -> Result<ProposalRecord, LmdbError> {
    Ok(bincode::deserialize(value)?)
}

impl ProposalStore for LmdbEnvironment {
    fn insert_proposal(&self, record: &ProposalRecord) -> Result<(), StoreError> {
        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        let key = id_key(record.id);
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        if self
            .proposals_db
            .get(&wtxn, &key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate(format!("proposal {}", record.id)));
        }
        let source = record.source_transition.as_bytes();
        if self
            .proposal_sources_db
            .get(&wtxn, source)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate(format!(
                "proposal source {}",
                record.source_transition
            )));
        }

        self.proposals_db
            .put(&mut wtxn, &key, &bytes)
            .map_err(LmdbError::from)?;
        self.proposal_sources_db
            .put(&mut wtxn, source, &key)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_proposal(&self, id: ProposalId) -> Result<Option<ProposalRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let value = self
            .proposals_db
            .get(&rtxn, &id_key(id))
            .map_err(LmdbError::from)?;
        Ok(value.map(decode).transpose()?)
    }

    fn set_proposal_flags(
        &self,
        id: ProposalId,
        is_active: bool,
        is_finalized: Option<bool>,
    ) -> Result<(), StoreError> {
        let key = id_key(id);
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let mut record = match self.proposals_db.get(&wtxn, &key).map_err(LmdbError::from)? {
            Some(value) => decode(value)?,
            None => return Err(StoreError::NotFound(format!("proposal {id}"))),
        };
        record.is_active = is_active;
        if let Some(is_finalized) = is_finalized {
            record.is_finalized = is_finalized;
        }
        let bytes = bincode::serialize(&record).map_err(LmdbError::from)?;
        self.proposals_db
            .put(&mut wtxn, &key, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn next_proposal_id(&self) -> Result<ProposalId, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self.proposals_db.last(&rtxn).map_err(LmdbError::from)? {
            Some((key, _)) => {
                let raw: [u8; 8] = key.try_into().map_err(|_| {
                    StoreError::Corruption("proposal key has unexpected length".to_string())
                })?;
                Ok(ProposalId::new(u64::from_be_bytes(raw)).next())
            }
            None => Ok(ProposalId::FIRST),
        }
    }

    fn list_proposals(&self) -> Result<Vec<ProposalRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        for item in self.proposals_db.rev_iter(&rtxn).map_err(LmdbError::from)? {
            let (_, value) = item.map_err(LmdbError::from)?;
            out.push(decode(value)?);
        }
        Ok(out)
    }

    fn proposal_by_transition(
        &self,
        transition_id: &str,
    ) -> Result<Option<ProposalRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let Some(key) = self
            .proposal_sources_db
            .get(&rtxn, transition_id.as_bytes())
            .map_err(LmdbError::from)?
        else {
            return Ok(None);
        };
        match self.proposals_db.get(&rtxn, key).map_err(LmdbError::from)? {
            Some(value) => Ok(Some(decode(value)?)),
            None => Err(StoreError::Corruption(format!(
                "proposal source {transition_id} points at a missing proposal"
            ))),
        }
    }
}
