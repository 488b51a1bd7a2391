//! LMDB implementation of LeafStore.

use shadow_store::{LeafRecord, LeafStore, StoreError};
use shadow_types::AccountId;

use crate::{LmdbEnvironment, LmdbError};

impl LeafStore for LmdbEnvironment {
    fn load_all_leaves(&self) -> Result<Vec<LeafRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        for item in self.leaves_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, value) = item.map_err(LmdbError::from)?;
            let record: LeafRecord = bincode::deserialize(value).map_err(LmdbError::from)?;
            out.push(record);
        }
        Ok(out)
    }

    fn upsert_leaf(&self, record: &LeafRecord) -> Result<(), StoreError> {
        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.leaves_db
            .put(&mut wtxn, record.account.as_str().as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_leaf(&self, account: &AccountId) -> Result<Option<LeafRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .leaves_db
            .get(&rtxn, account.as_str().as_bytes())
            .map_err(LmdbError::from)?
        {
            Some(value) => Ok(Some(
                bincode::deserialize(value).map_err(LmdbError::from)?,
            )),
            None => Ok(None),
        }
    }
}
