//! LMDB implementation of MetaStore.

use shadow_store::{MetaStore, StoreError};

use crate::{LmdbEnvironment, LmdbError};

const SCHEMA_VERSION_KEY: &str = "schema_version";
const CURSOR_KEY: &str = "cursor";

fn fixed<const N: usize>(key: &str, bytes: &[u8]) -> Result<[u8; N], LmdbError> {
    bytes
        .try_into()
        .map_err(|_| LmdbError::Serialization(format!("{key} has unexpected byte length")))
}

impl MetaStore for LmdbEnvironment {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.meta_db
            .put(&mut wtxn, key.as_bytes(), value)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .meta_db
            .get(&rtxn, key.as_bytes())
            .map_err(LmdbError::from)?;
        Ok(val.map(<[u8]>::to_vec))
    }

    fn get_schema_version(&self) -> Result<u32, StoreError> {
        match self.get_meta(SCHEMA_VERSION_KEY)? {
            Some(bytes) => Ok(u32::from_le_bytes(fixed(SCHEMA_VERSION_KEY, &bytes)?)),
            None => Ok(0),
        }
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        self.put_meta(SCHEMA_VERSION_KEY, &version.to_le_bytes())
    }

    fn get_cursor(&self) -> Result<Option<u64>, StoreError> {
        match self.get_meta(CURSOR_KEY)? {
            Some(bytes) => Ok(Some(u64::from_le_bytes(fixed(CURSOR_KEY, &bytes)?))),
            None => Ok(None),
        }
    }

    fn put_cursor(&self, height: u64) -> Result<(), StoreError> {
        self.put_meta(CURSOR_KEY, &height.to_le_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).unwrap();
        (dir, env)
    }

    #[test]
    fn cursor_absent_then_persisted() {
        let (_dir, env) = open();
        assert_eq!(env.get_cursor().unwrap(), None);
        env.put_cursor(1234).unwrap();
        assert_eq!(env.get_cursor().unwrap(), Some(1234));
        env.put_cursor(1235).unwrap();
        assert_eq!(env.get_cursor().unwrap(), Some(1235));
    }

    #[test]
    fn fresh_schema_version_is_zero() {
        let (_dir, env) = open();
        assert_eq!(env.get_schema_version().unwrap(), 0);
        env.set_schema_version(3).unwrap();
        assert_eq!(env.get_schema_version().unwrap(), 3);
    }

    #[test]
    fn malformed_cursor_is_serialization_error() {
        let (_dir, env) = open();
        env.put_meta(CURSOR_KEY, &[1, 2, 3]).unwrap();
        assert!(matches!(
            env.get_cursor(),
            Err(StoreError::Serialization(_))
        ));
    }
}
