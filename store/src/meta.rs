//! Metadata storage trait.

use crate::StoreError;

/// Key-value bookkeeping: schema version and the poller cursor.
pub trait MetaStore {
    /// Store a metadata value.
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Retrieve a metadata value, `None` if absent.
    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Database schema version, 0 for a fresh database.
    fn get_schema_version(&self) -> Result<u32, StoreError>;

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError>;

    /// Next block height the poller will process, if one was ever persisted.
    fn get_cursor(&self) -> Result<Option<u64>, StoreError>;

    fn put_cursor(&self, height: u64) -> Result<(), StoreError>;
}
