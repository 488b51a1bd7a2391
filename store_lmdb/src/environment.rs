//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::LmdbError;

/// Default map size: 1 GiB.
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

const MAX_DBS: u32 = 8;

/// Wraps the LMDB environment and all database handles.
///
/// Databases:
/// - `leaves`: account (utf-8) -> bincode `LeafRecord`
/// - `proposals`: id (u64 big-endian) -> bincode `ProposalRecord`
/// - `proposal_sources`: transition id (utf-8) -> id (u64 big-endian)
/// - `meta`: string key -> raw bytes
#[derive(Clone)]
pub struct LmdbEnvironment {
    pub(crate) env: Arc<Env>,
    pub(crate) leaves_db: Database<Bytes, Bytes>,
    pub(crate) proposals_db: Database<Bytes, Bytes>,
    pub(crate) proposal_sources_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given directory.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per process and the data
        // directory is not shared with other processes.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let leaves_db = env.create_database(&mut wtxn, Some("leaves"))?;
        let proposals_db = env.create_database(&mut wtxn, Some("proposals"))?;
        let proposal_sources_db = env.create_database(&mut wtxn, Some("proposal_sources"))?;
        let meta_db = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        tracing::info!(path = %path.display(), map_size, "LMDB environment opened");

        Ok(Self {
            env: Arc::new(env),
            leaves_db,
            proposals_db,
            proposal_sources_db,
            meta_db,
        })
    }

    /// Open with [`DEFAULT_MAP_SIZE`] and bring the schema up to date.
    pub fn open_and_migrate(path: &Path) -> Result<Self, LmdbError> {
        let env = Self::open(path, DEFAULT_MAP_SIZE)?;
        crate::Migrator::run(&env)?;
        Ok(env)
    }

    pub fn env(&self) -> &Env {
        &self.env
    }
}
