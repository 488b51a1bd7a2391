//! Owned indexer state: the writable tree, the durable log, and the shared
//! status/metrics handles. Passed explicitly to the poller; the read API
//! only receives read handles derived from it.

use std::sync::Arc;

use shadow_crypto::HashEngine;
use shadow_merkle::{LeafEntry, MerkleStore, SnapshotReader};
use shadow_store::IndexerStore;
use tracing::info;

use crate::metrics::gauge_value;
use crate::{IndexerError, IndexerMetrics, IndexerStatus};

pub struct IndexerContext<S> {
    pub(crate) store: Arc<S>,
    pub(crate) tree: MerkleStore,
    pub(crate) status: Arc<IndexerStatus>,
    pub(crate) metrics: Arc<IndexerMetrics>,
}

impl<S: IndexerStore> IndexerContext<S> {
    /// Rebuild the tree from every persisted leaf. Any inconsistency in the
    /// stored leaves is fatal.
    pub fn load(
        store: Arc<S>,
        engine: Arc<HashEngine>,
        tree_depth: u32,
        metrics: Arc<IndexerMetrics>,
    ) -> Result<Self, IndexerError> {
        let leaves = store.load_all_leaves()?;
        let tree = MerkleStore::from_leaves(
            tree_depth,
            engine,
            leaves.into_iter().map(LeafEntry::from),
        )?;

        let status = Arc::new(IndexerStatus::new());
        if let Some(cursor) = store.get_cursor()? {
            status.set_next_height(cursor);
            metrics.next_height.set(gauge_value(cursor));
        }
        metrics.leaf_count.set(gauge_value(tree.leaf_count() as u64));

        info!(
            leaves = tree.leaf_count(),
            depth = tree_depth,
            root = %tree.root(),
            "indexer state loaded"
        );

        Ok(Self {
            store,
            tree,
            status,
            metrics,
        })
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn tree(&self) -> &MerkleStore {
        &self.tree
    }

    pub fn reader(&self) -> SnapshotReader {
        self.tree.reader()
    }

    pub fn status(&self) -> &Arc<IndexerStatus> {
        &self.status
    }

    pub fn metrics(&self) -> &Arc<IndexerMetrics> {
        &self.metrics
    }
}
