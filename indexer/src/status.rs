//! Live poller state shared with the read API.

use std::sync::atomic::{AtomicU64, Ordering};

const UNKNOWN: u64 = u64::MAX;

/// Lock-free snapshot of where the poller is. Updated by the poller,
/// read by `/status`.
#[derive(Debug)]
pub struct IndexerStatus {
    next_height: AtomicU64,
    chain_head: AtomicU64,
}

impl IndexerStatus {
    pub fn new() -> Self {
        Self {
            next_height: AtomicU64::new(UNKNOWN),
            chain_head: AtomicU64::new(UNKNOWN),
        }
    }

    /// Next block height the poller will process.
    pub fn next_height(&self) -> Option<u64> {
        load(&self.next_height)
    }

    /// Last observed remote head.
    pub fn chain_head(&self) -> Option<u64> {
        load(&self.chain_head)
    }

    pub fn set_next_height(&self, height: u64) {
        self.next_height.store(height, Ordering::Relaxed);
    }

    pub fn set_chain_head(&self, height: u64) {
        self.chain_head.store(height, Ordering::Relaxed);
    }
}

fn load(cell: &AtomicU64) -> Option<u64> {
    match cell.load(Ordering::Relaxed) {
        UNKNOWN => None,
        v => Some(v),
    }
}

impl Default for IndexerStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_until_set() {
        let status = IndexerStatus::new();
        assert_eq!(status.next_height(), None);
        assert_eq!(status.chain_head(), None);
        status.set_next_height(0);
        status.set_chain_head(990);
        assert_eq!(status.next_height(), Some(0));
        assert_eq!(status.chain_head(), Some(990));
    }
}
