//! Cursor arithmetic.
//!
//! The cursor is the next block height to process. These rules are pure so
//! the poller's state machine can be tested without a chain.

/// How the cursor is first placed and how it recovers when the remote chain
/// reports a head behind it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorPolicy {
    pub start_height: Option<u64>,
    pub backfill_margin: u64,
    pub reorg_margin: u64,
}

impl CursorPolicy {
    /// Initial cursor for a database that never persisted one.
    pub fn bootstrap(&self, head: u64) -> u64 {
        match self.start_height {
            Some(height) => height,
            None => head.saturating_sub(self.backfill_margin),
        }
    }

    /// A replacement cursor when `cursor` is ahead of the chain.
    ///
    /// `cursor == head + 1` is the normal caught-up state. Anything beyond
    /// means the last processed height exceeds the head, and processing
    /// restarts `reorg_margin` blocks behind the head.
    pub fn correct(&self, cursor: u64, head: u64) -> Option<u64> {
        if cursor > head.saturating_add(1) {
            Some(head.saturating_sub(self.reorg_margin))
        } else {
            None
        }
    }
}
