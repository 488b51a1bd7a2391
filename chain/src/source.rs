use std::future::Future;

use crate::{Block, ChainError};

/// Read access to the remote ledger.
pub trait ChainSource: Send + Sync {
    /// Height of the latest block the remote knows about.
    fn current_head(&self) -> impl Future<Output = Result<u64, ChainError>> + Send;

    /// The block at `height`.
    fn get_block(&self, height: u64) -> impl Future<Output = Result<Block, ChainError>> + Send;
}
