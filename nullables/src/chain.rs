//! Nullable chain: scripted head and blocks with failure injection.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shadow_chain::block::{ConfirmedTransaction, Header, Metadata, STATUS_ACCEPTED, TYPE_EXECUTE};
use shadow_chain::{Block, ChainError, ChainSource, Execution, Transaction, Transition, TransitionInput};

#[derive(Default)]
struct ChainState {
    head: u64,
    blocks: HashMap<u64, Block>,
    head_failures: u32,
    block_failures: HashMap<u64, u32>,
    fetched: Vec<u64>,
}

/// An in-memory chain. Clones share state, so a test can keep a handle while
/// the poller owns another.
///
/// Heights without a scripted block return an empty block.
#[derive(Clone, Default)]
pub struct NullChain {
    state: Arc<Mutex<ChainState>>,
}

impl NullChain {
    pub fn new(head: u64) -> Self {
        let chain = Self::default();
        chain.set_head(head);
        chain
    }

    fn state(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_head(&self, head: u64) {
        self.state().head = head;
    }

    /// Script the block at `block.height()`.
    pub fn put_block(&self, block: Block) {
        self.state().blocks.insert(block.height(), block);
    }

    /// The next `times` head queries fail.
    pub fn fail_head(&self, times: u32) {
        self.state().head_failures = times;
    }

    /// The next `times` fetches of `height` fail.
    pub fn fail_block(&self, height: u64, times: u32) {
        self.state().block_failures.insert(height, times);
    }

    /// Every height fetched so far, in order, including failed attempts.
    pub fn fetched(&self) -> Vec<u64> {
        self.state().fetched.clone()
    }
}

impl ChainSource for NullChain {
    async fn current_head(&self) -> Result<u64, ChainError> {
        let mut state = self.state();
        if state.head_failures > 0 {
            state.head_failures -= 1;
            return Err(ChainError::Unreachable("null chain: head unavailable".into()));
        }
        Ok(state.head)
    }

    async fn get_block(&self, height: u64) -> Result<Block, ChainError> {
        let mut state = self.state();
        state.fetched.push(height);
        if let Some(remaining) = state.block_failures.get_mut(&height) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ChainError::Unreachable(format!(
                    "null chain: block {height} unavailable"
                )));
            }
        }
        Ok(state
            .blocks
            .get(&height)
            .cloned()
            .unwrap_or_else(|| execute_block(height, Vec::new())))
    }
}

/// A transition whose inputs are all public with the given values.
pub fn public_transition(id: &str, program: &str, function: &str, inputs: &[&str]) -> Transition {
    Transition {
        id: id.to_string(),
        program: program.to_string(),
        function: function.to_string(),
        inputs: inputs
            .iter()
            .enumerate()
            .map(|(i, value)| TransitionInput {
                kind: "public".to_string(),
                id: format!("{id}.in{i}"),
                value: Some(value.to_string()),
            })
            .collect(),
    }
}

/// A block with one accepted execution per transition.
pub fn execute_block(height: u64, transitions: Vec<Transition>) -> Block {
    Block {
        block_hash: format!("ab1null{height}"),
        header: Header {
            metadata: Metadata { height },
        },
        transactions: transitions
            .into_iter()
            .enumerate()
            .map(|(i, transition)| ConfirmedTransaction {
                status: STATUS_ACCEPTED.to_string(),
                kind: TYPE_EXECUTE.to_string(),
                index: i as u64,
                transaction: Transaction {
                    id: format!("at1null{height}x{i}"),
                    execution: Some(Execution {
                        transitions: vec![transition],
                    }),
                },
            })
            .collect(),
    }
}
