use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use shadow_crypto::FieldElement;
use shadow_types::AccountId;

use crate::tree::Levels;
use crate::{AccountProof, Leaf, LeafIndex, MerkleProof};

/// An immutable, internally consistent view of the tree.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub(crate) depth: u32,
    pub(crate) levels: Levels,
    pub(crate) leaves: HashMap<AccountId, Leaf>,
    pub(crate) next_index: LeafIndex,
}

impl Snapshot {
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }

    pub fn root(&self) -> FieldElement {
        self.levels.root()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Index the next new account will receive.
    pub fn next_index(&self) -> LeafIndex {
        self.next_index
    }

    pub fn leaf(&self, account: &AccountId) -> Option<&Leaf> {
        self.leaves.get(account)
    }

    /// All leaves in index order.
    pub fn leaves(&self) -> Vec<&Leaf> {
        let mut out: Vec<&Leaf> = self.leaves.values().collect();
        out.sort_by_key(|leaf| leaf.index);
        out
    }

    /// Empty-subtree hash at `level`.
    pub fn zero_hash(&self, level: u32) -> FieldElement {
        self.levels.zero(level as usize)
    }

    /// Inclusion proof for `account`, or `None` if it has no leaf.
    pub fn proof(&self, account: &AccountId) -> Option<MerkleProof> {
        let leaf = self.leaves.get(account)?;
        let (siblings, directions) = self.levels.path(leaf.index);
        Some(MerkleProof {
            leaf: leaf.hash,
            index: leaf.index,
            siblings,
            directions,
            root: self.root(),
        })
    }

    /// Proof plus the leaf's stored ciphertext.
    pub fn proof_for(&self, account: &AccountId) -> Option<AccountProof> {
        let leaf = self.leaves.get(account)?;
        let proof = self.proof(account)?;
        Some(AccountProof {
            proof,
            encrypted_salt: leaf.encrypted_salt.clone(),
        })
    }
}

/// Cloneable read handle onto the most recently published snapshot.
#[derive(Clone, Debug)]
pub struct SnapshotReader {
    pub(crate) published: Arc<RwLock<Arc<Snapshot>>>,
}

impl SnapshotReader {
    /// The current snapshot. Holding the returned `Arc` pins that version.
    pub fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.published.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn root(&self) -> FieldElement {
        self.current().root()
    }
}
