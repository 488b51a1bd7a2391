use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use shadow_crypto::{FieldElement, HashEngine};
use shadow_types::AccountId;
use tracing::debug;

use crate::tree::Levels;
use crate::{
    Leaf, LeafEntry, LeafIndex, MerkleError, MerkleProof, Snapshot, SnapshotReader, MAX_DEPTH,
};

/// The writable tree. Owned by the single mutator; readers go through
/// [`SnapshotReader`].
pub struct MerkleStore {
    engine: Arc<HashEngine>,
    working: Snapshot,
    published: Arc<RwLock<Arc<Snapshot>>>,
}

impl MerkleStore {
    /// An empty tree of the given depth.
    pub fn new(depth: u32, engine: Arc<HashEngine>) -> Result<Self, MerkleError> {
        check_depth(depth)?;
        let working = Snapshot {
            depth,
            levels: Levels::empty(depth, &engine)?,
            leaves: HashMap::new(),
            next_index: 0,
        };
        Ok(Self::with_working(engine, working))
    }

    /// Rebuild from persisted leaves, placing each at its stored index.
    ///
    /// Indices are handed out sequentially, so a sound log covers exactly
    /// `0..n`. Anything else is reported as corruption before level 0 is
    /// allocated.
    pub fn from_leaves(
        depth: u32,
        engine: Arc<HashEngine>,
        entries: impl IntoIterator<Item = LeafEntry>,
    ) -> Result<Self, MerkleError> {
        check_depth(depth)?;
        let capacity = 1u64 << depth;
        let mut levels = Levels::empty(depth, &engine)?;
        let mut leaves: HashMap<AccountId, Leaf> = HashMap::new();
        let mut taken: HashMap<LeafIndex, AccountId> = HashMap::new();

        for entry in entries {
            if entry.index >= capacity {
                return Err(MerkleError::IndexOutOfRange {
                    index: entry.index,
                    capacity,
                });
            }
            if taken.contains_key(&entry.index) {
                return Err(MerkleError::DuplicateIndex(entry.index));
            }
            if leaves.contains_key(&entry.account) {
                return Err(MerkleError::DuplicateAccount(entry.account.to_string()));
            }
            let hash = engine.hash_leaf(&entry.account, entry.balance, &entry.salt)?;
            taken.insert(entry.index, entry.account.clone());
            leaves.insert(
                entry.account.clone(),
                Leaf {
                    index: entry.index,
                    account: entry.account,
                    balance: entry.balance,
                    salt: entry.salt,
                    encrypted_salt: entry.encrypted_salt,
                    hash,
                },
            );
        }

        if let Some(&index) = taken.keys().find(|i| **i >= leaves.len() as u64) {
            return Err(MerkleError::IndexGap {
                index,
                leaves: leaves.len(),
            });
        }
        let next_index = leaves.len() as u64;
        let mut level0 = vec![levels.zero(0); leaves.len()];
        for leaf in leaves.values() {
            level0[leaf.index as usize] = leaf.hash;
        }
        levels.rebuild(&engine, level0)?;

        let working = Snapshot {
            depth,
            levels,
            leaves,
            next_index,
        };
        debug!(
            depth,
            leaves = working.leaf_count(),
            root = %working.root(),
            "merkle tree rebuilt from stored leaves"
        );
        Ok(Self::with_working(engine, working))
    }

    fn with_working(engine: Arc<HashEngine>, working: Snapshot) -> Self {
        let published = Arc::new(RwLock::new(Arc::new(working.clone())));
        Self {
            engine,
            working,
            published,
        }
    }

    /// Insert a new account or update an existing one, then publish.
    ///
    /// New accounts take the next free index. The stored ciphertext of an
    /// existing leaf is left untouched.
    pub fn insert_or_update(
        &mut self,
        account: &AccountId,
        balance: u64,
        salt: FieldElement,
    ) -> Result<LeafIndex, MerkleError> {
        let hash = self.engine.hash_leaf(account, balance, &salt)?;

        let index = match self.working.leaves.get_mut(account) {
            Some(leaf) => {
                if leaf.hash == hash {
                    return Ok(leaf.index);
                }
                leaf.balance = balance;
                leaf.salt = salt;
                leaf.hash = hash;
                leaf.index
            }
            None => {
                let capacity = self.working.capacity();
                let index = self.working.next_index;
                if index >= capacity {
                    return Err(MerkleError::CapacityExceeded { capacity });
                }
                self.working.leaves.insert(
                    account.clone(),
                    Leaf {
                        index,
                        account: account.clone(),
                        balance,
                        salt,
                        encrypted_salt: String::new(),
                        hash,
                    },
                );
                self.working.next_index = index + 1;
                index
            }
        };

        self.working.levels.set_leaf(&self.engine, index, hash)?;
        self.publish();
        debug!(%account, index, balance, root = %self.working.root(), "leaf written");
        Ok(index)
    }

    /// Replace the stored ciphertext of an existing leaf. No hash changes.
    pub fn set_encrypted_salt(
        &mut self,
        account: &AccountId,
        ciphertext: impl Into<String>,
    ) -> Result<(), MerkleError> {
        let leaf = self
            .working
            .leaves
            .get_mut(account)
            .ok_or_else(|| MerkleError::UnknownAccount(account.to_string()))?;
        let ciphertext = ciphertext.into();
        if leaf.encrypted_salt != ciphertext {
            leaf.encrypted_salt = ciphertext;
            self.publish();
        }
        Ok(())
    }

    fn publish(&self) {
        let next = Arc::new(self.working.clone());
        *self
            .published
            .write()
            .unwrap_or_else(PoisonError::into_inner) = next;
    }

    pub fn root(&self) -> FieldElement {
        self.working.root()
    }

    pub fn get_proof(&self, account: &AccountId) -> Option<MerkleProof> {
        self.working.proof(account)
    }

    pub fn leaf(&self, account: &AccountId) -> Option<&Leaf> {
        self.working.leaf(account)
    }

    pub fn depth(&self) -> u32 {
        self.working.depth
    }

    pub fn leaf_count(&self) -> usize {
        self.working.leaf_count()
    }

    pub fn engine(&self) -> &Arc<HashEngine> {
        &self.engine
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.published.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            published: Arc::clone(&self.published),
        }
    }
}

fn check_depth(depth: u32) -> Result<(), MerkleError> {
    if depth == 0 || depth > MAX_DEPTH {
        return Err(MerkleError::InvalidDepth(depth));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Arc<HashEngine> {
        Arc::new(HashEngine::new().unwrap())
    }

    fn acct(s: &str) -> AccountId {
        AccountId::new(s).unwrap()
    }

    fn fe(v: u64) -> FieldElement {
        FieldElement::from_u64(v)
    }

    #[test]
    fn rejects_bad_depth() {
        assert!(matches!(
            MerkleStore::new(0, engine()),
            Err(MerkleError::InvalidDepth(0))
        ));
        assert!(matches!(
            MerkleStore::new(33, engine()),
            Err(MerkleError::InvalidDepth(33))
        ));
    }

    #[test]
    fn indices_assigned_in_insertion_order() {
        let mut tree = MerkleStore::new(4, engine()).unwrap();
        assert_eq!(tree.insert_or_update(&acct("aleo1a"), 1, fe(1)).unwrap(), 0);
        assert_eq!(tree.insert_or_update(&acct("aleo1b"), 2, fe(2)).unwrap(), 1);
        assert_eq!(tree.insert_or_update(&acct("aleo1a"), 3, fe(3)).unwrap(), 0);
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn capacity_overflow_is_fatal() {
        let mut tree = MerkleStore::new(1, engine()).unwrap();
        tree.insert_or_update(&acct("aleo1a"), 1, fe(1)).unwrap();
        tree.insert_or_update(&acct("aleo1b"), 1, fe(1)).unwrap();
        let err = tree.insert_or_update(&acct("aleo1c"), 1, fe(1)).unwrap_err();
        assert!(matches!(err, MerkleError::CapacityExceeded { capacity: 2 }));
        assert!(err.is_fatal());
        // Existing leaves still update.
        tree.insert_or_update(&acct("aleo1a"), 9, fe(1)).unwrap();
    }

    #[test]
    fn encrypted_salt_does_not_change_root() {
        let mut tree = MerkleStore::new(3, engine()).unwrap();
        let a = acct("aleo1a");
        tree.insert_or_update(&a, 10, fe(7)).unwrap();
        let root = tree.root();
        tree.set_encrypted_salt(&a, "ciphertext").unwrap();
        assert_eq!(tree.root(), root);
        assert_eq!(tree.snapshot().leaf(&a).unwrap().encrypted_salt, "ciphertext");
    }

    #[test]
    fn encrypted_salt_unknown_account() {
        let mut tree = MerkleStore::new(3, engine()).unwrap();
        let err = tree.set_encrypted_salt(&acct("aleo1x"), "c").unwrap_err();
        assert!(matches!(err, MerkleError::UnknownAccount(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn reader_sees_published_snapshots() {
        let mut tree = MerkleStore::new(3, engine()).unwrap();
        let reader = tree.reader();
        let before = reader.current();
        tree.insert_or_update(&acct("aleo1a"), 10, fe(7)).unwrap();
        assert_ne!(before.root(), reader.root());
        assert_eq!(reader.root(), tree.root());
        // The pinned snapshot is unaffected.
        assert_eq!(before.leaf_count(), 0);
    }

    #[test]
    fn from_leaves_matches_incremental() {
        let e = engine();
        let mut tree = MerkleStore::new(5, Arc::clone(&e)).unwrap();
        for i in 0..7u64 {
            tree.insert_or_update(&acct(&format!("aleo1n{i}")), i * 10, fe(i)).unwrap();
        }
        tree.set_encrypted_salt(&acct("aleo1n3"), "enc3").unwrap();

        let entries: Vec<LeafEntry> = tree
            .snapshot()
            .leaves()
            .into_iter()
            .rev()
            .map(Leaf::to_entry)
            .collect();
        let rebuilt = MerkleStore::from_leaves(5, e, entries).unwrap();
        assert_eq!(rebuilt.root(), tree.root());
        assert_eq!(rebuilt.snapshot().next_index(), 7);
        assert_eq!(
            rebuilt.leaf(&acct("aleo1n3")).unwrap().encrypted_salt,
            "enc3"
        );
    }

    #[test]
    fn from_leaves_rejects_corrupt_input() {
        let entry = |index, name: &str| LeafEntry {
            index,
            account: acct(name),
            balance: 1,
            salt: fe(1),
            encrypted_salt: String::new(),
        };

        let dup_index = MerkleStore::from_leaves(3, engine(), [entry(0, "aleo1a"), entry(0, "aleo1b")]);
        assert!(matches!(dup_index, Err(MerkleError::DuplicateIndex(0))));

        let dup_account =
            MerkleStore::from_leaves(3, engine(), [entry(0, "aleo1a"), entry(1, "aleo1a")]);
        assert!(matches!(dup_account, Err(MerkleError::DuplicateAccount(_))));

        let out_of_range = MerkleStore::from_leaves(3, engine(), [entry(8, "aleo1a")]);
        assert!(matches!(
            out_of_range,
            Err(MerkleError::IndexOutOfRange { index: 8, capacity: 8 })
        ));
    }

    #[test]
    fn from_leaves_rejects_index_gap() {
        let entry = |index, name: &str| LeafEntry {
            index,
            account: acct(name),
            balance: 5,
            salt: fe(5),
            encrypted_salt: String::new(),
        };
        let gap = MerkleStore::from_leaves(2, engine(), [entry(0, "aleo1a"), entry(2, "aleo1b")]);
        assert!(matches!(gap, Err(MerkleError::IndexGap { index: 2, leaves: 2 })));

        // A corrupt index near the top of a deep tree fails before any
        // level is sized from it.
        let far = MerkleStore::from_leaves(32, engine(), [entry((1u64 << 32) - 1, "aleo1a")]);
        let err = far.err().unwrap();
        assert!(matches!(err, MerkleError::IndexGap { .. }));
        assert!(err.is_fatal());
    }
}
