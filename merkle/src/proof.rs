use serde::{Deserialize, Serialize};
use shadow_crypto::{CryptoError, FieldElement, HashEngine};

use crate::LeafIndex;

/// Inclusion proof for one leaf, ordered leaf-to-root.
///
/// `directions[i]` is `true` when the node on the path at level `i` is the
/// right child, i.e. `siblings[i]` is hashed on the left.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    pub leaf: FieldElement,
    pub index: LeafIndex,
    pub siblings: Vec<FieldElement>,
    pub directions: Vec<bool>,
    pub root: FieldElement,
}

impl MerkleProof {
    /// Replay the path from `leaf` and return the resulting root.
    pub fn compute_root(&self, engine: &HashEngine) -> Result<FieldElement, CryptoError> {
        self.compute_root_from(engine, &self.leaf)
    }

    /// Replay the path from an arbitrary leaf value.
    pub fn compute_root_from(
        &self,
        engine: &HashEngine,
        leaf: &FieldElement,
    ) -> Result<FieldElement, CryptoError> {
        let mut node = *leaf;
        for (sibling, is_right) in self.siblings.iter().zip(&self.directions) {
            node = if *is_right {
                engine.hash_pair(sibling, &node)?
            } else {
                engine.hash_pair(&node, sibling)?
            };
        }
        Ok(node)
    }

    /// True if the path reproduces `root`.
    pub fn verify(&self, engine: &HashEngine, root: &FieldElement) -> Result<bool, CryptoError> {
        Ok(self.compute_root(engine)? == *root)
    }

    pub fn depth(&self) -> usize {
        self.siblings.len()
    }
}

/// A proof together with the leaf's stored ciphertext, taken from one
/// snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProof {
    pub proof: MerkleProof,
    pub encrypted_salt: String,
}
