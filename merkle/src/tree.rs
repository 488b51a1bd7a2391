//! Sparse level storage.
//!
//! Level `l` stores only the populated prefix of its nodes. Any position past
//! the stored prefix is the empty-subtree hash `Z(l)`, where `Z(0) = Hash(0)`
//! and `Z(l+1) = Hash(Z(l), Z(l))`. This is exactly what hashing a level 0
//! padded to `2^depth` entries would produce, without materializing it.

use std::sync::Arc;

use shadow_crypto::{CryptoError, FieldElement, HashEngine};

use crate::LeafIndex;

#[derive(Clone, Debug)]
pub(crate) struct Levels {
    depth: usize,
    zeros: Arc<[FieldElement]>,
    nodes: Vec<Vec<FieldElement>>,
}

impl Levels {
    pub(crate) fn empty(depth: u32, engine: &HashEngine) -> Result<Self, CryptoError> {
        let depth = depth as usize;
        let mut zeros = Vec::with_capacity(depth + 1);
        zeros.push(engine.empty_leaf()?);
        for level in 0..depth {
            let z = zeros[level];
            zeros.push(engine.hash_pair(&z, &z)?);
        }
        Ok(Self {
            depth,
            zeros: zeros.into(),
            nodes: vec![Vec::new(); depth + 1],
        })
    }

    pub(crate) fn zero(&self, level: usize) -> FieldElement {
        self.zeros[level]
    }

    pub(crate) fn node(&self, level: usize, position: u64) -> FieldElement {
        self.nodes[level]
            .get(position as usize)
            .copied()
            .unwrap_or(self.zeros[level])
    }

    pub(crate) fn root(&self) -> FieldElement {
        self.node(self.depth, 0)
    }

    fn set_node(&mut self, level: usize, position: u64, value: FieldElement) {
        let position = position as usize;
        let zero = self.zeros[level];
        let row = &mut self.nodes[level];
        if position >= row.len() {
            row.resize(position + 1, zero);
        }
        row[position] = value;
    }

    /// Write one leaf and recompute its path to the root.
    pub(crate) fn set_leaf(
        &mut self,
        engine: &HashEngine,
        index: LeafIndex,
        hash: FieldElement,
    ) -> Result<(), CryptoError> {
        self.set_node(0, index, hash);
        let mut position = index;
        for level in 0..self.depth {
            let parent = position / 2;
            let left = self.node(level, parent * 2);
            let right = self.node(level, parent * 2 + 1);
            let value = engine.hash_pair(&left, &right)?;
            self.set_node(level + 1, parent, value);
            position = parent;
        }
        Ok(())
    }

    /// Replace level 0 wholesale and hash every populated level bottom-up.
    pub(crate) fn rebuild(
        &mut self,
        engine: &HashEngine,
        leaves: Vec<FieldElement>,
    ) -> Result<(), CryptoError> {
        self.nodes[0] = leaves;
        for level in 0..self.depth {
            let width = self.nodes[level].len().div_ceil(2);
            let mut row = Vec::with_capacity(width);
            for parent in 0..width as u64 {
                let left = self.node(level, parent * 2);
                let right = self.node(level, parent * 2 + 1);
                row.push(engine.hash_pair(&left, &right)?);
            }
            self.nodes[level + 1] = row;
        }
        Ok(())
    }

    /// Siblings and direction bits for `index`, leaf-to-root.
    pub(crate) fn path(&self, index: LeafIndex) -> (Vec<FieldElement>, Vec<bool>) {
        let mut siblings = Vec::with_capacity(self.depth);
        let mut directions = Vec::with_capacity(self.depth);
        let mut position = index;
        for level in 0..self.depth {
            siblings.push(self.node(level, position ^ 1));
            directions.push(position & 1 == 1);
            position /= 2;
        }
        (siblings, directions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> HashEngine {
        HashEngine::new().unwrap()
    }

    #[test]
    fn empty_root_is_zero_chain() {
        let e = engine();
        let levels = Levels::empty(3, &e).unwrap();
        let z0 = e.empty_leaf().unwrap();
        let z1 = e.hash_pair(&z0, &z0).unwrap();
        let z2 = e.hash_pair(&z1, &z1).unwrap();
        let z3 = e.hash_pair(&z2, &z2).unwrap();
        assert_eq!(levels.root(), z3);
        assert_eq!(levels.zero(2), z2);
    }

    #[test]
    fn incremental_matches_rebuild() {
        let e = engine();
        let hashes: Vec<FieldElement> = (10..15).map(FieldElement::from_u64).collect();

        let mut incremental = Levels::empty(4, &e).unwrap();
        for (i, h) in hashes.iter().enumerate() {
            incremental.set_leaf(&e, i as u64, *h).unwrap();
        }

        let mut bulk = Levels::empty(4, &e).unwrap();
        bulk.rebuild(&e, hashes).unwrap();

        assert_eq!(incremental.root(), bulk.root());
        for i in 0..5 {
            assert_eq!(incremental.path(i), bulk.path(i));
        }
    }

    #[test]
    fn path_directions_follow_index_bits() {
        let e = engine();
        let levels = Levels::empty(3, &e).unwrap();
        let (_, dirs) = levels.path(5);
        assert_eq!(dirs, vec![true, false, true]);
    }
}
