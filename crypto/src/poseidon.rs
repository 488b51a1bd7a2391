//! Poseidon hash engine.
//!
//! Uses the circom parameter set over the BN254 scalar field, which is what
//! `circomlibjs` (and therefore every client that rebuilds our root)
//! computes. Parameters for each supported arity are generated once in
//! [`HashEngine::new`]; there is no way to obtain an engine that has not
//! finished setup.

use std::sync::{Mutex, PoisonError};

use ark_bn254::Fr;
use light_poseidon::{Poseidon, PoseidonHasher};
use shadow_types::AccountId;

use crate::encoding::{encode_account, encode_balance};
use crate::{CryptoError, FieldElement};

/// Poseidon over BN254 for arities `1..=MAX_INPUTS`.
///
/// `light_poseidon` hashers carry a scratch state and need `&mut self`, so
/// each arity sits behind its own mutex. The engine is `Send + Sync` and can
/// be shared behind an `Arc`.
pub struct HashEngine {
    hashers: Vec<Mutex<Poseidon<Fr>>>,
}

impl HashEngine {
    /// Widest input the engine is set up for: leaves hash
    /// `(account, balance, salt)`.
    pub const MAX_INPUTS: usize = 3;

    /// Generate the circom parameters for every supported arity.
    pub fn new() -> Result<Self, CryptoError> {
        let hashers = (1..=Self::MAX_INPUTS)
            .map(|arity| {
                Poseidon::<Fr>::new_circom(arity)
                    .map(Mutex::new)
                    .map_err(|e| CryptoError::Poseidon(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { hashers })
    }

    /// Hash a sequence of field elements.
    pub fn hash(&self, inputs: &[FieldElement]) -> Result<FieldElement, CryptoError> {
        let arity = inputs.len();
        if arity == 0 || arity > Self::MAX_INPUTS {
            return Err(CryptoError::UnsupportedArity(arity));
        }
        let frs: Vec<Fr> = inputs.iter().map(FieldElement::inner).collect();
        let mut hasher = self.hashers[arity - 1]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        hasher
            .hash(&frs)
            .map(FieldElement::from)
            .map_err(|e| CryptoError::Poseidon(e.to_string()))
    }

    /// Internal node: `Hash(left, right)`.
    pub fn hash_pair(
        &self,
        left: &FieldElement,
        right: &FieldElement,
    ) -> Result<FieldElement, CryptoError> {
        self.hash(&[*left, *right])
    }

    /// Leaf value: `Hash(account, balance, salt)` under the canonical encoding.
    pub fn hash_leaf(
        &self,
        account: &AccountId,
        balance: u64,
        salt: &FieldElement,
    ) -> Result<FieldElement, CryptoError> {
        self.hash(&[encode_account(account), encode_balance(balance), *salt])
    }

    /// Padding value for empty leaf slots: `Hash(0)`.
    pub fn empty_leaf(&self) -> Result<FieldElement, CryptoError> {
        self.hash(&[FieldElement::zero()])
    }
}

impl std::fmt::Debug for HashEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashEngine")
            .field("max_inputs", &Self::MAX_INPUTS)
            .finish()
    }
}
