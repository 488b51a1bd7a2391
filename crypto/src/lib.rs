//! Hash engine for the Shadow Vote indexer.
//!
//! - **Poseidon** (circom parameters, BN254 scalar field) for leaf and node
//!   hashing, bit-compatible with `circomlibjs`.
//! - **Field encoding**: the one canonical mapping from accounts, balances
//!   and salts into field elements, shared by the indexer and its clients.
//! - **Blake2b** for folding non-numeric account identifiers into the field.

pub mod encoding;
pub mod error;
pub mod field;
pub mod poseidon;

pub use encoding::{blake2b_256, encode_account, encode_balance};
pub use error::CryptoError;
pub use field::FieldElement;
pub use poseidon::HashEngine;
