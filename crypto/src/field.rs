//! BN254 scalar field element with a decimal wire form.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::CryptoError;

/// An element of the BN254 scalar field.
///
/// Serialized as the decimal string of its canonical representative, which
/// is the form used by the HTTP API and by clients rebuilding the root.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldElement(Fr);

fn modulus() -> &'static BigUint {
    static MODULUS: OnceLock<BigUint> = OnceLock::new();
    MODULUS.get_or_init(|| BigUint::from_bytes_be(&Fr::MODULUS.to_bytes_be()))
}

impl FieldElement {
    pub fn zero() -> Self {
        Self(Fr::from(0u64))
    }

    pub fn from_u64(value: u64) -> Self {
        Self(Fr::from(value))
    }

    /// Interpret big-endian bytes as an integer and reduce it mod p.
    pub fn from_be_bytes_mod_order(bytes: &[u8]) -> Self {
        Self(Fr::from_be_bytes_mod_order(bytes))
    }

    /// Parse a plain decimal string. Chain literals carry a `field` suffix
    /// that the literal parser strips before calling this.
    ///
    /// Values at or above the modulus are rejected rather than reduced, so
    /// every accepted string has exactly one meaning.
    pub fn from_decimal(s: &str) -> Result<Self, CryptoError> {
        let digits = s.trim();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CryptoError::InvalidFieldElement(s.to_string()));
        }
        let value: BigUint = digits
            .parse()
            .map_err(|_| CryptoError::InvalidFieldElement(s.to_string()))?;
        if &value >= modulus() {
            return Err(CryptoError::OutOfRange(s.to_string()));
        }
        Ok(Self(Fr::from_be_bytes_mod_order(&value.to_bytes_be())))
    }

    /// Canonical decimal representation.
    pub fn to_decimal(&self) -> String {
        BigUint::from_bytes_be(&self.0.into_bigint().to_bytes_be()).to_string()
    }

    /// Canonical 32-byte big-endian representation.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let bytes = self.0.into_bigint().to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - bytes.len()..].copy_from_slice(&bytes);
        out
    }

    /// The value as a `u64`, if it is below 2^64.
    pub fn to_u64(&self) -> Option<u64> {
        let bytes = self.to_be_bytes();
        let (high, low) = bytes.split_at(24);
        if high.iter().any(|b| *b != 0) {
            return None;
        }
        let mut word = [0u8; 8];
        word.copy_from_slice(low);
        Some(u64::from_be_bytes(word))
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    pub fn inner(&self) -> Fr {
        self.0
    }
}

impl From<Fr> for FieldElement {
    fn from(fr: Fr) -> Self {
        Self(fr)
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl Default for FieldElement {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal())
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_decimal())
    }
}

impl FromStr for FieldElement {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal(s)
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_decimal(&s).map_err(serde::de::Error::custom)
    }
}
