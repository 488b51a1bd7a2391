//! Canonical encoding of leaf inputs into the field.
//!
//! Clients recompute leaf hashes with exactly these rules, so they are part
//! of the wire contract and must never change for a deployed tree.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use shadow_types::AccountId;

use crate::FieldElement;

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Map an account identifier into the field.
///
/// A numeric identifier that fits in a `u64` is taken as-is. Anything
/// else, such as an `aleo1…` address, is Blake2b-256 hashed and the digest
/// reduced mod p as a big-endian integer. Hashed values always land at or
/// above 2^64, so the two ranges never meet and distinct accounts encode
/// to distinct elements.
pub fn encode_account(account: &AccountId) -> FieldElement {
    match account.numeric_value() {
        Some(value) => FieldElement::from_u64(value),
        None => hash_account(account.as_str()),
    }
}

/// A reduced digest below 2^64 is hashed again until it is not.
fn hash_account(id: &str) -> FieldElement {
    let mut digest = blake2b_256(id.as_bytes());
    loop {
        let value = FieldElement::from_be_bytes_mod_order(&digest);
        if value.to_u64().is_none() {
            return value;
        }
        digest = blake2b_256(&digest);
    }
}

/// Map a balance into the field (identity on the integer value).
pub fn encode_balance(balance: u64) -> FieldElement {
    FieldElement::from_u64(balance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(s: &str) -> AccountId {
        AccountId::new(s).unwrap()
    }

    #[test]
    fn blake2b_deterministic() {
        assert_eq!(blake2b_256(b"shadow"), blake2b_256(b"shadow"));
        assert_ne!(blake2b_256(b"shadow"), blake2b_256(b"vote"));
    }

    #[test]
    fn numeric_accounts_encode_directly() {
        assert_eq!(encode_account(&account("12345")), FieldElement::from_u64(12345));
        assert_eq!(encode_account(&account("9field")), FieldElement::from_u64(9));
        assert_eq!(encode_account(&account("009")), FieldElement::from_u64(9));
    }

    #[test]
    fn distinct_accounts_encode_distinctly() {
        let victim = account("aleo1dv6fre2y82gzw58aqga20v8mkjcjm8dj77s8fjfnnflcuhhx6y8qp9ml66");
        let encoded = encode_account(&victim);
        assert_eq!(encoded.to_u64(), None);

        // An account named after the victim's encoding is a different key
        // and must land on a different element.
        let impostor = account(&encoded.to_decimal());
        assert_ne!(impostor, victim);
        assert_ne!(encode_account(&impostor), encoded);

        // Numbers above u64 are hashed, not taken as-is.
        let big = account("18446744073709551616");
        assert_eq!(encode_account(&big).to_u64(), None);
        assert_eq!(encode_account(&big), hash_account("18446744073709551616"));
    }

    #[test]
    fn address_accounts_are_hashed() {
        let a = account("aleo1dv6fre2y82gzw58aqga20v8mkjcjm8dj77s8fjfnnflcuhhx6y8qp9ml66");
        let expected = FieldElement::from_be_bytes_mod_order(&blake2b_256(a.as_str().as_bytes()));
        assert_eq!(encode_account(&a), expected);
        assert_ne!(encode_account(&a), encode_account(&account("aleo1other")));
    }

    #[test]
    fn balance_is_identity() {
        assert_eq!(encode_balance(100), FieldElement::from_u64(100));
        assert_eq!(encode_balance(u64::MAX).to_decimal(), u64::MAX.to_string());
    }
}
