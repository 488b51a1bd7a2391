//! Typed Aleo literals.
//!
//! Transition inputs arrive as strings such as `100u64`, `7u32`,
//! `123field`, `aleo1…` or bracketed arrays of those. A trailing
//! `.public`/`.private` visibility marker is tolerated.

use shadow_crypto::FieldElement;
use shadow_types::AccountId;

use crate::LiteralError;

fn strip_visibility(s: &str) -> &str {
    let s = s.trim();
    s.strip_suffix(".public")
        .or_else(|| s.strip_suffix(".private"))
        .unwrap_or(s)
}

fn strip_type<'a>(s: &'a str, suffix: &'static str) -> Result<&'a str, LiteralError> {
    let s = strip_visibility(s);
    s.strip_suffix(suffix)
        .ok_or_else(|| LiteralError::WrongType {
            expected: suffix,
            value: s.to_string(),
        })
}

fn parse_digits<T: std::str::FromStr>(payload: &str, original: &str) -> Result<T, LiteralError> {
    let digits = payload.replace('_', "");
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LiteralError::InvalidNumber(original.to_string()));
    }
    digits
        .parse()
        .map_err(|_| LiteralError::InvalidNumber(original.to_string()))
}

/// `100u64` -> 100.
pub fn parse_u64(s: &str) -> Result<u64, LiteralError> {
    parse_digits(strip_type(s, "u64")?, s)
}

/// `7u32` -> 7.
pub fn parse_u32(s: &str) -> Result<u32, LiteralError> {
    parse_digits(strip_type(s, "u32")?, s)
}

/// `123field` -> field element 123. Values at or above the modulus fail.
pub fn parse_field(s: &str) -> Result<FieldElement, LiteralError> {
    let payload = strip_type(s, "field")?;
    FieldElement::from_decimal(payload).map_err(|e| LiteralError::InvalidField(e.to_string()))
}

/// An account address. Anything non-empty without whitespace is accepted.
pub fn parse_address(s: &str) -> Result<AccountId, LiteralError> {
    let s = strip_visibility(s);
    AccountId::new(s).map_err(|_| LiteralError::InvalidAddress(s.to_string()))
}

/// `[a, b, c]` -> `["a", "b", "c"]`. Whitespace and newlines between
/// elements are ignored; an empty array yields no elements.
pub fn parse_array(s: &str) -> Result<Vec<&str>, LiteralError> {
    let inner = strip_visibility(s)
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| LiteralError::NotAnArray(s.to_string()))?;
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(inner.split(',').map(str::trim).collect())
}

/// A field array with `0field` padding removed.
pub fn parse_options(s: &str) -> Result<Vec<FieldElement>, LiteralError> {
    let mut out = Vec::new();
    for element in parse_array(s)? {
        let fe = parse_field(element)?;
        if !fe.is_zero() {
            out.push(fe);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers() {
        assert_eq!(parse_u64("100u64"), Ok(100));
        assert_eq!(parse_u64("1_000u64"), Ok(1000));
        assert_eq!(parse_u64("18446744073709551615u64"), Ok(u64::MAX));
        assert_eq!(parse_u32("7u32"), Ok(7));
        assert_eq!(parse_u64("5u64.public"), Ok(5));
    }

    #[test]
    fn integer_errors() {
        assert!(matches!(parse_u64("100"), Err(LiteralError::WrongType { .. })));
        assert!(matches!(parse_u64("100u32"), Err(LiteralError::WrongType { .. })));
        assert!(matches!(parse_u64("u64"), Err(LiteralError::InvalidNumber(_))));
        assert!(matches!(parse_u64("-1u64"), Err(LiteralError::InvalidNumber(_))));
        assert!(matches!(
            parse_u64("18446744073709551616u64"),
            Err(LiteralError::InvalidNumber(_))
        ));
        assert!(matches!(parse_u32("4294967296u32"), Err(LiteralError::InvalidNumber(_))));
    }

    #[test]
    fn fields() {
        assert_eq!(parse_field("123field"), Ok(FieldElement::from_u64(123)));
        assert!(matches!(parse_field("123"), Err(LiteralError::WrongType { .. })));
        assert!(matches!(parse_field("abcfield"), Err(LiteralError::InvalidField(_))));
        assert!(matches!(parse_field("1fieldfield"), Err(LiteralError::InvalidField(_))));
        let p = "21888242871839275222246405745257275088548364400416034343698204186575808495617field";
        assert!(matches!(parse_field(p), Err(LiteralError::InvalidField(_))));
    }

    #[test]
    fn arrays() {
        assert_eq!(parse_array("[1field, 2field]"), Ok(vec!["1field", "2field"]));
        assert_eq!(parse_array("[\n  1field,\n  2field\n]"), Ok(vec!["1field", "2field"]));
        assert_eq!(parse_array("[]"), Ok(vec![]));
        assert!(matches!(parse_array("1field"), Err(LiteralError::NotAnArray(_))));
    }

    #[test]
    fn options_drop_zero_padding() {
        let opts = parse_options("[11field, 22field, 0field, 0field]").unwrap();
        assert_eq!(opts, vec![FieldElement::from_u64(11), FieldElement::from_u64(22)]);
        assert!(parse_options("[11field, 2u64]").is_err());
    }

    #[test]
    fn addresses() {
        assert_eq!(
            parse_address("aleo1abc.private").unwrap().as_str(),
            "aleo1abc"
        );
        assert!(matches!(parse_address("  "), Err(LiteralError::InvalidAddress(_))));
    }
}
