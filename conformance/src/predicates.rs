//! Primitive value predicates.
//!
//! Every predicate takes a raw [`Value`] of unknown shape and answers
//! `true`/`false`. None of them panics and none of them has side effects;
//! `null` and non-string values are simply rejected.
//!
//! The `*_str` variants operate on already-extracted strings and are what
//! the typed models in [`crate::types`] use when parsing.

use serde_json::Value;

/// Byte length of an account/contract address.
pub const ADDRESS_LEN: usize = 20;

/// Byte length of a 256-bit digest (block ids, tx ids, topics, roots).
pub const BYTES32_LEN: usize = 32;

/// Byte length of a transaction's `blockRef`.
pub const BLOCK_REF_LEN: usize = 8;

/// Returns `true` if `value` is a `0x`-prefixed lowercase hex string.
///
/// With `len == Some(n)` the payload must decode to exactly `n` bytes.
/// With `len == None` any even digit count is accepted, including the
/// empty payload `"0x"`.
pub fn is_hex_bytes(value: &Value, len: Option<usize>) -> bool {
    value.as_str().is_some_and(|s| is_hex_bytes_str(s, len))
}

/// String form of [`is_hex_bytes`].
pub fn is_hex_bytes_str(s: &str, len: Option<usize>) -> bool {
    let Some(digits) = s.strip_prefix("0x") else {
        return false;
    };
    if digits.len() % 2 != 0 {
        return false;
    }
    if let Some(n) = len {
        if digits.len() != n * 2 {
            return false;
        }
    }
    digits
        .bytes()
        .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// 20-byte lowercase hex address.
pub fn is_address(value: &Value) -> bool {
    is_hex_bytes(value, Some(ADDRESS_LEN))
}

/// 32-byte lowercase hex digest.
pub fn is_bytes32(value: &Value) -> bool {
    is_hex_bytes(value, Some(BYTES32_LEN))
}

/// Returns `true` for a JSON number holding a non-negative integer.
///
/// Floats are rejected even when integral (`3.0`): canonical producers
/// emit integers without a fraction part.
pub fn is_uint(value: &Value) -> bool {
    value.as_u64().is_some()
}

/// Returns `true` for a base-10 string without leading zeros (`"0"` itself
/// is allowed).
pub fn is_decimal_uint(value: &Value) -> bool {
    value.as_str().is_some_and(is_decimal_uint_str)
}

/// String form of [`is_decimal_uint`].
pub fn is_decimal_uint_str(s: &str) -> bool {
    is_numeric_identifier(s)
}

/// Optionally signed decimal string (`"-12"`, `"0"`, `"42"`), as produced
/// by ABI decoders for `intN` values.
pub fn is_decimal_int_str(s: &str) -> bool {
    match s.strip_prefix('-') {
        Some(rest) => rest != "0" && is_numeric_identifier(rest),
        None => is_numeric_identifier(s),
    }
}

/// Returns `true` if `value` is a semantic version string
/// (`MAJOR.MINOR.PATCH[-prerelease][+build]`).
pub fn is_semver(value: &Value) -> bool {
    value.as_str().is_some_and(is_semver_str)
}

/// String form of [`is_semver`].
pub fn is_semver_str(s: &str) -> bool {
    let (rest, build) = match s.split_once('+') {
        Some((rest, build)) => (rest, Some(build)),
        None => (s, None),
    };
    let (core, pre) = match rest.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (rest, None),
    };

    let mut parts = core.split('.');
    let core_ok = (0..3).all(|_| parts.next().is_some_and(is_numeric_identifier))
        && parts.next().is_none();
    if !core_ok {
        return false;
    }

    if let Some(pre) = pre {
        let ok = pre.split('.').all(|id| {
            is_alnum_identifier(id)
                && (!id.bytes().all(|b| b.is_ascii_digit()) || is_numeric_identifier(id))
        });
        if !ok {
            return false;
        }
    }

    build.is_none_or(|b| b.split('.').all(is_alnum_identifier))
}

// Decimal digits, no leading zero unless the literal is "0".
fn is_numeric_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) && (s == "0" || !s.starts_with('0'))
}

fn is_alnum_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hex_bytes_accepts_lowercase_even_payloads() {
        assert!(is_hex_bytes(&json!("0x06fdde03"), None));
        assert!(is_hex_bytes(&json!("0x06fdde03"), Some(4)));
        assert!(is_hex_bytes(&json!("0x"), None));
        assert!(is_hex_bytes(&json!("0x"), Some(0)));
    }

    #[test]
    fn hex_bytes_rejects_malformed_payloads() {
        assert!(!is_hex_bytes(&json!("0x06FDDE03"), None));
        assert!(!is_hex_bytes(&json!("0x0"), None));
        assert!(!is_hex_bytes(&json!("06fdde03"), None));
        assert!(!is_hex_bytes(&json!("0X06fdde03"), None));
        assert!(!is_hex_bytes(&json!("0x06fdde03"), Some(5)));
        assert!(!is_hex_bytes(&json!("0xzz"), None));
    }

    #[test]
    fn predicates_never_accept_non_strings() {
        for v in [json!(null), json!(12), json!(true), json!([]), json!({})] {
            assert!(!is_hex_bytes(&v, None), "{v}");
            assert!(!is_address(&v), "{v}");
            assert!(!is_bytes32(&v), "{v}");
            assert!(!is_semver(&v), "{v}");
            assert!(!is_decimal_uint(&v), "{v}");
        }
    }

    #[test]
    fn address_and_bytes32_lengths() {
        assert!(is_address(&json!("0x0000000000000000000000000000456e65726779")));
        assert!(!is_address(&json!("0x00")));
        assert!(is_bytes32(&json!(
            "0x000000000b2bce3c70bc649a02749e8687721b09ed2e15997f466536b20bb127"
        )));
        // 31 bytes
        assert!(!is_bytes32(&json!(
            "0x000000000b2bce3c70bc649a02749e8687721b09ed2e15997f466536b20bb1"
        )));
        // checksummed (mixed-case) form is not canonical
        assert!(!is_address(&json!("0xe59D475Abe695c7f67a8a2321f33A856B0B4c71d")));
    }

    #[test]
    fn semver_grammar() {
        assert!(is_semver(&json!("1.2.3")));
        assert!(is_semver(&json!("0.0.0")));
        assert!(is_semver(&json!("1.2.3-beta.1")));
        assert!(is_semver(&json!("1.2.3+build.5")));
        assert!(is_semver(&json!("1.2.3-rc.1+sha.0a1b")));
        assert!(is_semver(&json!("1.0.0-x-y-z.--")));

        assert!(!is_semver(&json!("1.2")));
        assert!(!is_semver(&json!("1.2.3.4")));
        assert!(!is_semver(&json!("01.2.3")));
        assert!(!is_semver(&json!("1.2.3-")));
        assert!(!is_semver(&json!("1.2.3-01")));
        assert!(!is_semver(&json!("1.2.3-beta..1")));
        assert!(!is_semver(&json!("1.2.3+")));
        assert!(!is_semver(&json!("v1.2.3")));
    }

    #[test]
    fn uint_accepts_non_negative_integral_numbers() {
        assert!(is_uint(&json!(0)));
        assert!(is_uint(&json!(1_700_000_000u64)));
        assert!(!is_uint(&json!(3.0)));
        assert!(!is_uint(&json!(-1)));
        assert!(!is_uint(&json!(1.5)));
        assert!(!is_uint(&json!("1")));
        assert!(!is_uint(&json!(null)));
    }

    #[test]
    fn decimal_uint_strings() {
        assert!(is_decimal_uint(&json!("0")));
        assert!(is_decimal_uint(&json!("100")));
        assert!(is_decimal_uint(&json!(
            "1000000000000000000000000000000000000000000"
        )));
        assert!(!is_decimal_uint(&json!("")));
        assert!(!is_decimal_uint(&json!("007")));
        assert!(!is_decimal_uint(&json!("0x64")));
        assert!(!is_decimal_uint(&json!("-1")));
        assert!(!is_decimal_uint(&json!(100)));
    }

    #[test]
    fn decimal_int_strings() {
        assert!(is_decimal_int_str("-12"));
        assert!(is_decimal_int_str("0"));
        assert!(!is_decimal_int_str("-0"));
        assert!(!is_decimal_int_str("--1"));
        assert!(!is_decimal_int_str("+1"));
    }
}
