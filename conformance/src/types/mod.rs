//! Typed record models.
//!
//! The validators in [`crate::validation`] work on raw JSON. Callers that
//! want to go on working with a record after it passed validation can
//! decode it into the models below instead of re-reading loosely typed
//! objects. Every `from_value` constructor runs the matching validator
//! first, so a typed value can only be built from a conforming record.
//!
//! Mode-coupled shapes are separate enum variants: an expanded log always
//! has its `meta`, a compact one never does, and a reverted call's
//! `decoded` is a revert reason rather than a field map.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::predicates::{self, ADDRESS_LEN, BLOCK_REF_LEN, BYTES32_LEN};
use crate::validation::{Conformance, ConformanceError, RecordKind};

pub mod account;
pub mod block;
pub mod log;
pub mod tx;
pub mod vm;

pub use account::{Account, AccountCode, BlockHead, EventCriteria, Status, Storage};
pub use block::{Block, ExpandedBlock};
pub use log::{Event, EventLog, LogMeta, Transfer, TransferLog};
pub use tx::{Clause, Output, Receipt, Transaction, TxMeta};
pub use vm::{Decoded, VmOutput};

/// Error returned when a string is not a canonical encoding of a value.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseError {
    pub expected: &'static str,
    pub value: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}, got {:?}", self.expected, self.value)
    }
}

impl std::error::Error for ParseError {}

/// Fixed-length byte string, written as lowercase `0x` hex.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct FixedHex<const N: usize>(pub [u8; N]);

/// 20-byte account or contract address.
pub type Address = FixedHex<ADDRESS_LEN>;

/// 32-byte digest: block and transaction ids, roots, topics.
pub type Bytes32 = FixedHex<BYTES32_LEN>;

/// 8-byte reference to the block a transaction was built on.
pub type BlockRef = FixedHex<BLOCK_REF_LEN>;

impl<const N: usize> FixedHex<N> {
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> FromStr for FixedHex<N> {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError {
            expected: "lowercase 0x hex of fixed length",
            value: s.to_string(),
        };
        if !predicates::is_hex_bytes_str(s, Some(N)) {
            return Err(err());
        }
        let mut out = [0u8; N];
        hex::decode_to_slice(&s[2..], &mut out).map_err(|_| err())?;
        Ok(Self(out))
    }
}

impl<const N: usize> fmt::Display for FixedHex<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl<const N: usize> Serialize for FixedHex<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, const N: usize> Deserialize<'de> for FixedHex<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        parse_string(deserializer)
    }
}

/// Variable-length byte string (`data`, `nonce`, `code`, ...).
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct HexBytes(pub Vec<u8>);

impl HexBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for HexBytes {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError {
            expected: "lowercase 0x hex with an even digit count",
            value: s.to_string(),
        };
        if !predicates::is_hex_bytes_str(s, None) {
            return Err(err());
        }
        hex::decode(&s[2..]).map(HexBytes).map_err(|_| err())
    }
}

impl fmt::Display for HexBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl Serialize for HexBytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        parse_string(deserializer)
    }
}

/// Arbitrary-precision non-negative integer carried as a base-10 string.
///
/// Balances and fees overflow JSON's safe integer range, so the canonical
/// digits are kept as-is; [`DecimalUInt::to_u128`] converts when the value
/// fits.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DecimalUInt(String);

impl DecimalUInt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == "0"
    }

    pub fn to_u128(&self) -> Option<u128> {
        self.0.parse().ok()
    }
}

impl From<u128> for DecimalUInt {
    fn from(n: u128) -> Self {
        DecimalUInt(n.to_string())
    }
}

impl FromStr for DecimalUInt {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if predicates::is_decimal_uint_str(s) {
            Ok(DecimalUInt(s.to_string()))
        } else {
            Err(ParseError {
                expected: "decimal integer string without leading zeros",
                value: s.to_string(),
            })
        }
    }
}

impl fmt::Display for DecimalUInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for DecimalUInt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DecimalUInt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        parse_string(deserializer)
    }
}

fn parse_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = ParseError>,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(de::Error::custom)
}

/// Validates `value` as a `kind` record with `conformance`, then decodes it.
pub fn decode<T>(
    conformance: &Conformance,
    kind: RecordKind,
    value: &Value,
) -> Result<T, ConformanceError>
where
    T: DeserializeOwned,
{
    conformance.check(kind, value)?;
    Ok(T::deserialize(value)?)
}

// Strict default configuration, shared by the `from_value` constructors.
pub(crate) fn decode_default<T>(kind: RecordKind, value: &Value) -> Result<T, ConformanceError>
where
    T: DeserializeOwned,
{
    decode(&Conformance::default(), kind, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use serde_json::json;

    #[test]
    fn address_parses_and_displays_lowercase() {
        let a: Address = fixtures::ENERGY.parse().unwrap();
        assert_eq!(a.as_bytes()[16..], *b"ergy");
        assert_eq!(a.to_string(), fixtures::ENERGY);
    }

    #[test]
    fn fixed_hex_rejects_wrong_length_and_case() {
        assert!("0x00".parse::<Address>().is_err());
        assert!(
            "0xE59D475ABE695C7F67A8A2321F33A856B0B4C71D"
                .parse::<Address>()
                .is_err()
        );
        assert!(fixtures::ENERGY.parse::<Bytes32>().is_err());
        assert!("0x0000000000000000".parse::<BlockRef>().is_ok());
    }

    #[test]
    fn hex_bytes_round_trip_through_serde() {
        let h: HexBytes = serde_json::from_value(json!("0x06fdde03")).unwrap();
        assert_eq!(h.as_bytes(), &[0x06, 0xfd, 0xde, 0x03]);
        assert_eq!(serde_json::to_value(&h).unwrap(), json!("0x06fdde03"));

        let empty: HexBytes = "0x".parse().unwrap();
        assert!(empty.is_empty());

        let err = serde_json::from_value::<HexBytes>(json!("0x0")).unwrap_err();
        assert!(err.to_string().contains("even digit count"), "{err}");
    }

    #[test]
    fn decimal_uint_keeps_digits() {
        let d: DecimalUInt = "25000000000000000000000000".parse().unwrap();
        assert_eq!(d.to_u128(), Some(25_000_000_000_000_000_000_000_000));
        assert_eq!(d.to_string(), "25000000000000000000000000");
        assert!(DecimalUInt::from(0u128).is_zero());

        let huge: DecimalUInt = "1000000000000000000000000000000000000000000".parse().unwrap();
        assert_eq!(huge.to_u128(), None);

        assert!("007".parse::<DecimalUInt>().is_err());
        assert!(serde_json::from_value::<DecimalUInt>(json!(7)).is_err());
    }

    #[test]
    fn decode_reports_validation_before_decoding() {
        let mut account = fixtures::account();
        account["balance"] = json!(12);
        let tolerant = Conformance::new(crate::config::ConformanceConfig::tolerant());
        match decode::<Account>(&tolerant, RecordKind::Account, &account) {
            Err(ConformanceError::Validation(e)) => assert_eq!(e.path().to_string(), "balance"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
