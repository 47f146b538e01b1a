//! Account state, node status and log filter models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Address, Bytes32, DecimalUInt, HexBytes, decode_default};
use crate::validation::{ConformanceError, RecordKind};

/// Balance and energy of an account.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub balance: DecimalUInt,
    pub energy: DecimalUInt,
    /// Whether a contract is deployed at the address.
    pub has_code: bool,
}

impl Account {
    pub fn from_value(value: &Value) -> Result<Self, ConformanceError> {
        decode_default(RecordKind::Account, value)
    }
}

/// Deployed contract bytecode (`"0x"` for plain accounts).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AccountCode {
    pub code: HexBytes,
}

impl AccountCode {
    pub fn from_value(value: &Value) -> Result<Self, ConformanceError> {
        decode_default(RecordKind::AccountCode, value)
    }
}

/// Value of one contract storage slot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Storage {
    pub value: HexBytes,
}

impl Storage {
    pub fn from_value(value: &Value) -> Result<Self, ConformanceError> {
        decode_default(RecordKind::Storage, value)
    }
}

/// Summary of the best block a node knows about.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BlockHead {
    pub id: Bytes32,
    pub number: u64,
    pub timestamp: u64,
    #[serde(rename = "parentID")]
    pub parent_id: Bytes32,
}

/// Node sync status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub head: BlockHead,
    /// Sync progress in `[0, 1]`.
    pub progress: f64,
}

impl Status {
    pub fn from_value(value: &Value) -> Result<Self, ConformanceError> {
        decode_default(RecordKind::Status, value)
    }

    pub fn is_synced(&self) -> bool {
        self.progress >= 1.0
    }
}

/// Address/topic filter selecting event logs. Absent members match
/// anything.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct EventCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic0: Option<Bytes32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic1: Option<Bytes32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic2: Option<Bytes32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic3: Option<Bytes32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic4: Option<Bytes32>,
}

impl EventCriteria {
    pub fn from_value(value: &Value) -> Result<Self, ConformanceError> {
        decode_default(RecordKind::EventCriteria, value)
    }

    /// Topic filters in position order.
    pub fn topics(&self) -> [Option<&Bytes32>; 5] {
        [
            self.topic0.as_ref(),
            self.topic1.as_ref(),
            self.topic2.as_ref(),
            self.topic3.as_ref(),
            self.topic4.as_ref(),
        ]
    }

    /// Returns `true` if a log emitted by `address` with `topics` passes
    /// this filter.
    pub fn matches(&self, address: &Address, topics: &[Bytes32]) -> bool {
        if self.address.as_ref().is_some_and(|a| a != address) {
            return false;
        }
        self.topics()
            .into_iter()
            .enumerate()
            .all(|(i, want)| want.is_none_or(|t| topics.get(i) == Some(t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use serde_json::json;

    #[test]
    fn account_from_fixture() {
        let account = Account::from_value(&fixtures::account()).unwrap();
        assert!(!account.has_code);
        assert!(account.energy.is_zero());
        assert_eq!(
            account.balance.to_u128(),
            Some(25_000_000_000_000_000_000_000_000)
        );
    }

    #[test]
    fn status_from_fixture() {
        let status = Status::from_value(&fixtures::status()).unwrap();
        assert!(status.is_synced());
        assert_eq!(status.head.parent_id.to_string(), fixtures::PARENT_ID);
    }

    #[test]
    fn code_and_storage() {
        let code = AccountCode::from_value(&json!({ "code": "0x" })).unwrap();
        assert!(code.code.is_empty());
        assert!(Storage::from_value(&json!({ "value": "0xzz" })).is_err());
    }

    #[test]
    fn criteria_matching() {
        let criteria = EventCriteria::from_value(&fixtures::event_criteria()).unwrap();
        let energy: Address = fixtures::ENERGY.parse().unwrap();
        let origin: Address = fixtures::ORIGIN.parse().unwrap();
        let topic: Bytes32 = fixtures::TOPIC.parse().unwrap();

        assert!(criteria.matches(&energy, &[topic]));
        assert!(!criteria.matches(&origin, &[topic]));
        assert!(!criteria.matches(&energy, &[]));
        assert!(EventCriteria::default().matches(&origin, &[]));

        // absent members are not serialized back
        let round = serde_json::to_value(&criteria).unwrap();
        assert_eq!(round, fixtures::event_criteria());
    }
}
