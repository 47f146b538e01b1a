//! Event and transfer log models.
//!
//! Logs come in two retrieval modes. [`Event`] and [`Transfer`] are the
//! compact bodies that also appear nested in receipts and VM outputs;
//! [`EventLog`] and [`TransferLog`] wrap them with the expanded-mode
//! `meta` linkage when it was requested.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Address, Bytes32, DecimalUInt, HexBytes, decode_default};
use crate::validation::{ConformanceError, RecordKind};

/// Block and transaction a log was emitted in.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMeta {
    #[serde(rename = "blockID")]
    pub block_id: Bytes32,
    pub block_number: u64,
    pub block_timestamp: u64,
    #[serde(rename = "txID")]
    pub tx_id: Bytes32,
    pub tx_origin: Address,
}

/// Contract event without linkage.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub address: Address,
    pub topics: Vec<Bytes32>,
    pub data: HexBytes,
}

/// Value transfer without linkage.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub sender: Address,
    pub recipient: Address,
    pub amount: DecimalUInt,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventLog {
    Expanded {
        #[serde(flatten)]
        event: Event,
        meta: LogMeta,
        /// Fields decoded with the emitting contract's ABI, if requested.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        decoded: Option<Map<String, Value>>,
    },
    Compact(Event),
}

impl EventLog {
    pub fn from_value(value: &Value, expanded: bool) -> Result<Self, ConformanceError> {
        decode_default(RecordKind::EventLog { expanded }, value)
    }

    pub fn event(&self) -> &Event {
        match self {
            EventLog::Expanded { event, .. } | EventLog::Compact(event) => event,
        }
    }

    pub fn meta(&self) -> Option<&LogMeta> {
        match self {
            EventLog::Expanded { meta, .. } => Some(meta),
            EventLog::Compact(_) => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransferLog {
    Expanded {
        #[serde(flatten)]
        transfer: Transfer,
        meta: LogMeta,
    },
    Compact(Transfer),
}

impl TransferLog {
    pub fn from_value(value: &Value, expanded: bool) -> Result<Self, ConformanceError> {
        decode_default(RecordKind::TransferLog { expanded }, value)
    }

    pub fn transfer(&self) -> &Transfer {
        match self {
            TransferLog::Expanded { transfer, .. } | TransferLog::Compact(transfer) => transfer,
        }
    }

    pub fn meta(&self) -> Option<&LogMeta> {
        match self {
            TransferLog::Expanded { meta, .. } => Some(meta),
            TransferLog::Compact(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use serde_json::json;

    #[test]
    fn expanded_and_compact_event_logs() {
        let expanded = EventLog::from_value(&fixtures::event_log(true), true).unwrap();
        let meta = expanded.meta().unwrap();
        assert_eq!(meta.tx_id.to_string(), fixtures::TX_ID);
        assert_eq!(meta.block_number, 0);

        let compact = EventLog::from_value(&fixtures::event_log(false), false).unwrap();
        assert!(compact.meta().is_none());
        assert_eq!(compact.event(), expanded.event());
    }

    #[test]
    fn mode_is_checked_before_decoding() {
        match EventLog::from_value(&fixtures::event_log(true), false) {
            Err(ConformanceError::Validation(e)) => {
                assert_eq!(e.category(), crate::validation::ErrorCategory::ModeMismatch)
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn decoded_fields_are_kept_on_expanded_logs() {
        let mut value = fixtures::event_log(true);
        value["decoded"] = json!({ "0": "1", "amount": "1" });
        match EventLog::from_value(&value, true).unwrap() {
            EventLog::Expanded { decoded, .. } => {
                assert_eq!(decoded.unwrap().get("amount"), Some(&json!("1")))
            }
            other => panic!("expected expanded log, got {other:?}"),
        }
    }

    #[test]
    fn transfer_logs() {
        let log = TransferLog::from_value(&fixtures::transfer_log(true), true).unwrap();
        assert!(log.meta().is_some());
        assert_eq!(
            log.transfer().amount.to_u128(),
            Some(1_000_000_000_000_000_000)
        );

        let compact = TransferLog::from_value(&fixtures::transfer_log(false), false).unwrap();
        assert_eq!(
            serde_json::to_value(&compact).unwrap(),
            fixtures::transfer_log(false)
        );
    }
}
