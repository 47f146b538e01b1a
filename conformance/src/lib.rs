//! Conformance checks for blockchain client API records.
//!
//! Client API responses (blocks, node status, accounts, transactions,
//! receipts, contract call outputs, event and transfer logs) are plain
//! JSON. This crate decides whether such a value is a well-formed record
//! of a given type and, if not, reports where and why it is not:
//!
//! - primitive value predicates (`predicates`),
//! - declarative per-record schemas and the validators built on them
//!   (`validation`),
//! - typed models that can only be built from conforming records
//!   (`types`),
//! - and the checker configuration (`config`).
//!
//! ```
//! use conformance::{ensure_event_log, ErrorCategory};
//! use serde_json::json;
//!
//! let log = json!({
//!     "address": "0x0000000000000000000000000000456e65726779",
//!     "topics": [],
//!     "data": "0x",
//!     "meta": {
//!         "blockID": "0x00000000851caf3cfdb6e899cf5958bfb1ac3413d346d43539627e6be7ec1b4a",
//!         "blockNumber": 0,
//!         "blockTimestamp": 1530014400,
//!         "txID": "0x4de71f2d588aa8a1ea00fe8312d92966da424d9939a511fc0be81e65fad52af8",
//!         "txOrigin": "0x7567d83b7b8d80addcb281a71d54fc7b3364ffed"
//!     }
//! });
//! assert!(ensure_event_log(&log, true).is_ok());
//!
//! let err = ensure_event_log(&log, false).unwrap_err();
//! assert_eq!(err.category(), ErrorCategory::ModeMismatch);
//! ```

pub mod config;
pub mod predicates;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod fixtures;

pub use config::{ConfigError, ConformanceConfig, ReportMode, UnknownFields};

pub use validation::{
    AbiParam, CombinedValidator, Conformance, ConformanceError, ErrorCategory, EventAbi,
    FieldPath, FunctionAbi, KindValidator, Mode, RecordKind, RecordValidator, UnknownRecordKind,
    ValidationError, Violations,
};

pub use validation::{
    ensure_account, ensure_account_code, ensure_block, ensure_cert_response, ensure_clause,
    ensure_event_criteria, ensure_event_log, ensure_event_log_with_abi, ensure_expanded_block,
    ensure_status, ensure_storage, ensure_transaction, ensure_transaction_receipt,
    ensure_transfer_log, ensure_tx_response, ensure_vm_output, ensure_vm_output_with_abi,
};
