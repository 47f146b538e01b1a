//! Transaction and receipt models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::log::{Event, LogMeta, Transfer};
use super::{Address, BlockRef, Bytes32, DecimalUInt, HexBytes, decode_default};
use crate::validation::{ConformanceError, RecordKind};

/// One `(to, value, data)` instruction of a transaction.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    /// `None` for contract creation.
    pub to: Option<Address>,
    pub value: DecimalUInt,
    pub data: HexBytes,
}

impl Clause {
    pub fn from_value(value: &Value) -> Result<Self, ConformanceError> {
        decode_default(RecordKind::Clause, value)
    }

    pub fn is_deployment(&self) -> bool {
        self.to.is_none()
    }
}

/// Block a transaction was included in.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxMeta {
    #[serde(rename = "blockID")]
    pub block_id: Bytes32,
    pub block_number: u64,
    pub block_timestamp: u64,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Bytes32,
    pub chain_tag: u8,
    pub block_ref: BlockRef,
    /// Blocks after `block_ref` the transaction stays valid for.
    pub expiration: u64,
    pub clauses: Vec<Clause>,
    pub gas_price_coef: u8,
    pub gas: u64,
    pub origin: Address,
    /// Fee payer of a delegated transaction.
    #[serde(default)]
    pub delegator: Option<Address>,
    pub nonce: HexBytes,
    pub depends_on: Option<Bytes32>,
    pub size: u64,
    /// `None` while the transaction is pending, or when embedded in an
    /// expanded block.
    #[serde(default)]
    pub meta: Option<TxMeta>,
}

impl Transaction {
    pub fn from_value(value: &Value) -> Result<Self, ConformanceError> {
        decode_default(RecordKind::Transaction, value)
    }

    pub fn is_pending(&self) -> bool {
        self.meta.is_none()
    }
}

/// Outcome of one clause.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    /// Set when the clause deployed a contract.
    pub contract_address: Option<Address>,
    pub events: Vec<Event>,
    pub transfers: Vec<Transfer>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub gas_used: u64,
    pub gas_payer: Address,
    pub paid: DecimalUInt,
    pub reward: DecimalUInt,
    pub reverted: bool,
    pub outputs: Vec<Output>,
    pub meta: LogMeta,
}

impl Receipt {
    pub fn from_value(value: &Value) -> Result<Self, ConformanceError> {
        decode_default(RecordKind::TransactionReceipt, value)
    }
}
