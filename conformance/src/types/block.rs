//! Block models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::tx::Transaction;
use super::{Address, Bytes32, decode_default};
use crate::validation::{ConformanceError, RecordKind};

/// Block as returned by the client API.
///
/// `T` is the type of the `transactions` entries: transaction ids for a
/// regular block, full [`Transaction`] records for an [`ExpandedBlock`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block<T = Bytes32> {
    pub id: Bytes32,
    pub number: u64,
    pub size: u64,
    #[serde(rename = "parentID")]
    pub parent_id: Bytes32,
    pub timestamp: u64,
    pub gas_limit: u64,
    pub beneficiary: Address,
    pub gas_used: u64,
    pub total_score: u64,
    pub txs_root: Bytes32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txs_features: Option<u64>,
    pub state_root: Bytes32,
    pub receipts_root: Bytes32,
    pub signer: Address,
    pub is_trunk: bool,
    pub transactions: Vec<T>,
}

/// Block with its transactions embedded.
pub type ExpandedBlock = Block<Transaction>;

impl Block {
    pub fn from_value(value: &Value) -> Result<Self, ConformanceError> {
        decode_default(RecordKind::Block, value)
    }
}

impl ExpandedBlock {
    pub fn from_expanded_value(value: &Value) -> Result<Self, ConformanceError> {
        decode_default(RecordKind::ExpandedBlock, value)
    }

    /// Collapses the block to its transaction ids.
    pub fn into_summary(self) -> Block {
        Block {
            id: self.id,
            number: self.number,
            size: self.size,
            parent_id: self.parent_id,
            timestamp: self.timestamp,
            gas_limit: self.gas_limit,
            beneficiary: self.beneficiary,
            gas_used: self.gas_used,
            total_score: self.total_score,
            txs_root: self.txs_root,
            txs_features: self.txs_features,
            state_root: self.state_root,
            receipts_root: self.receipts_root,
            signer: self.signer,
            is_trunk: self.is_trunk,
            transactions: self.transactions.into_iter().map(|tx| tx.id).collect(),
        }
    }
}

impl<T> Block<T> {
    pub fn is_genesis(&self) -> bool {
        self.number == 0
    }
}
