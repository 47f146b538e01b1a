//! Schema tables for every record the client API returns.
//!
//! Field order is the order violations are discovered in first-violation
//! mode. Mode-coupled members (`meta`/`decoded` on logs) are declared with
//! [`Presence::RequiredIn`] / [`Presence::AllowedIn`]; the VM output's
//! revert branch is a refine hook because it keys off a field value.

use serde_json::{Map, Value};

use super::abi::{DECODED, check_decoded};
use super::engine::{Ctx, Step, check_value};
use super::error::Mode;
use super::schema::{Field, Presence, Rule, Schema};

/// Maximum number of topics on one event log (`topic0`..`topic4`).
pub const MAX_TOPICS: usize = 5;

// Element rules for arrays of nested records. Logs nested in receipts and
// VM outputs never carry `meta`, so they are checked in compact mode.
static EVENT_LOG_ITEM: Rule = Rule::Record {
    schema: &EVENT_LOG,
    mode: Some(Mode::Compact),
};

static TRANSFER_LOG_ITEM: Rule = Rule::Record {
    schema: &TRANSFER_LOG,
    mode: Some(Mode::Compact),
};

static CLAUSE_ITEM: Rule = Rule::Record {
    schema: &CLAUSE,
    mode: None,
};

static EMBEDDED_TRANSACTION_ITEM: Rule = Rule::Record {
    schema: &EMBEDDED_TRANSACTION,
    mode: None,
};

static OUTPUT_ITEM: Rule = Rule::Record {
    schema: &OUTPUT,
    mode: None,
};

static TX_META_RECORD: Rule = Rule::Record {
    schema: &TX_META,
    mode: None,
};

pub static BLOCK: Schema = Schema {
    name: "Block",
    fields: &[
        Field::required("id", Rule::BYTES32),
        Field::required("number", Rule::UInt),
        Field::required("size", Rule::UInt),
        Field::required("parentID", Rule::BYTES32),
        Field::required("timestamp", Rule::UInt),
        Field::required("gasLimit", Rule::UInt),
        Field::required("beneficiary", Rule::ADDRESS),
        Field::required("gasUsed", Rule::UInt),
        Field::required("totalScore", Rule::UInt),
        Field::required("txsRoot", Rule::BYTES32),
        Field::optional("txsFeatures", Rule::UInt),
        Field::required("stateRoot", Rule::BYTES32),
        Field::required("receiptsRoot", Rule::BYTES32),
        Field::required("signer", Rule::ADDRESS),
        Field::required("isTrunk", Rule::Bool),
        Field::required(
            "transactions",
            Rule::Array {
                item: &Rule::BYTES32,
                max_len: None,
            },
        ),
    ],
    refine: None,
};

/// Block whose `transactions` are embedded transaction records.
pub static EXPANDED_BLOCK: Schema = Schema {
    name: "Block",
    fields: &[
        Field::required("id", Rule::BYTES32),
        Field::required("number", Rule::UInt),
        Field::required("size", Rule::UInt),
        Field::required("parentID", Rule::BYTES32),
        Field::required("timestamp", Rule::UInt),
        Field::required("gasLimit", Rule::UInt),
        Field::required("beneficiary", Rule::ADDRESS),
        Field::required("gasUsed", Rule::UInt),
        Field::required("totalScore", Rule::UInt),
        Field::required("txsRoot", Rule::BYTES32),
        Field::optional("txsFeatures", Rule::UInt),
        Field::required("stateRoot", Rule::BYTES32),
        Field::required("receiptsRoot", Rule::BYTES32),
        Field::required("signer", Rule::ADDRESS),
        Field::required("isTrunk", Rule::Bool),
        Field::required(
            "transactions",
            Rule::Array {
                item: &EMBEDDED_TRANSACTION_ITEM,
                max_len: None,
            },
        ),
    ],
    refine: None,
};

pub static BLOCK_HEAD: Schema = Schema {
    name: "Head",
    fields: &[
        Field::required("id", Rule::BYTES32),
        Field::required("number", Rule::UInt),
        Field::required("timestamp", Rule::UInt),
        Field::required("parentID", Rule::BYTES32),
    ],
    refine: None,
};

pub static STATUS: Schema = Schema {
    name: "Status",
    fields: &[
        Field::required(
            "head",
            Rule::Record {
                schema: &BLOCK_HEAD,
                mode: None,
            },
        ),
        Field::required("progress", Rule::Fraction),
    ],
    refine: None,
};

pub static ACCOUNT: Schema = Schema {
    name: "Account",
    fields: &[
        Field::required("balance", Rule::DecimalUInt),
        Field::required("energy", Rule::DecimalUInt),
        Field::required("hasCode", Rule::Bool),
    ],
    refine: None,
};

pub static ACCOUNT_CODE: Schema = Schema {
    name: "Code",
    fields: &[Field::required("code", Rule::BYTES)],
    refine: None,
};

pub static STORAGE: Schema = Schema {
    name: "Storage",
    fields: &[Field::required("value", Rule::BYTES)],
    refine: None,
};

pub static CLAUSE: Schema = Schema {
    name: "Clause",
    fields: &[
        Field::required("to", Rule::Nullable(&Rule::ADDRESS)),
        Field::required("value", Rule::DecimalUInt),
        Field::required("data", Rule::BYTES),
    ],
    refine: None,
};

pub static TX_META: Schema = Schema {
    name: "TransactionMeta",
    fields: &[
        Field::required("blockID", Rule::BYTES32),
        Field::required("blockNumber", Rule::UInt),
        Field::required("blockTimestamp", Rule::UInt),
    ],
    refine: None,
};

pub static TRANSACTION: Schema = Schema {
    name: "Transaction",
    fields: &[
        Field::required("id", Rule::BYTES32),
        Field::required("chainTag", Rule::UINT8),
        Field::required("blockRef", Rule::BLOCK_REF),
        Field::required("expiration", Rule::UInt),
        Field::required(
            "clauses",
            Rule::Array {
                item: &CLAUSE_ITEM,
                max_len: None,
            },
        ),
        Field::required("gasPriceCoef", Rule::UINT8),
        Field::required("gas", Rule::UInt),
        Field::required("origin", Rule::ADDRESS),
        Field::optional("delegator", Rule::Nullable(&Rule::ADDRESS)),
        Field::required("nonce", Rule::BYTES),
        Field::required("dependsOn", Rule::Nullable(&Rule::BYTES32)),
        Field::required("size", Rule::UInt),
        // null while pending
        Field::required("meta", Rule::Nullable(&TX_META_RECORD)),
    ],
    refine: None,
};

/// Transaction as embedded in an expanded block; block linkage is implied
/// by the enclosing block, so `meta` may be omitted.
pub static EMBEDDED_TRANSACTION: Schema = Schema {
    name: "Transaction",
    fields: &[
        Field::required("id", Rule::BYTES32),
        Field::required("chainTag", Rule::UINT8),
        Field::required("blockRef", Rule::BLOCK_REF),
        Field::required("expiration", Rule::UInt),
        Field::required(
            "clauses",
            Rule::Array {
                item: &CLAUSE_ITEM,
                max_len: None,
            },
        ),
        Field::required("gasPriceCoef", Rule::UINT8),
        Field::required("gas", Rule::UInt),
        Field::required("origin", Rule::ADDRESS),
        Field::optional("delegator", Rule::Nullable(&Rule::ADDRESS)),
        Field::required("nonce", Rule::BYTES),
        Field::required("dependsOn", Rule::Nullable(&Rule::BYTES32)),
        Field::required("size", Rule::UInt),
        Field::optional("meta", Rule::Nullable(&TX_META_RECORD)),
    ],
    refine: None,
};

pub static LOG_META: Schema = Schema {
    name: "LogMeta",
    fields: &[
        Field::required("blockID", Rule::BYTES32),
        Field::required("blockNumber", Rule::UInt),
        Field::required("blockTimestamp", Rule::UInt),
        Field::required("txID", Rule::BYTES32),
        Field::required("txOrigin", Rule::ADDRESS),
    ],
    refine: None,
};

pub static EVENT_LOG: Schema = Schema {
    name: "EventLog",
    fields: &[
        Field::required("address", Rule::ADDRESS),
        Field::required(
            "topics",
            Rule::Array {
                item: &Rule::BYTES32,
                max_len: Some(MAX_TOPICS),
            },
        ),
        Field::required("data", Rule::BYTES),
        Field::modal(
            "meta",
            Presence::RequiredIn(Mode::Expanded),
            Rule::Record {
                schema: &LOG_META,
                mode: None,
            },
        ),
        Field::modal("decoded", Presence::AllowedIn(Mode::Expanded), Rule::Object),
    ],
    refine: Some(refine_event_log),
};

pub static TRANSFER_LOG: Schema = Schema {
    name: "TransferLog",
    fields: &[
        Field::required("sender", Rule::ADDRESS),
        Field::required("recipient", Rule::ADDRESS),
        Field::required("amount", Rule::DecimalUInt),
        Field::modal(
            "meta",
            Presence::RequiredIn(Mode::Expanded),
            Rule::Record {
                schema: &LOG_META,
                mode: None,
            },
        ),
    ],
    refine: None,
};

pub static OUTPUT: Schema = Schema {
    name: "Output",
    fields: &[
        Field::required("contractAddress", Rule::Nullable(&Rule::ADDRESS)),
        Field::required(
            "events",
            Rule::Array {
                item: &EVENT_LOG_ITEM,
                max_len: None,
            },
        ),
        Field::required(
            "transfers",
            Rule::Array {
                item: &TRANSFER_LOG_ITEM,
                max_len: None,
            },
        ),
    ],
    refine: None,
};

pub static RECEIPT: Schema = Schema {
    name: "Receipt",
    fields: &[
        Field::required("gasUsed", Rule::UInt),
        Field::required("gasPayer", Rule::ADDRESS),
        Field::required("paid", Rule::DecimalUInt),
        Field::required("reward", Rule::DecimalUInt),
        Field::required("reverted", Rule::Bool),
        Field::required(
            "outputs",
            Rule::Array {
                item: &OUTPUT_ITEM,
                max_len: None,
            },
        ),
        Field::required(
            "meta",
            Rule::Record {
                schema: &LOG_META,
                mode: None,
            },
        ),
    ],
    refine: None,
};

pub static VM_OUTPUT: Schema = Schema {
    name: "VMOutput",
    fields: &[
        Field::required("data", Rule::BYTES),
        Field::required("vmError", Rule::Str),
        Field::required("gasUsed", Rule::UInt),
        Field::required("reverted", Rule::Bool),
        Field::required(
            "events",
            Rule::Array {
                item: &EVENT_LOG_ITEM,
                max_len: None,
            },
        ),
        Field::required(
            "transfers",
            Rule::Array {
                item: &TRANSFER_LOG_ITEM,
                max_len: None,
            },
        ),
        Field::optional("decoded", Rule::Object),
    ],
    refine: Some(refine_vm_output),
};

/// Shape of `decoded` on a reverted call.
pub static REVERT_DECODED: Schema = Schema {
    name: "decoded",
    fields: &[Field::required("revertReason", Rule::Str)],
    refine: None,
};

pub static EVENT_CRITERIA: Schema = Schema {
    name: "EventCriteria",
    fields: &[
        Field::optional("address", Rule::ADDRESS),
        Field::optional("topic0", Rule::BYTES32),
        Field::optional("topic1", Rule::BYTES32),
        Field::optional("topic2", Rule::BYTES32),
        Field::optional("topic3", Rule::BYTES32),
        Field::optional("topic4", Rule::BYTES32),
    ],
    refine: None,
};

pub static TX_RESPONSE: Schema = Schema {
    name: "TxResponse",
    fields: &[
        Field::required("txid", Rule::BYTES32),
        Field::required("signer", Rule::ADDRESS),
    ],
    refine: None,
};

pub static CERT_ANNEX: Schema = Schema {
    name: "Annex",
    fields: &[
        Field::required("domain", Rule::Str),
        Field::required("timestamp", Rule::UInt),
        Field::required("signer", Rule::ADDRESS),
    ],
    refine: None,
};

pub static CERT_RESPONSE: Schema = Schema {
    name: "CertResponse",
    fields: &[
        Field::required(
            "annex",
            Rule::Record {
                schema: &CERT_ANNEX,
                mode: None,
            },
        ),
        Field::required("signature", Rule::BYTES),
    ],
    refine: None,
};

// With an event ABI in hand, an expanded log must carry `decoded` and it
// must follow the ABI's inputs.
fn refine_event_log(obj: &Map<String, Value>, ctx: &mut Ctx<'_>) -> Step {
    if ctx.mode() != Some(Mode::Expanded) {
        return Ok(());
    }
    let Some(params) = ctx.abi() else {
        return Ok(());
    };
    match obj.get(DECODED) {
        // a non-object has already been reported by the field rule
        Some(decoded) if !decoded.is_object() => Ok(()),
        Some(decoded) => ctx.at_key(DECODED, |ctx| check_decoded(decoded, params, ctx)),
        None => ctx.mode_mismatch(DECODED, Mode::Expanded, false),
    }
}

fn refine_vm_output(obj: &Map<String, Value>, ctx: &mut Ctx<'_>) -> Step {
    let Some(decoded) = obj.get(DECODED).filter(|d| d.is_object()) else {
        return Ok(());
    };
    // A non-boolean `reverted` has already been reported.
    let Some(reverted) = obj.get("reverted").and_then(Value::as_bool) else {
        return Ok(());
    };

    ctx.at_key(DECODED, |ctx| {
        if reverted {
            check_revert_decoded(decoded, ctx)
        } else {
            match ctx.abi() {
                Some(params) => check_decoded(decoded, params, ctx),
                None => Ok(()),
            }
        }
    })
}

// Under a revert only `revertReason` may appear; anything else is a
// decode of outputs that do not exist.
fn check_revert_decoded(decoded: &Value, ctx: &mut Ctx<'_>) -> Step {
    let Some(obj) = decoded.as_object() else {
        return Ok(());
    };
    let stray: Vec<&String> = obj
        .keys()
        .filter(|k| !REVERT_DECODED.declares(k))
        .collect();
    for key in stray {
        ctx.mode_mismatch(key, Mode::Reverted, true)?;
    }
    match obj.get("revertReason") {
        Some(reason) => ctx.at_key("revertReason", |ctx| check_value(reason, &Rule::Str, ctx)),
        None => ctx.missing(REVERT_DECODED.name, vec!["revertReason".to_string()]),
    }
}
