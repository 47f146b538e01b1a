//! Conforming sample records shared by the unit tests.

use serde_json::{Value, json};

pub const BLOCK_ID: &str = "0x00000000851caf3cfdb6e899cf5958bfb1ac3413d346d43539627e6be7ec1b4a";
pub const PARENT_ID: &str = "0xffffffff53616c757465202620526573706563742c20457468657265756d2100";
pub const TX_ID: &str = "0x4de71f2d588aa8a1ea00fe8312d92966da424d9939a511fc0be81e65fad52af8";
pub const ROOT: &str = "0x45b0cfc220ceec5b7c1c62c4d4193d38e4eba48e8815729ce75f9c0ab0e4c1c0";
pub const TOPIC: &str = "0xb35bf4274d4295009f1ec66ed3f579db287889444366c03d3a695539372e8951";
pub const SIGNER: &str = "0x0000000000000000000000000000000000000000";
pub const ORIGIN: &str = "0x7567d83b7b8d80addcb281a71d54fc7b3364ffed";
pub const ENERGY: &str = "0x0000000000000000000000000000456e65726779";

pub fn block() -> Value {
    json!({
        "id": BLOCK_ID,
        "number": 0,
        "size": 170,
        "parentID": PARENT_ID,
        "timestamp": 1_530_014_400u64,
        "gasLimit": 10_000_000u64,
        "beneficiary": SIGNER,
        "gasUsed": 0,
        "totalScore": 0,
        "txsRoot": ROOT,
        "txsFeatures": 0,
        "stateRoot": ROOT,
        "receiptsRoot": ROOT,
        "signer": SIGNER,
        "isTrunk": true,
        "transactions": [TX_ID]
    })
}

pub fn expanded_block() -> Value {
    let mut block = block();
    let mut tx = transaction();
    if let Some(obj) = tx.as_object_mut() {
        obj.remove("meta");
    }
    block["transactions"] = json!([tx]);
    block
}

pub fn status() -> Value {
    json!({
        "head": {
            "id": BLOCK_ID,
            "number": 0,
            "timestamp": 1_530_014_400u64,
            "parentID": PARENT_ID
        },
        "progress": 1
    })
}

pub fn account() -> Value {
    json!({
        "balance": "25000000000000000000000000",
        "energy": "0",
        "hasCode": false
    })
}

pub fn clause() -> Value {
    json!({
        "to": ENERGY,
        "value": "0",
        "data": "0x06fdde03"
    })
}

pub fn tx_meta() -> Value {
    json!({
        "blockID": BLOCK_ID,
        "blockNumber": 0,
        "blockTimestamp": 1_530_014_400u64
    })
}

pub fn transaction() -> Value {
    json!({
        "id": TX_ID,
        "chainTag": 39,
        "blockRef": "0x0000000000000000",
        "expiration": 720,
        "clauses": [clause()],
        "gasPriceCoef": 0,
        "gas": 21_000,
        "origin": ORIGIN,
        "delegator": null,
        "nonce": "0x1234",
        "dependsOn": null,
        "size": 130,
        "meta": tx_meta()
    })
}

pub fn log_meta() -> Value {
    json!({
        "blockID": BLOCK_ID,
        "blockNumber": 0,
        "blockTimestamp": 1_530_014_400u64,
        "txID": TX_ID,
        "txOrigin": ORIGIN
    })
}

pub fn event_log(expanded: bool) -> Value {
    let mut log = json!({
        "address": ENERGY,
        "topics": [TOPIC],
        "data": "0x0000000000000000000000000000000000000000000000000000000000000001"
    });
    if expanded {
        log["meta"] = log_meta();
    }
    log
}

pub fn transfer_log(expanded: bool) -> Value {
    let mut log = json!({
        "sender": ORIGIN,
        "recipient": ENERGY,
        "amount": "1000000000000000000"
    });
    if expanded {
        log["meta"] = log_meta();
    }
    log
}

pub fn receipt() -> Value {
    json!({
        "gasUsed": 21_000,
        "gasPayer": ORIGIN,
        "paid": "210000000000000000",
        "reward": "63000000000000000",
        "reverted": false,
        "outputs": [{
            "contractAddress": null,
            "events": [event_log(false)],
            "transfers": [transfer_log(false)]
        }],
        "meta": log_meta()
    })
}

pub fn vm_output() -> Value {
    json!({
        "data": "0x",
        "vmError": "",
        "gasUsed": 591,
        "reverted": false,
        "events": [],
        "transfers": []
    })
}

pub fn reverted_vm_output() -> Value {
    let mut out = vm_output();
    out["reverted"] = json!(true);
    out["vmError"] = json!("execution reverted");
    out["decoded"] = json!({ "revertReason": "builtin: executor required" });
    out
}

pub fn event_criteria() -> Value {
    json!({
        "address": ENERGY,
        "topic0": TOPIC
    })
}

pub fn tx_response() -> Value {
    json!({
        "txid": TX_ID,
        "signer": ORIGIN
    })
}

pub fn cert_response() -> Value {
    json!({
        "annex": {
            "domain": "localhost",
            "timestamp": 1_545_035_330u64,
            "signer": ORIGIN
        },
        "signature": "0x1234"
    })
}
