//! Contract call (VM output) models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::log::{Event, Transfer};
use super::{HexBytes, decode_default};
use crate::validation::{
    Conformance, ConformanceError, FieldPath, FunctionAbi, RecordKind, ValidationError,
};

/// Decoded return data of a call.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Decoded {
    /// The call reverted with a reason string.
    Revert {
        #[serde(rename = "revertReason")]
        revert_reason: String,
    },
    /// Outputs keyed by position (`"0"`, ...) and by name.
    Fields(Map<String, Value>),
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VmOutput {
    pub data: HexBytes,
    /// Empty unless the call failed.
    pub vm_error: String,
    pub gas_used: u64,
    pub reverted: bool,
    pub events: Vec<Event>,
    pub transfers: Vec<Transfer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded: Option<Decoded>,
}

// Wire form; `decoded` is resolved against `reverted` afterwards.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVmOutput {
    data: HexBytes,
    vm_error: String,
    gas_used: u64,
    reverted: bool,
    events: Vec<Event>,
    transfers: Vec<Transfer>,
    #[serde(default)]
    decoded: Option<Map<String, Value>>,
}

impl VmOutput {
    pub fn from_value(value: &Value) -> Result<Self, ConformanceError> {
        let raw: RawVmOutput = decode_default(RecordKind::VmOutput, value)?;
        raw.resolve()
    }

    /// Same as [`VmOutput::from_value`], additionally checking `decoded`
    /// against the outputs of `abi`.
    pub fn from_value_with_abi(
        value: &Value,
        abi: &FunctionAbi,
    ) -> Result<Self, ConformanceError> {
        Conformance::default().vm_output_with_abi(value, abi)?;
        let raw = RawVmOutput::deserialize(value)?;
        raw.resolve()
    }

    pub fn revert_reason(&self) -> Option<&str> {
        match &self.decoded {
            Some(Decoded::Revert { revert_reason }) => Some(revert_reason),
            _ => None,
        }
    }
}

impl RawVmOutput {
    fn resolve(self) -> Result<VmOutput, ConformanceError> {
        let decoded = match self.decoded {
            None => None,
            Some(mut fields) if self.reverted => match fields.remove("revertReason") {
                Some(Value::String(revert_reason)) => Some(Decoded::Revert { revert_reason }),
                // unreachable for validated input
                _ => {
                    return Err(ValidationError::MissingField {
                        path: FieldPath::root().key("decoded"),
                        record: "decoded",
                        fields: vec!["revertReason".to_string()],
                    }
                    .into());
                }
            },
            Some(fields) => Some(Decoded::Fields(fields)),
        };

        Ok(VmOutput {
            data: self.data,
            vm_error: self.vm_error,
            gas_used: self.gas_used,
            reverted: self.reverted,
            events: self.events,
            transfers: self.transfers,
            decoded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use serde_json::json;

    #[test]
    fn completed_call() {
        let out = VmOutput::from_value(&fixtures::vm_output()).unwrap();
        assert!(!out.reverted);
        assert!(out.data.is_empty());
        assert!(out.decoded.is_none());
        assert_eq!(serde_json::to_value(&out).unwrap(), fixtures::vm_output());
    }

    #[test]
    fn reverted_call_carries_reason() {
        let out = VmOutput::from_value(&fixtures::reverted_vm_output()).unwrap();
        assert_eq!(out.revert_reason(), Some("builtin: executor required"));
        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            fixtures::reverted_vm_output()
        );
    }

    #[test]
    fn decoded_outputs_with_abi() {
        let abi = FunctionAbi::from_value(&json!({
            "name": "balanceOf",
            "inputs": [{ "name": "_owner", "type": "address" }],
            "outputs": [{ "name": "balance", "type": "uint256" }]
        }))
        .unwrap();

        let mut value = fixtures::vm_output();
        value["decoded"] = json!({ "0": "100", "balance": "100" });
        let out = VmOutput::from_value_with_abi(&value, &abi).unwrap();
        match out.decoded {
            Some(Decoded::Fields(fields)) => assert_eq!(fields["balance"], json!("100")),
            other => panic!("unexpected decoded: {other:?}"),
        }

        value["decoded"] = json!({ "0": "100" });
        assert!(VmOutput::from_value_with_abi(&value, &abi).is_err());
    }
}
