//! ABI descriptions used to check `decoded` members.
//!
//! Contract-call outputs and expanded event logs may carry a `decoded`
//! object produced from an ABI fragment. Given that fragment, the object
//! must hold one key per parameter position (`"0"`, `"1"`, ...) plus one
//! key per named parameter, each holding a value of the declared type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::engine::{Ctx, Step, check_value};
use super::schema::Rule;

/// Record name used when reporting on `decoded` objects.
pub(crate) const DECODED: &str = "decoded";

/// One input or output parameter of an ABI fragment.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AbiParam {
    /// Parameter name; empty for unnamed outputs.
    #[serde(default)]
    pub name: String,
    /// Solidity type, e.g. `address`, `uint256`, `bytes32[]`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether an event input is indexed (stored as a topic).
    #[serde(default)]
    pub indexed: bool,
}

impl AbiParam {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            indexed: false,
        }
    }
}

/// Function fragment of a JSON ABI.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FunctionAbi {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
}

impl FunctionAbi {
    /// Parses a function fragment (extra ABI members are ignored).
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

/// Event fragment of a JSON ABI.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EventAbi {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub anonymous: bool,
}

impl EventAbi {
    /// Parses an event fragment (extra ABI members are ignored).
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

/// Checks a `decoded` object against `params` at the context's path.
pub(crate) fn check_decoded(value: &Value, params: &[AbiParam], ctx: &mut Ctx<'_>) -> Step {
    let Some(obj) = value.as_object() else {
        return ctx.type_mismatch("object", value);
    };

    let mut expected: Vec<String> = Vec::with_capacity(params.len() * 2);
    for (i, p) in params.iter().enumerate() {
        expected.push(i.to_string());
        if !p.name.is_empty() {
            expected.push(p.name.clone());
        }
    }

    let missing: Vec<String> = expected
        .iter()
        .filter(|k| !obj.contains_key(k.as_str()))
        .cloned()
        .collect();
    if !missing.is_empty() {
        ctx.missing(DECODED, missing)?;
    }

    if ctx.rejects_unknown_fields() {
        let undeclared: Vec<String> = obj
            .keys()
            .filter(|k| !expected.contains(k))
            .cloned()
            .collect();
        if !undeclared.is_empty() {
            ctx.unexpected(DECODED, undeclared)?;
        }
    }

    for (i, p) in params.iter().enumerate() {
        let key = i.to_string();
        let positional = obj.get(&key);
        if let Some(v) = positional {
            ctx.at_key(&key, |ctx| check_abi_value(v, &p.kind, ctx))?;
        }
        if p.name.is_empty() {
            continue;
        }
        // The named entry normally mirrors the positional one.
        if let Some(v) = obj.get(&p.name) {
            if positional != Some(v) {
                ctx.at_key(&p.name, |ctx| check_abi_value(v, &p.kind, ctx))?;
            }
        }
    }

    Ok(())
}

/// Checks one decoded value against a Solidity type name.
///
/// Types without a string/number convention here (tuples, fixed-point)
/// are accepted as-is.
pub(crate) fn check_abi_value(value: &Value, kind: &str, ctx: &mut Ctx<'_>) -> Step {
    if let Some((inner, size)) = split_array_type(kind) {
        let Some(items) = value.as_array() else {
            return ctx.type_mismatch("array", value);
        };
        if let Some(n) = size {
            if n != items.len() {
                ctx.format("array of the declared fixed length")?;
            }
        }
        for (i, item) in items.iter().enumerate() {
            ctx.at_index(i, |ctx| check_abi_value(item, inner, ctx))?;
        }
        return Ok(());
    }

    match rule_for(kind) {
        Some(rule) => check_value(value, &rule, ctx),
        None => Ok(()),
    }
}

// "uint256[3]" -> ("uint256", Some(3)), "bytes32[]" -> ("bytes32", None)
fn split_array_type(kind: &str) -> Option<(&str, Option<usize>)> {
    let body = kind.strip_suffix(']')?;
    let open = body.rfind('[')?;
    let size = &body[open + 1..];
    let size = if size.is_empty() {
        None
    } else {
        Some(size.parse().ok()?)
    };
    Some((&body[..open], size))
}

fn rule_for(kind: &str) -> Option<Rule> {
    match kind {
        "address" => return Some(Rule::ADDRESS),
        "bool" => return Some(Rule::Bool),
        "string" => return Some(Rule::Str),
        "bytes" => return Some(Rule::BYTES),
        _ => {}
    }

    if let Some(width) = kind.strip_prefix("bytes") {
        let n: usize = width.parse().ok()?;
        return (1..=32).contains(&n).then_some(Rule::Hex(Some(n)));
    }
    if let Some(bits) = kind.strip_prefix("uint") {
        return is_bit_width(bits).then_some(Rule::DecimalUInt);
    }
    if let Some(bits) = kind.strip_prefix("int") {
        return is_bit_width(bits).then_some(Rule::DecimalInt);
    }
    None
}

fn is_bit_width(bits: &str) -> bool {
    bits.is_empty() || bits.parse::<u16>().is_ok_and(|b| b > 0 && b <= 256 && b % 8 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConformanceConfig, ReportMode};
    use crate::validation::error::ValidationError;
    use serde_json::json;

    fn run(value: &Value, params: &[AbiParam]) -> Vec<ValidationError> {
        let cfg = ConformanceConfig::default();
        let mut ctx = Ctx::new(&cfg, ReportMode::AllViolations);
        let _ = check_decoded(value, params, &mut ctx);
        ctx.into_violations()
    }

    fn candidate_inputs() -> Vec<AbiParam> {
        let abi = json!({
            "anonymous": false,
            "inputs": [
                { "indexed": true, "name": "nodeMaster", "type": "address" },
                { "indexed": false, "name": "action", "type": "bytes32" }
            ],
            "name": "Candidate",
            "type": "event"
        });
        EventAbi::from_value(&abi).unwrap().inputs
    }

    #[test]
    fn parses_function_fragment_ignoring_extra_members() {
        let abi = json!({
            "constant": true,
            "inputs": [],
            "name": "name",
            "outputs": [{ "name": "", "type": "string" }],
            "payable": false,
            "stateMutability": "pure",
            "type": "function"
        });
        let f = FunctionAbi::from_value(&abi).unwrap();
        assert_eq!(f.name, "name");
        assert_eq!(f.outputs, vec![AbiParam::new("", "string")]);
    }

    #[test]
    fn accepts_positional_and_named_entries() {
        let decoded = json!({
            "0": "0x0000000000000000000000417574686f72697479",
            "1": "0x0000000000000000000000000000000000000000000000000000000000000001",
            "nodeMaster": "0x0000000000000000000000417574686f72697479",
            "action": "0x0000000000000000000000000000000000000000000000000000000000000001"
        });
        assert!(run(&decoded, &candidate_inputs()).is_empty());
    }

    #[test]
    fn reports_missing_named_entry() {
        let decoded = json!({
            "0": "0x0000000000000000000000417574686f72697479",
            "1": "0x0000000000000000000000000000000000000000000000000000000000000001",
            "nodeMaster": "0x0000000000000000000000417574686f72697479"
        });
        let errs = run(&decoded, &candidate_inputs());
        match &errs[..] {
            [ValidationError::MissingField { fields, .. }] => assert_eq!(fields, &["action"]),
            other => panic!("unexpected violations: {other:?}"),
        }
    }

    #[test]
    fn reports_value_of_wrong_abi_type() {
        let decoded = json!({
            "0": "0x00",
            "1": "0x0000000000000000000000000000000000000000000000000000000000000001",
            "nodeMaster": "0x00",
            "action": "0x0000000000000000000000000000000000000000000000000000000000000001"
        });
        let errs = run(&decoded, &candidate_inputs());
        // named entry mirrors the positional one and is not reported twice
        assert_eq!(errs.len(), 1, "{errs:?}");
        assert_eq!(errs[0].path().to_string(), "0");
    }

    #[test]
    fn checks_arrays_and_integers() {
        let params = vec![
            AbiParam::new("amounts", "uint256[2]"),
            AbiParam::new("delta", "int8"),
        ];
        let ok = json!({ "0": ["1", "20"], "1": "-3", "amounts": ["1", "20"], "delta": "-3" });
        assert!(run(&ok, &params).is_empty());

        let bad = json!({ "0": ["1"], "1": 3, "amounts": ["1"], "delta": 3 });
        let errs = run(&bad, &params);
        assert_eq!(errs.len(), 2, "{errs:?}");
        assert!(matches!(errs[0], ValidationError::Format { .. }));
        assert!(matches!(errs[1], ValidationError::TypeMismatch { .. }));
    }

    #[test]
    fn unknown_types_are_accepted() {
        let params = vec![AbiParam::new("", "tuple")];
        assert!(run(&json!({ "0": { "a": 1 } }), &params).is_empty());
    }

    #[test]
    fn array_type_splitting() {
        assert_eq!(split_array_type("uint256[3]"), Some(("uint256", Some(3))));
        assert_eq!(split_array_type("bytes32[]"), Some(("bytes32", None)));
        assert_eq!(split_array_type("address[2][]"), Some(("address[2]", None)));
        assert_eq!(split_array_type("address"), None);
    }
}
