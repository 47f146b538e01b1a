//! Declarative schema tables.
//!
//! A [`Schema`] lists every field a record may carry, how its presence is
//! governed ([`Presence`]) and which [`Rule`] its value must satisfy.
//! Record-specific branches that depend on the value of another field
//! (e.g. a VM output's `decoded` shape depending on `reverted`) are
//! attached as a [`Refine`] hook that runs after the table checks.

use serde_json::{Map, Value};

use super::engine::{Ctx, Step};
use super::error::Mode;
use crate::predicates::{ADDRESS_LEN, BLOCK_REF_LEN, BYTES32_LEN};

/// Value rule for a single field.
#[derive(Clone, Copy, Debug)]
pub enum Rule {
    Bool,
    Str,
    /// Non-negative integer number.
    UInt,
    /// Non-negative integer number not greater than `max`.
    UIntMax { max: u64, expected: &'static str },
    /// Number in `[0, 1]`.
    Fraction,
    /// Non-negative integer as a base-10 string.
    DecimalUInt,
    /// Signed integer as a base-10 string.
    DecimalInt,
    /// Lowercase `0x` hex; fixed byte length when `Some`.
    Hex(Option<usize>),
    /// `null` or the inner rule.
    Nullable(&'static Rule),
    /// Array whose elements all satisfy `item`.
    Array {
        item: &'static Rule,
        max_len: Option<usize>,
    },
    /// Nested record, checked in `mode` when given.
    Record {
        schema: &'static Schema,
        mode: Option<Mode>,
    },
    /// Opaque JSON object (e.g. ABI-decoded fields).
    Object,
}

impl Rule {
    pub const ADDRESS: Rule = Rule::Hex(Some(ADDRESS_LEN));
    pub const BYTES32: Rule = Rule::Hex(Some(BYTES32_LEN));
    pub const BYTES: Rule = Rule::Hex(None);
    pub const BLOCK_REF: Rule = Rule::Hex(Some(BLOCK_REF_LEN));
    pub const UINT8: Rule = Rule::UIntMax {
        max: u8::MAX as u64,
        expected: "integer in 0..=255",
    };

    /// JSON kind the rule expects, used in type mismatch reports.
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Rule::Bool => "boolean",
            Rule::Str => "string",
            Rule::UInt | Rule::UIntMax { .. } | Rule::Fraction => "number",
            Rule::DecimalUInt | Rule::DecimalInt => "decimal string",
            Rule::Hex(_) => "hex string",
            Rule::Nullable(inner) => inner.kind_name(),
            Rule::Array { .. } => "array",
            Rule::Record { .. } | Rule::Object => "object",
        }
    }

    /// Format the rule enforces beyond the JSON kind.
    pub(crate) fn format_name(&self) -> &'static str {
        match self {
            Rule::UInt => "non-negative integer",
            Rule::UIntMax { expected, .. } => *expected,
            Rule::Fraction => "number in [0, 1]",
            Rule::DecimalUInt => "non-negative decimal integer string without leading zeros",
            Rule::DecimalInt => "decimal integer string without leading zeros",
            Rule::Hex(Some(ADDRESS_LEN)) => "20-byte lowercase hex address",
            Rule::Hex(Some(BYTES32_LEN)) => "32-byte lowercase hex",
            Rule::Hex(Some(BLOCK_REF_LEN)) => "8-byte lowercase hex",
            Rule::Hex(Some(_)) => "lowercase hex of the declared byte length",
            Rule::Hex(None) => "0x-prefixed lowercase hex with an even digit count",
            Rule::Array { .. } => "array within the length limit",
            Rule::Nullable(inner) => inner.format_name(),
            Rule::Bool | Rule::Str | Rule::Record { .. } | Rule::Object => {
                self.kind_name()
            }
        }
    }
}

/// How a field's presence is governed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Presence {
    Required,
    Optional,
    /// Required in the given mode, forbidden in any other.
    RequiredIn(Mode),
    /// Optional in the given mode, forbidden in any other.
    AllowedIn(Mode),
}

/// One declared field of a record.
#[derive(Clone, Copy, Debug)]
pub struct Field {
    pub name: &'static str,
    pub presence: Presence,
    pub rule: Rule,
}

impl Field {
    pub const fn required(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            presence: Presence::Required,
            rule,
        }
    }

    pub const fn optional(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            presence: Presence::Optional,
            rule,
        }
    }

    pub const fn modal(name: &'static str, presence: Presence, rule: Rule) -> Self {
        Self {
            name,
            presence,
            rule,
        }
    }
}

/// Record-level check that runs after all field rules.
pub type Refine = fn(&Map<String, Value>, &mut Ctx<'_>) -> Step;

/// Schema of one record type.
#[derive(Debug)]
pub struct Schema {
    /// Record name used in diagnostics.
    pub name: &'static str,
    /// Declared fields, in the order they are checked.
    pub fields: &'static [Field],
    pub refine: Option<Refine>,
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}
