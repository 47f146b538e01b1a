//! Generic "check a record against its table" routine.
//!
//! Violations are pushed into a [`Ctx`]. In first-violation mode the
//! first push returns [`Halt`], which unwinds the whole check through `?`;
//! in aggregate mode checking continues with the next field.

use serde_json::{Map, Value};

use super::abi::AbiParam;
use super::error::{FieldPath, JsonKind, Mode, Segment, ValidationError};
use super::schema::{Presence, Rule, Schema};
use crate::config::{ConformanceConfig, ReportMode, UnknownFields};
use crate::predicates;

/// Marker returned once the check must stop.
#[derive(Debug)]
pub struct Halt;

pub type Step = Result<(), Halt>;

/// Mutable state of one validation call.
pub struct Ctx<'a> {
    cfg: &'a ConformanceConfig,
    report: ReportMode,
    path: FieldPath,
    found: Vec<ValidationError>,
    /// Mode of the record currently being checked.
    mode: Option<Mode>,
    /// ABI the top-level record's `decoded` member must follow.
    abi: Option<&'a [AbiParam]>,
}

impl<'a> Ctx<'a> {
    pub fn new(cfg: &'a ConformanceConfig, report: ReportMode) -> Self {
        Self {
            cfg,
            report,
            path: FieldPath::root(),
            found: Vec::new(),
            mode: None,
            abi: None,
        }
    }

    pub fn with_abi(mut self, abi: &'a [AbiParam]) -> Self {
        self.abi = Some(abi);
        self
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn abi(&self) -> Option<&'a [AbiParam]> {
        self.abi
    }

    pub fn rejects_unknown_fields(&self) -> bool {
        self.cfg.unknown_fields == UnknownFields::Reject
    }

    pub fn into_violations(self) -> Vec<ValidationError> {
        self.found
    }

    /// Records a violation; halts in first-violation mode.
    pub fn report(&mut self, err: ValidationError) -> Step {
        self.found.push(err);
        match self.report {
            ReportMode::FirstViolation => Err(Halt),
            ReportMode::AllViolations => Ok(()),
        }
    }

    /// Runs `f` with `key` appended to the current path.
    pub fn at_key<F>(&mut self, key: &str, f: F) -> Step
    where
        F: FnOnce(&mut Self) -> Step,
    {
        self.path.push(Segment::Key(key.to_string()));
        let res = f(self);
        self.path.pop();
        res
    }

    /// Runs `f` with `index` appended to the current path.
    pub fn at_index<F>(&mut self, index: usize, f: F) -> Step
    where
        F: FnOnce(&mut Self) -> Step,
    {
        self.path.push(Segment::Index(index));
        let res = f(self);
        self.path.pop();
        res
    }

    pub fn type_mismatch(&mut self, expected: &'static str, value: &Value) -> Step {
        let err = ValidationError::TypeMismatch {
            path: self.path.clone(),
            expected,
            found: JsonKind::of(value),
        };
        self.report(err)
    }

    pub fn format(&mut self, expected: &'static str) -> Step {
        let err = ValidationError::Format {
            path: self.path.clone(),
            expected,
        };
        self.report(err)
    }

    pub fn mode_mismatch(&mut self, field: &str, mode: Mode, present: bool) -> Step {
        let err = ValidationError::ModeMismatch {
            path: self.path.clone(),
            field: field.to_string(),
            mode,
            present,
        };
        self.report(err)
    }

    pub fn missing(&mut self, record: &'static str, fields: Vec<String>) -> Step {
        let err = ValidationError::MissingField {
            path: self.path.clone(),
            record,
            fields,
        };
        self.report(err)
    }

    pub fn unexpected(&mut self, record: &'static str, fields: Vec<String>) -> Step {
        let err = ValidationError::UnexpectedField {
            path: self.path.clone(),
            record,
            fields,
        };
        self.report(err)
    }
}

/// Checks `value` against `schema` at the context's current path.
///
/// Order: object shape, mode-coupled presence, missing required keys,
/// undeclared keys, field rules in declaration order, then the schema's
/// refine hook.
pub fn check_record(
    value: &Value,
    schema: &'static Schema,
    mode: Option<Mode>,
    ctx: &mut Ctx<'_>,
) -> Step {
    let Value::Object(obj) = value else {
        let err = ValidationError::Shape {
            path: ctx.path.clone(),
            record: schema.name,
            found: JsonKind::of(value),
        };
        return ctx.report(err);
    };

    let outer_mode = std::mem::replace(&mut ctx.mode, mode);
    let res = check_object(obj, schema, ctx);
    ctx.mode = outer_mode;
    res
}

fn check_object(obj: &Map<String, Value>, schema: &'static Schema, ctx: &mut Ctx<'_>) -> Step {
    let mut skipped: Vec<&'static str> = Vec::new();

    for field in schema.fields {
        let present = obj.contains_key(field.name);
        match field.presence {
            Presence::RequiredIn(on) | Presence::AllowedIn(on) => {
                let Some(active) = ctx.mode else {
                    continue;
                };
                let required = matches!(field.presence, Presence::RequiredIn(_));
                if active == on {
                    if required && !present {
                        ctx.mode_mismatch(field.name, on, false)?;
                    }
                } else if present {
                    ctx.mode_mismatch(field.name, active, true)?;
                    skipped.push(field.name);
                }
            }
            Presence::Required | Presence::Optional => {}
        }
    }

    let missing: Vec<String> = schema
        .fields
        .iter()
        .filter(|f| f.presence == Presence::Required && !obj.contains_key(f.name))
        .map(|f| f.name.to_string())
        .collect();
    if !missing.is_empty() {
        ctx.missing(schema.name, missing)?;
    }

    if ctx.rejects_unknown_fields() {
        let undeclared: Vec<String> = obj
            .keys()
            .filter(|k| !schema.declares(k))
            .cloned()
            .collect();
        if !undeclared.is_empty() {
            ctx.unexpected(schema.name, undeclared)?;
        }
    }

    for field in schema.fields {
        if skipped.contains(&field.name) {
            continue;
        }
        if let Some(v) = obj.get(field.name) {
            ctx.at_key(field.name, |ctx| check_value(v, &field.rule, ctx))?;
        }
    }

    match schema.refine {
        Some(refine) => refine(obj, ctx),
        None => Ok(()),
    }
}

/// Checks a single value against `rule` at the context's current path.
pub fn check_value(value: &Value, rule: &Rule, ctx: &mut Ctx<'_>) -> Step {
    match rule {
        Rule::Bool => {
            if value.is_boolean() {
                Ok(())
            } else {
                ctx.type_mismatch(rule.kind_name(), value)
            }
        }
        Rule::Str => {
            if value.is_string() {
                Ok(())
            } else {
                ctx.type_mismatch(rule.kind_name(), value)
            }
        }
        Rule::UInt => {
            if !value.is_number() {
                return ctx.type_mismatch(rule.kind_name(), value);
            }
            if predicates::is_uint(value) {
                Ok(())
            } else {
                ctx.format(rule.format_name())
            }
        }
        Rule::UIntMax { max, expected } => {
            if !value.is_number() {
                return ctx.type_mismatch(rule.kind_name(), value);
            }
            match value.as_u64() {
                Some(n) if n <= *max => Ok(()),
                _ => ctx.format(*expected),
            }
        }
        Rule::Fraction => match value.as_f64() {
            None => ctx.type_mismatch(rule.kind_name(), value),
            Some(f) if (0.0..=1.0).contains(&f) => Ok(()),
            Some(_) => ctx.format(rule.format_name()),
        },
        Rule::DecimalUInt | Rule::DecimalInt => {
            let Some(s) = value.as_str() else {
                return ctx.type_mismatch(rule.kind_name(), value);
            };
            let ok = match rule {
                Rule::DecimalUInt => predicates::is_decimal_uint_str(s),
                _ => predicates::is_decimal_int_str(s),
            };
            if ok { Ok(()) } else { ctx.format(rule.format_name()) }
        }
        Rule::Hex(len) => {
            let Some(s) = value.as_str() else {
                return ctx.type_mismatch(rule.kind_name(), value);
            };
            if predicates::is_hex_bytes_str(s, *len) {
                Ok(())
            } else {
                ctx.format(rule.format_name())
            }
        }
        Rule::Nullable(inner) => {
            if value.is_null() {
                Ok(())
            } else {
                check_value(value, inner, ctx)
            }
        }
        Rule::Array { item, max_len } => {
            let Some(items) = value.as_array() else {
                return ctx.type_mismatch(rule.kind_name(), value);
            };
            if max_len.is_some_and(|max| items.len() > max) {
                ctx.format(rule.format_name())?;
            }
            for (i, v) in items.iter().enumerate() {
                ctx.at_index(i, |ctx| check_value(v, item, ctx))?;
            }
            Ok(())
        }
        Rule::Record { schema, mode } => check_record(value, *schema, *mode, ctx),
        Rule::Object => {
            if value.is_object() {
                Ok(())
            } else {
                ctx.type_mismatch(rule.kind_name(), value)
            }
        }
    }
}
