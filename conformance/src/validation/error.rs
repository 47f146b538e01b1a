use std::fmt;

/// One step in a [`FieldPath`].
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Segment {
    /// Object member.
    Key(String),
    /// Array element.
    Index(usize),
}

/// Location of a value inside the record under validation.
///
/// Renders as `outputs[0].events[1].address`; the record itself renders
/// as `$`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    /// Path of the record root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns `true` for the record root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Returns a new path with `key` appended.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.0.push(Segment::Key(key.into()));
        next
    }

    /// Returns a new path with `index` appended.
    pub fn index(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.0.push(Segment::Index(index));
        next
    }

    pub(crate) fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("$");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(k) if i == 0 => write!(f, "{k}")?,
                Segment::Key(k) => write!(f, ".{k}")?,
                Segment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

/// Runtime kind of a JSON value, used in type mismatch reports.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    pub fn of(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Bool,
            Value::Number(_) => JsonKind::Number,
            Value::String(_) => JsonKind::String,
            Value::Array(_) => JsonKind::Array,
            Value::Object(_) => JsonKind::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JsonKind::Null => "null",
            JsonKind::Bool => "boolean",
            JsonKind::Number => "number",
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record mode a conditional field is coupled to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Mode {
    /// Log retrieved with resolved block/tx metadata.
    Expanded,
    /// Log retrieved without metadata.
    Compact,
    /// Contract call that reverted.
    Reverted,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Expanded => "expanded",
            Mode::Compact => "compact",
            Mode::Reverted => "reverted",
        };
        f.write_str(s)
    }
}

/// Stable, machine-readable category of a [`ValidationError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorCategory {
    Shape,
    MissingField,
    UnexpectedField,
    TypeMismatch,
    Format,
    ModeMismatch,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Shape => "shape",
            ErrorCategory::MissingField => "missing_field",
            ErrorCategory::UnexpectedField => "unexpected_field",
            ErrorCategory::TypeMismatch => "type_mismatch",
            ErrorCategory::Format => "format",
            ErrorCategory::ModeMismatch => "mode_mismatch",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a record does not conform to its schema.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationError {
    /// A record was expected but the value is not a JSON object.
    Shape {
        path: FieldPath,
        record: &'static str,
        found: JsonKind,
    },
    /// Required keys are absent.
    MissingField {
        path: FieldPath,
        record: &'static str,
        fields: Vec<String>,
    },
    /// Keys outside the record's declared schema are present.
    UnexpectedField {
        path: FieldPath,
        record: &'static str,
        fields: Vec<String>,
    },
    /// Field present but of the wrong JSON kind.
    TypeMismatch {
        path: FieldPath,
        expected: &'static str,
        found: JsonKind,
    },
    /// Field of the right kind that fails a format rule.
    Format {
        path: FieldPath,
        expected: &'static str,
    },
    /// Conditional field present or absent against the declared mode.
    ModeMismatch {
        path: FieldPath,
        field: String,
        mode: Mode,
        present: bool,
    },
}

impl ValidationError {
    /// Path of the offending field (or record, for record-level errors).
    pub fn path(&self) -> &FieldPath {
        match self {
            ValidationError::Shape { path, .. }
            | ValidationError::MissingField { path, .. }
            | ValidationError::UnexpectedField { path, .. }
            | ValidationError::TypeMismatch { path, .. }
            | ValidationError::Format { path, .. }
            | ValidationError::ModeMismatch { path, .. } => path,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ValidationError::Shape { .. } => ErrorCategory::Shape,
            ValidationError::MissingField { .. } => ErrorCategory::MissingField,
            ValidationError::UnexpectedField { .. } => ErrorCategory::UnexpectedField,
            ValidationError::TypeMismatch { .. } => ErrorCategory::TypeMismatch,
            ValidationError::Format { .. } => ErrorCategory::Format,
            ValidationError::ModeMismatch { .. } => ErrorCategory::ModeMismatch,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Shape {
                path,
                record,
                found,
            } => write!(f, "{path}: expected {record} object, found {found}"),
            ValidationError::MissingField {
                path,
                record,
                fields,
            } => write!(
                f,
                "{path}: {record} is missing required field(s): {}",
                fields.join(", ")
            ),
            ValidationError::UnexpectedField {
                path,
                record,
                fields,
            } => write!(
                f,
                "{path}: {record} has undeclared field(s): {}",
                fields.join(", ")
            ),
            ValidationError::TypeMismatch {
                path,
                expected,
                found,
            } => write!(f, "{path}: expected {expected}, found {found}"),
            ValidationError::Format { path, expected } => {
                write!(f, "{path}: expected {expected}")
            }
            ValidationError::ModeMismatch {
                path,
                field,
                mode,
                present: true,
            } => write!(f, "{path}: `{field}` must be absent in {mode} mode"),
            ValidationError::ModeMismatch {
                path,
                field,
                mode,
                present: false,
            } => write!(f, "{path}: `{field}` is required in {mode} mode"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// All violations found in one record, in discovery order.
///
/// Produced by the aggregate reporting mode; never empty.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Violations(Vec<ValidationError>);

impl Violations {
    /// Wraps a list of violations, returning `None` if it is empty.
    pub fn new(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    /// The violation that first-violation mode would have reported.
    pub fn first(&self) -> &ValidationError {
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<ValidationError> for Violations {
    fn from(e: ValidationError) -> Self {
        Violations(vec![e])
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

/// Error returned when building a typed record from JSON.
#[derive(Debug)]
pub enum ConformanceError {
    /// The value does not conform to the record's schema.
    Validation(ValidationError),
    /// The value conforms but could not be mapped onto the typed model.
    Decode(serde_json::Error),
}

impl fmt::Display for ConformanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConformanceError::Validation(e) => write!(f, "validation error: {e}"),
            ConformanceError::Decode(e) => write!(f, "decode error: {e}"),
        }
    }
}

impl std::error::Error for ConformanceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConformanceError::Validation(e) => Some(e),
            ConformanceError::Decode(e) => Some(e),
        }
    }
}

impl From<ValidationError> for ConformanceError {
    fn from(e: ValidationError) -> Self {
        ConformanceError::Validation(e)
    }
}

impl From<serde_json::Error> for ConformanceError {
    fn from(e: serde_json::Error) -> Self {
        ConformanceError::Decode(e)
    }
}
