//! Structural validators for client API records.
//!
//! Every record type is described by a static schema table; a single
//! generic routine walks a JSON value against its table and reports the
//! first (or every) violation with the path of the offending field.

pub mod abi;
mod engine;
pub mod error;
mod records;
mod schema;
pub mod validator;

pub use abi::{AbiParam, EventAbi, FunctionAbi};
pub use error::{
    ConformanceError, ErrorCategory, FieldPath, JsonKind, Mode, Segment, ValidationError,
    Violations,
};
pub use records::MAX_TOPICS;
pub use validator::*;
