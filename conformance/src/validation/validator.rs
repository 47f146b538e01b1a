//! Validator entry points.
//!
//! [`Conformance`] owns an immutable [`ConformanceConfig`] and exposes one
//! method per record type; the free `ensure_*` functions do the same with
//! the default configuration. Nothing here keeps state between calls, so
//! a `Conformance` can be shared freely across threads.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::abi::{AbiParam, EventAbi, FunctionAbi};
use super::engine::{Ctx, check_record};
use super::error::{Mode, ValidationError, Violations};
use super::records;
use super::schema::Schema;
use crate::config::{ConformanceConfig, ReportMode};

/// Record types the checker knows, including their mode flags.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RecordKind {
    Block,
    /// Block with embedded transaction records.
    ExpandedBlock,
    Status,
    Account,
    AccountCode,
    Storage,
    Clause,
    Transaction,
    TransactionReceipt,
    VmOutput,
    EventCriteria,
    EventLog { expanded: bool },
    TransferLog { expanded: bool },
    TxResponse,
    CertResponse,
}

impl RecordKind {
    pub const ALL: &'static [RecordKind] = &[
        RecordKind::Block,
        RecordKind::ExpandedBlock,
        RecordKind::Status,
        RecordKind::Account,
        RecordKind::AccountCode,
        RecordKind::Storage,
        RecordKind::Clause,
        RecordKind::Transaction,
        RecordKind::TransactionReceipt,
        RecordKind::VmOutput,
        RecordKind::EventCriteria,
        RecordKind::EventLog { expanded: false },
        RecordKind::EventLog { expanded: true },
        RecordKind::TransferLog { expanded: false },
        RecordKind::TransferLog { expanded: true },
        RecordKind::TxResponse,
        RecordKind::CertResponse,
    ];

    /// Kebab-case name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::Block => "block",
            RecordKind::ExpandedBlock => "expanded-block",
            RecordKind::Status => "status",
            RecordKind::Account => "account",
            RecordKind::AccountCode => "account-code",
            RecordKind::Storage => "storage",
            RecordKind::Clause => "clause",
            RecordKind::Transaction => "transaction",
            RecordKind::TransactionReceipt => "transaction-receipt",
            RecordKind::VmOutput => "vm-output",
            RecordKind::EventCriteria => "event-criteria",
            RecordKind::EventLog { expanded: false } => "event-log",
            RecordKind::EventLog { expanded: true } => "expanded-event-log",
            RecordKind::TransferLog { expanded: false } => "transfer-log",
            RecordKind::TransferLog { expanded: true } => "expanded-transfer-log",
            RecordKind::TxResponse => "tx-response",
            RecordKind::CertResponse => "cert-response",
        }
    }

    fn schema(&self) -> (&'static Schema, Option<Mode>) {
        match self {
            RecordKind::Block => (&records::BLOCK, None),
            RecordKind::ExpandedBlock => (&records::EXPANDED_BLOCK, None),
            RecordKind::Status => (&records::STATUS, None),
            RecordKind::Account => (&records::ACCOUNT, None),
            RecordKind::AccountCode => (&records::ACCOUNT_CODE, None),
            RecordKind::Storage => (&records::STORAGE, None),
            RecordKind::Clause => (&records::CLAUSE, None),
            RecordKind::Transaction => (&records::TRANSACTION, None),
            RecordKind::TransactionReceipt => (&records::RECEIPT, None),
            RecordKind::VmOutput => (&records::VM_OUTPUT, None),
            RecordKind::EventCriteria => (&records::EVENT_CRITERIA, None),
            RecordKind::EventLog { expanded } => (&records::EVENT_LOG, Some(log_mode(*expanded))),
            RecordKind::TransferLog { expanded } => {
                (&records::TRANSFER_LOG, Some(log_mode(*expanded)))
            }
            RecordKind::TxResponse => (&records::TX_RESPONSE, None),
            RecordKind::CertResponse => (&records::CERT_RESPONSE, None),
        }
    }
}

fn log_mode(expanded: bool) -> Mode {
    if expanded {
        Mode::Expanded
    } else {
        Mode::Compact
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown record kind name.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UnknownRecordKind(pub String);

impl fmt::Display for UnknownRecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown record kind: {}", self.0)
    }
}

impl std::error::Error for UnknownRecordKind {}

impl FromStr for RecordKind {
    type Err = UnknownRecordKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        if wanted == "receipt" {
            return Ok(RecordKind::TransactionReceipt);
        }
        RecordKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| UnknownRecordKind(s.to_string()))
    }
}

/// Pluggable record check.
///
/// Implementations must be deterministic and side-effect free, so that the
/// same value always yields the same verdict.
pub trait RecordValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError>;
}

impl<F> RecordValidator for F
where
    F: Fn(&Value) -> Result<(), ValidationError>,
{
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self(value)
    }
}

/// A [`Conformance`] checker bound to one record kind.
#[derive(Clone, Debug)]
pub struct KindValidator {
    conformance: Conformance,
    kind: RecordKind,
}

impl KindValidator {
    pub fn kind(&self) -> RecordKind {
        self.kind
    }
}

impl RecordValidator for KindValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self.conformance.check(self.kind, value)
    }
}

/// Runs `first` and then `second`, failing fast on the first error.
///
/// Useful to put caller-specific checks (e.g. "this must be the testnet
/// genesis block") behind the schema check.
#[derive(Clone, Debug)]
pub struct CombinedValidator<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> CombinedValidator<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A, B> RecordValidator for CombinedValidator<A, B>
where
    A: RecordValidator,
    B: RecordValidator,
{
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self.first.validate(value)?;
        self.second.validate(value)?;
        Ok(())
    }
}

/// Schema checker for client API records.
#[derive(Clone, Debug, Default)]
pub struct Conformance {
    cfg: ConformanceConfig,
}

impl Conformance {
    pub fn new(cfg: ConformanceConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &ConformanceConfig {
        &self.cfg
    }

    /// Returns a [`RecordValidator`] for `kind` sharing this configuration.
    pub fn validator(&self, kind: RecordKind) -> KindValidator {
        KindValidator {
            conformance: self.clone(),
            kind,
        }
    }

    /// Checks `value` as a `kind` record, reporting the first violation.
    pub fn check(&self, kind: RecordKind, value: &Value) -> Result<(), ValidationError> {
        first_violation(self.run(kind, value, None, ReportMode::FirstViolation))
    }

    /// Checks `value` as a `kind` record, reporting every violation.
    pub fn check_all(&self, kind: RecordKind, value: &Value) -> Result<(), Violations> {
        all_violations(self.run(kind, value, None, ReportMode::AllViolations))
    }

    /// Checks `value` with the configured [`ReportMode`].
    pub fn verdict(&self, kind: RecordKind, value: &Value) -> Result<(), Violations> {
        all_violations(self.run(kind, value, None, self.cfg.report))
    }

    pub fn block(&self, value: &Value) -> Result<(), ValidationError> {
        self.check(RecordKind::Block, value)
    }

    pub fn expanded_block(&self, value: &Value) -> Result<(), ValidationError> {
        self.check(RecordKind::ExpandedBlock, value)
    }

    pub fn status(&self, value: &Value) -> Result<(), ValidationError> {
        self.check(RecordKind::Status, value)
    }

    pub fn account(&self, value: &Value) -> Result<(), ValidationError> {
        self.check(RecordKind::Account, value)
    }

    pub fn account_code(&self, value: &Value) -> Result<(), ValidationError> {
        self.check(RecordKind::AccountCode, value)
    }

    pub fn storage(&self, value: &Value) -> Result<(), ValidationError> {
        self.check(RecordKind::Storage, value)
    }

    pub fn clause(&self, value: &Value) -> Result<(), ValidationError> {
        self.check(RecordKind::Clause, value)
    }

    pub fn transaction(&self, value: &Value) -> Result<(), ValidationError> {
        self.check(RecordKind::Transaction, value)
    }

    /// Receipts always carry `meta`.
    pub fn transaction_receipt(&self, value: &Value) -> Result<(), ValidationError> {
        self.check(RecordKind::TransactionReceipt, value)
    }

    pub fn vm_output(&self, value: &Value) -> Result<(), ValidationError> {
        self.check(RecordKind::VmOutput, value)
    }

    /// Checks a VM output whose `decoded` (when present and not reverted)
    /// must follow `abi.outputs`.
    pub fn vm_output_with_abi(
        &self,
        value: &Value,
        abi: &FunctionAbi,
    ) -> Result<(), ValidationError> {
        first_violation(self.run(
            RecordKind::VmOutput,
            value,
            Some(&abi.outputs),
            ReportMode::FirstViolation,
        ))
    }

    pub fn event_criteria(&self, value: &Value) -> Result<(), ValidationError> {
        self.check(RecordKind::EventCriteria, value)
    }

    pub fn event_log(&self, value: &Value, expanded: bool) -> Result<(), ValidationError> {
        self.check(RecordKind::EventLog { expanded }, value)
    }

    /// Checks an event log decoded with `abi`. In expanded mode `decoded`
    /// becomes required and must follow `abi.inputs`.
    pub fn event_log_with_abi(
        &self,
        value: &Value,
        expanded: bool,
        abi: &EventAbi,
    ) -> Result<(), ValidationError> {
        first_violation(self.run(
            RecordKind::EventLog { expanded },
            value,
            Some(&abi.inputs),
            ReportMode::FirstViolation,
        ))
    }

    pub fn transfer_log(&self, value: &Value, expanded: bool) -> Result<(), ValidationError> {
        self.check(RecordKind::TransferLog { expanded }, value)
    }

    pub fn tx_response(&self, value: &Value) -> Result<(), ValidationError> {
        self.check(RecordKind::TxResponse, value)
    }

    pub fn cert_response(&self, value: &Value) -> Result<(), ValidationError> {
        self.check(RecordKind::CertResponse, value)
    }

    fn run(
        &self,
        kind: RecordKind,
        value: &Value,
        abi: Option<&[AbiParam]>,
        report: ReportMode,
    ) -> Vec<ValidationError> {
        tracing::trace!(%kind, ?report, "checking record");

        let (schema, mode) = kind.schema();
        let mut ctx = Ctx::new(&self.cfg, report);
        if let Some(params) = abi {
            ctx = ctx.with_abi(params);
        }
        // Halt only signals that the first violation was recorded.
        let _ = check_record(value, schema, mode, &mut ctx);
        let found = ctx.into_violations();

        match found.first() {
            None => tracing::debug!(%kind, "record conforms"),
            Some(first) => tracing::debug!(
                %kind,
                violations = found.len(),
                first = %first,
                "record rejected"
            ),
        }
        found
    }
}

fn first_violation(found: Vec<ValidationError>) -> Result<(), ValidationError> {
    match found.into_iter().next() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn all_violations(found: Vec<ValidationError>) -> Result<(), Violations> {
    match Violations::new(found) {
        Some(v) => Err(v),
        None => Ok(()),
    }
}

pub fn ensure_block(value: &Value) -> Result<(), ValidationError> {
    Conformance::default().block(value)
}

pub fn ensure_expanded_block(value: &Value) -> Result<(), ValidationError> {
    Conformance::default().expanded_block(value)
}

pub fn ensure_status(value: &Value) -> Result<(), ValidationError> {
    Conformance::default().status(value)
}

pub fn ensure_account(value: &Value) -> Result<(), ValidationError> {
    Conformance::default().account(value)
}

pub fn ensure_account_code(value: &Value) -> Result<(), ValidationError> {
    Conformance::default().account_code(value)
}

pub fn ensure_storage(value: &Value) -> Result<(), ValidationError> {
    Conformance::default().storage(value)
}

pub fn ensure_clause(value: &Value) -> Result<(), ValidationError> {
    Conformance::default().clause(value)
}

pub fn ensure_transaction(value: &Value) -> Result<(), ValidationError> {
    Conformance::default().transaction(value)
}

pub fn ensure_transaction_receipt(value: &Value) -> Result<(), ValidationError> {
    Conformance::default().transaction_receipt(value)
}

pub fn ensure_vm_output(value: &Value) -> Result<(), ValidationError> {
    Conformance::default().vm_output(value)
}

pub fn ensure_vm_output_with_abi(value: &Value, abi: &FunctionAbi) -> Result<(), ValidationError> {
    Conformance::default().vm_output_with_abi(value, abi)
}

pub fn ensure_event_criteria(value: &Value) -> Result<(), ValidationError> {
    Conformance::default().event_criteria(value)
}

pub fn ensure_event_log(value: &Value, expanded: bool) -> Result<(), ValidationError> {
    Conformance::default().event_log(value, expanded)
}

pub fn ensure_event_log_with_abi(
    value: &Value,
    expanded: bool,
    abi: &EventAbi,
) -> Result<(), ValidationError> {
    Conformance::default().event_log_with_abi(value, expanded, abi)
}

pub fn ensure_transfer_log(value: &Value, expanded: bool) -> Result<(), ValidationError> {
    Conformance::default().transfer_log(value, expanded)
}

pub fn ensure_tx_response(value: &Value) -> Result<(), ValidationError> {
    Conformance::default().tx_response(value)
}

pub fn ensure_cert_response(value: &Value) -> Result<(), ValidationError> {
    Conformance::default().cert_response(value)
}
