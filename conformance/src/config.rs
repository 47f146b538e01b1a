//! Configuration for the conformance checks.
//!
//! Two knobs decide how strict a check is and how much it reports:
//!
//! - how keys outside a record's declared schema are treated
//!   ([`UnknownFields`]),
//! - whether a check stops at the first violation or collects all of them
//!   ([`ReportMode`]).
//!
//! Both default to the behaviour existing callers expect: strict key sets
//! and first-violation reporting.

use std::fmt;
use std::str::FromStr;

/// Environment variable selecting [`UnknownFields`].
pub const ENV_UNKNOWN_FIELDS: &str = "CONFORMANCE_UNKNOWN_FIELDS";

/// Environment variable selecting [`ReportMode`].
pub const ENV_REPORT: &str = "CONFORMANCE_REPORT";

/// Treatment of keys a record's schema does not declare.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum UnknownFields {
    /// Undeclared keys are an `UnexpectedField` violation.
    #[default]
    Reject,
    /// Required keys must be present; anything else is ignored.
    Allow,
}

impl FromStr for UnknownFields {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" | "strict" => Ok(UnknownFields::Reject),
            "allow" | "tolerant" => Ok(UnknownFields::Allow),
            _ => Err(ConfigError::Invalid {
                key: ENV_UNKNOWN_FIELDS,
                value: s.to_string(),
            }),
        }
    }
}

/// How many violations a single check reports.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ReportMode {
    /// Stop at the first violation in field-declaration order.
    #[default]
    FirstViolation,
    /// Keep checking and report every violation found.
    AllViolations,
}

impl FromStr for ReportMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(ReportMode::FirstViolation),
            "all" => Ok(ReportMode::AllViolations),
            _ => Err(ConfigError::Invalid {
                key: ENV_REPORT,
                value: s.to_string(),
            }),
        }
    }
}

/// Error returned when a configuration value cannot be parsed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => {
                write!(f, "invalid value {value:?} for {key}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration of a [`crate::Conformance`] checker.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConformanceConfig {
    pub unknown_fields: UnknownFields,
    pub report: ReportMode,
}

impl ConformanceConfig {
    /// Builds a configuration from `CONFORMANCE_*` environment variables.
    ///
    /// Unset variables keep their defaults; unparseable ones are logged and
    /// ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ConformanceConfig::from_env`] over an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(raw) = lookup(ENV_UNKNOWN_FIELDS) {
            match raw.parse() {
                Ok(v) => cfg.unknown_fields = v,
                Err(e) => tracing::warn!("{e}; keeping {:?}", cfg.unknown_fields),
            }
        }

        if let Some(raw) = lookup(ENV_REPORT) {
            match raw.parse() {
                Ok(v) => cfg.report = v,
                Err(e) => tracing::warn!("{e}; keeping {:?}", cfg.report),
            }
        }

        cfg
    }

    /// Tolerant variant: extra keys are ignored.
    pub fn tolerant() -> Self {
        Self {
            unknown_fields: UnknownFields::Allow,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_strict_and_first_violation() {
        let cfg = ConformanceConfig::default();
        assert_eq!(cfg.unknown_fields, UnknownFields::Reject);
        assert_eq!(cfg.report, ReportMode::FirstViolation);
    }

    #[test]
    fn lookup_overrides_defaults() {
        let cfg = ConformanceConfig::from_lookup(|key| match key {
            ENV_UNKNOWN_FIELDS => Some("allow".to_string()),
            ENV_REPORT => Some("ALL".to_string()),
            _ => None,
        });
        assert_eq!(cfg.unknown_fields, UnknownFields::Allow);
        assert_eq!(cfg.report, ReportMode::AllViolations);
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let cfg = ConformanceConfig::from_lookup(|key| match key {
            ENV_UNKNOWN_FIELDS => Some("sometimes".to_string()),
            _ => None,
        });
        assert_eq!(cfg, ConformanceConfig::default());

        let err = "sometimes".parse::<UnknownFields>().unwrap_err();
        assert!(err.to_string().contains(ENV_UNKNOWN_FIELDS), "{err}");
    }
}
