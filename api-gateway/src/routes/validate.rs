use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use conformance::{RecordKind, ValidationError, Violations};

use crate::state::SharedState;

/// Query string of `POST /validate/{kind}`.
#[derive(Debug, Default, Deserialize)]
pub struct ValidateParams {
    /// Report every violation instead of the configured mode.
    #[serde(default)]
    pub all: bool,
}

/// One violation as reported to clients.
#[derive(Debug, Serialize)]
pub struct ViolationDto {
    pub path: String,
    pub category: &'static str,
    pub message: String,
}

impl From<&ValidationError> for ViolationDto {
    fn from(e: &ValidationError) -> Self {
        ViolationDto {
            path: e.path().to_string(),
            category: e.category().as_str(),
            message: e.to_string(),
        }
    }
}

/// Response body for `POST /validate/{kind}`.
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<ViolationDto>,
}

impl ValidateResponse {
    fn conforming() -> Self {
        Self {
            valid: true,
            violations: Vec::new(),
        }
    }

    fn rejected(violations: &Violations) -> Self {
        Self {
            valid: false,
            violations: violations.iter().map(ViolationDto::from).collect(),
        }
    }
}

/// `POST /validate/{kind}`
///
/// Checks the JSON body as a `kind` record. Returns `200` when it
/// conforms and `422` with the violations when it does not; unknown kinds
/// are `404`.
pub async fn validate_record(
    State(state): State<SharedState>,
    Path(kind): Path<String>,
    Query(params): Query<ValidateParams>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<ValidateResponse>), (StatusCode, String)> {
    let kind = kind.parse::<RecordKind>().map_err(|e| {
        tracing::warn!("{e}");
        (StatusCode::NOT_FOUND, format!("{e}"))
    })?;

    let verdict = if params.all {
        state.conformance.check_all(kind, &body)
    } else {
        state.conformance.verdict(kind, &body)
    };

    match verdict {
        Ok(()) => {
            tracing::info!(%kind, "record conforms");
            Ok((StatusCode::OK, Json(ValidateResponse::conforming())))
        }
        Err(violations) => {
            tracing::info!(
                %kind,
                violations = violations.len(),
                first = %violations.first(),
                "record rejected"
            );
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidateResponse::rejected(&violations)),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use conformance::{Conformance, ConformanceConfig};
    use serde_json::json;
    use std::sync::Arc;

    fn state() -> SharedState {
        Arc::new(AppState::new(Conformance::default()))
    }

    fn account() -> Value {
        json!({ "balance": "1", "energy": "0", "hasCode": false })
    }

    async fn post(
        state: SharedState,
        kind: &str,
        all: bool,
        body: Value,
    ) -> Result<(StatusCode, Json<ValidateResponse>), (StatusCode, String)> {
        validate_record(
            State(state),
            Path(kind.to_string()),
            Query(ValidateParams { all }),
            Json(body),
        )
        .await
    }

    #[tokio::test]
    async fn conforming_record_is_200() {
        let (status, Json(body)) = post(state(), "account", false, account()).await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert!(body.valid);
        assert!(body.violations.is_empty());
    }

    #[tokio::test]
    async fn violations_are_422_with_paths() {
        let mut record = account();
        record["balance"] = json!(1);
        record["hasCode"] = json!("no");

        let (status, Json(body)) = post(state(), "account", false, record.clone())
            .await
            .unwrap();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(!body.valid);
        assert_eq!(body.violations.len(), 1);
        assert_eq!(body.violations[0].path, "balance");
        assert_eq!(body.violations[0].category, "type_mismatch");

        let (_, Json(body)) = post(state(), "account", true, record).await.unwrap();
        let paths: Vec<&str> = body.violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["balance", "hasCode"]);
    }

    #[tokio::test]
    async fn configured_report_mode_applies_without_query() {
        let cfg = ConformanceConfig {
            report: conformance::ReportMode::AllViolations,
            ..ConformanceConfig::default()
        };
        let state = Arc::new(AppState::new(Conformance::new(cfg)));
        let (_, Json(body)) = post(state, "account", false, json!({})).await.unwrap();
        // missing keys are reported together
        assert_eq!(body.violations.len(), 1);
        assert_eq!(body.violations[0].category, "missing_field");
    }

    #[tokio::test]
    async fn unknown_kind_is_404() {
        let (status, msg) = post(state(), "blocks", false, json!({})).await.unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(msg.contains("blocks"), "{msg}");
    }

    #[tokio::test]
    async fn mode_flag_is_part_of_the_kind() {
        let log = json!({
            "sender": "0x7567d83b7b8d80addcb281a71d54fc7b3364ffed",
            "recipient": "0x0000000000000000000000000000456e65726779",
            "amount": "1"
        });
        let (status, _) = post(state(), "transfer-log", false, log.clone()).await.unwrap();
        assert_eq!(status, StatusCode::OK);

        let (status, Json(body)) = post(state(), "expanded-transfer-log", false, log)
            .await
            .unwrap();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.violations[0].category, "mode_mismatch");
    }
}
