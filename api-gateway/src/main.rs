// api-gateway/src/main.rs

//! Conformance gateway binary.
//!
//! Exposes the `conformance` checkers over HTTP so that remote test
//! harnesses can submit client API responses and get a verdict back:
//!
//! - `GET /health`
//! - `POST /validate/{kind}` (e.g. `/validate/expanded-event-log?all=true`)

mod config;
mod routes;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;

use conformance::Conformance;
use config::ApiConfig;
use routes::{health, validate};
use state::{AppState, SharedState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "conformance_gateway=info,conformance=info".to_string()),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let api_cfg = ApiConfig::from_env()?;
    tracing::info!(
        unknown_fields = ?api_cfg.conformance.unknown_fields,
        report = ?api_cfg.conformance.report,
        "checker configured"
    );

    let app_state: SharedState = Arc::new(AppState::new(Conformance::new(
        api_cfg.conformance.clone(),
    )));

    let app = router(app_state);

    tracing::info!("conformance gateway listening on http://{}", api_cfg.listen_addr);

    let listener = tokio::net::TcpListener::bind(api_cfg.listen_addr)
        .await
        .map_err(|e| format!("failed to bind {}: {e}", api_cfg.listen_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("API server error: {e}"))?;

    Ok(())
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/validate/{kind}", post(validate::validate_record))
        .with_state(state)
}

/// Waits for Ctrl-C and returns, used for graceful shutdown.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("shutdown signal received");
}
