//! Shared application state.

use std::sync::Arc;

use conformance::Conformance;

/// State handed to request handlers via Axum's `State` extractor.
///
/// The checker is stateless, so no locking is needed.
pub struct AppState {
    pub conformance: Conformance,
}

impl AppState {
    pub fn new(conformance: Conformance) -> Self {
        Self { conformance }
    }
}

/// Thread-safe alias for `AppState`.
pub type SharedState = Arc<AppState>;
