//! HTTP route handlers.

use axum::{extract::State, Json};

use crate::types::{HealthResponse, HealthStatus};

use super::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Health check endpoint
///
/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: VERSION.to_string(),
        vocab_size: state.tokenizer.vocab_size(),
        max_len: state.tokenizer.max_len(),
    })
}
