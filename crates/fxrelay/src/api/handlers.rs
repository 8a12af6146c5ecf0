//! HTTP request handlers.

use axum::{Json, extract::State};
use serde::Serialize;

use super::error::ApiError;
use super::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub connections: usize,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        connections: state.hub.connection_count(),
    })
}

/// Fallback for unknown paths.
pub async fn not_found() -> ApiError {
    ApiError::not_found("No such endpoint")
}
