//! Health and connectivity endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use qdash_model::TestProbe;

use crate::error::ApiResult;
use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status (always "ok" if responding).
    pub status: String,
    /// Dashboard version.
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// GET /api/health - Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// GET /api/probe - Call the backend's test endpoint directly.
///
/// Unlike a refresh cycle this does not fall back; an unreachable backend
/// is reported as 502.
pub async fn probe(State(state): State<Arc<AppState>>) -> ApiResult<Json<TestProbe>> {
    let probe = state.controller.probe().await?;
    Ok(Json(probe))
}
