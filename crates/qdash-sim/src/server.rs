//! Axum router serving the simulated backend.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use qdash_model::{Endpoint, TestProbe};

use crate::state::{FailureMode, SimState};

/// Create the router with the dashboard endpoints and the control routes.
pub fn create_router(state: Arc<SimState>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/jobs", get(jobs))
        .route("/backends", get(backends))
        .route("/measurement_results", get(measurement_results))
        .route("/entanglement_data", get(entanglement_data))
        .route("/quantum_state_data", get(quantum_state_data))
        .route("/recommendations", get(recommendations))
        .route("/test", get(test_probe));

    let control_routes = Router::new()
        .route("/mode", post(set_mode))
        .route("/advance", post(advance));

    Router::new()
        .nest("/api", api_routes)
        .nest("/sim", control_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

async fn metrics(State(state): State<Arc<SimState>>) -> Response {
    respond(&state, Endpoint::Metrics).await
}

async fn jobs(State(state): State<Arc<SimState>>) -> Response {
    respond(&state, Endpoint::Jobs).await
}

async fn backends(State(state): State<Arc<SimState>>) -> Response {
    respond(&state, Endpoint::Backends).await
}

async fn measurement_results(State(state): State<Arc<SimState>>) -> Response {
    respond(&state, Endpoint::MeasurementResults).await
}

async fn entanglement_data(State(state): State<Arc<SimState>>) -> Response {
    respond(&state, Endpoint::EntanglementData).await
}

async fn quantum_state_data(State(state): State<Arc<SimState>>) -> Response {
    respond(&state, Endpoint::QuantumStateData).await
}

async fn recommendations(State(state): State<Arc<SimState>>) -> Response {
    respond(&state, Endpoint::Recommendations).await
}

async fn test_probe(State(state): State<Arc<SimState>>) -> Response {
    respond(&state, Endpoint::Test).await
}

/// Serve one endpoint, honoring its configured failure mode.
async fn respond(state: &SimState, endpoint: Endpoint) -> Response {
    state.catch_up().await;

    match state.mode_for(endpoint).await {
        FailureMode::Healthy => {}
        FailureMode::Unavailable => {
            return (StatusCode::SERVICE_UNAVAILABLE, "backend unavailable").into_response();
        }
        FailureMode::NonJson => {
            return Html("<html><body><h1>Down for maintenance</h1></body></html>").into_response();
        }
        FailureMode::Malformed => return Json("unexpected payload").into_response(),
    }

    let mut world = state.world().await;
    match endpoint {
        Endpoint::Metrics => Json(world.metrics()).into_response(),
        Endpoint::Jobs => Json(&world.jobs).into_response(),
        Endpoint::Backends => Json(&world.backends).into_response(),
        Endpoint::MeasurementResults => match world.latest_measurements() {
            Some(results) => Json(results).into_response(),
            None => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "not_found", "message": "No completed jobs yet" })),
            )
                .into_response(),
        },
        Endpoint::EntanglementData => Json(world.entanglement()).into_response(),
        Endpoint::QuantumStateData => Json(world.quantum_state()).into_response(),
        Endpoint::Recommendations => Json(world.recommendations()).into_response(),
        Endpoint::Test => Json(TestProbe {
            status: "ok".to_string(),
            message: format!("qdash-sim at tick {}", world.tick()),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        })
        .into_response(),
    }
}

/// Body of `POST /sim/mode`.
#[derive(Debug, Deserialize)]
struct ModeRequest {
    mode: FailureMode,
    /// Endpoint name (e.g., "jobs"); omitted means all endpoints.
    endpoint: Option<String>,
}

async fn set_mode(State(state): State<Arc<SimState>>, Json(req): Json<ModeRequest>) -> Response {
    match req.endpoint.as_deref() {
        None => {
            state.reset_modes().await;
            state.set_mode(req.mode).await;
        }
        Some(name) => match Endpoint::from_name(name) {
            Some(endpoint) => state.set_endpoint_mode(endpoint, req.mode).await,
            None => {
                return (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "not_found", "message": format!("Unknown endpoint '{name}'") })),
                )
                    .into_response();
            }
        },
    }
    tracing::info!(mode = ?req.mode, endpoint = ?req.endpoint, "failure mode changed");
    StatusCode::NO_CONTENT.into_response()
}

async fn advance(State(state): State<Arc<SimState>>) -> Json<serde_json::Value> {
    state.advance().await;
    let world = state.world().await;
    Json(json!({ "tick": world.tick(), "jobs": world.jobs.len() }))
}
