//! Integration tests for the simulated backend API.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};

use qdash_model::{BackendInfo, Endpoint, JobRecord, MetricsSnapshot, QuantumStateData};
use qdash_sim::{FailureMode, SimState, create_router};

fn test_server() -> (TestServer, Arc<SimState>) {
    let state = Arc::new(SimState::manual(42));
    let server = TestServer::new(create_router(state.clone())).expect("test server");
    (server, state)
}

#[tokio::test]
async fn test_health() {
    let (server, _) = test_server();
    let response = server.get("/api/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_jobs_and_backends_decode() {
    let (server, _) = test_server();

    let jobs: Vec<JobRecord> = server.get("/api/jobs").await.json();
    assert_eq!(jobs.len(), 12);

    let backends: Vec<BackendInfo> = server.get("/api/backends").await.json();
    assert!(!backends.is_empty());
    assert!(jobs.iter().all(|j| backends.iter().any(|b| b.name == j.backend)));
}

#[tokio::test]
async fn test_metrics_match_jobs() {
    let (server, _) = test_server();
    let jobs: Vec<JobRecord> = server.get("/api/jobs").await.json();
    let metrics: MetricsSnapshot = server.get("/api/metrics").await.json();
    assert_eq!(metrics.total_jobs() as usize, jobs.len());
}

#[tokio::test]
async fn test_quantum_state_has_circuit() {
    let (server, _) = test_server();
    let data: QuantumStateData = server.get("/api/quantum_state_data").await.json();
    assert!(!data.qubits.is_empty());
    assert!(data.circuit.is_some());
}

#[tokio::test]
async fn test_probe_reports_tick() {
    let (server, state) = test_server();
    state.advance().await;
    let body: Value = server.get("/api/test").await.json();
    assert_eq!(body["status"], "ok");
    assert!(body["message"].as_str().unwrap().contains("tick 1"));
}

#[tokio::test]
async fn test_unavailable_mode_returns_503() {
    let (server, state) = test_server();
    state.set_mode(FailureMode::Unavailable).await;
    let response = server.get("/api/jobs").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_non_json_mode_returns_html() {
    let (server, state) = test_server();
    state
        .set_endpoint_mode(Endpoint::Metrics, FailureMode::NonJson)
        .await;
    let response = server.get("/api/metrics").await;
    response.assert_status_ok();
    let content_type = response.header("content-type");
    assert!(content_type.to_str().unwrap().starts_with("text/html"));

    // Other endpoints are untouched.
    server.get("/api/jobs").await.assert_status_ok();
}

#[tokio::test]
async fn test_malformed_mode_is_json_of_wrong_shape() {
    let (server, state) = test_server();
    state.set_mode(FailureMode::Malformed).await;
    let body: Value = server.get("/api/backends").await.json();
    assert!(body.is_string());
}

#[tokio::test]
async fn test_control_route_sets_endpoint_mode() {
    let (server, _) = test_server();
    server
        .post("/sim/mode")
        .json(&json!({ "mode": "unavailable", "endpoint": "recommendations" }))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get("/api/recommendations")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    server.get("/api/jobs").await.assert_status_ok();
}

#[tokio::test]
async fn test_control_route_rejects_unknown_endpoint() {
    let (server, _) = test_server();
    server
        .post("/sim/mode")
        .json(&json!({ "mode": "healthy", "endpoint": "nope" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_advance_route() {
    let (server, _) = test_server();
    let body: Value = server.post("/sim/advance").await.json();
    assert_eq!(body["tick"], 1);
}
