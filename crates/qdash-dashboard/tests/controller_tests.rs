//! Refresh-cycle tests against a live qdash-sim backend.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::net::TcpListener;
use tokio::sync::watch;

use qdash_dashboard::{
    AppState, ConnectionStatus, DashboardConfig, DashboardEvent, DataSource, NotificationLevel,
    ViewState, Widget, render, run_poller,
};
use qdash_model::Endpoint;
use qdash_sim::{FailureMode, SimState};

// ============================================================================
// Test helpers
// ============================================================================

/// Nothing listens here; connections are refused.
const UNREACHABLE: &str = "http://127.0.0.1:9";

fn config_for(base_url: &str) -> DashboardConfig {
    let mut config = DashboardConfig::default();
    config.api.base_url = base_url.to_string();
    config.api.timeout_ms = 1000;
    config.poll.interval_secs = 1;
    config.poll.demo_seed = Some(11);
    config
}

fn state_for(base_url: &str) -> Arc<AppState> {
    Arc::new(AppState::with_config(config_for(base_url)).expect("app state"))
}

/// Serve a manual-tick simulator on an ephemeral port.
async fn spawn_sim() -> (String, Arc<SimState>) {
    let sim = Arc::new(SimState::manual(7));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app = qdash_sim::create_router(sim.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("sim server");
    });
    let base = format!("http://{addr}");
    ensure_completed_job(&base, &sim).await;
    (base, sim)
}

/// Advance the simulator until it has measurement results to serve.
async fn ensure_completed_job(base: &str, sim: &SimState) {
    let url = format!("{base}{}", Endpoint::MeasurementResults.path());
    for _ in 0..100 {
        let response = reqwest::get(&url).await.expect("sim reachable");
        if response.status().is_success() {
            return;
        }
        sim.advance().await;
    }
    panic!("simulator never completed a job");
}

/// Accept connections and never answer them.
async fn spawn_silent_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}")
}

fn sources(view: &ViewState) -> Vec<DataSource> {
    Widget::ALL.iter().map(|w| view.source_of(*w)).collect()
}

// ============================================================================
// Single cycles
// ============================================================================

#[tokio::test]
async fn test_healthy_backend_is_live() {
    let (base, _sim) = spawn_sim().await;
    let state = state_for(&base);

    let view = state.refresh().await;
    assert_eq!(view.cycle, 1);
    assert_eq!(view.connection, ConnectionStatus::Live);
    assert!(sources(&view).iter().all(|s| *s == DataSource::Live));
    assert!(view.probe.is_live());
    assert!(view.last_updated.is_some());

    let notes = state.notifications.recent(10);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Info);
}

#[tokio::test]
async fn test_unreachable_backend_falls_back_everywhere() {
    let state = state_for(UNREACHABLE);

    let view = state.refresh().await;
    assert_eq!(view.connection, ConnectionStatus::Offline);
    assert!(sources(&view).iter().all(|s| *s == DataSource::Demo));
    assert!(!view.jobs.data.is_empty());
    assert!(!view.backends.data.is_empty());
    assert_eq!(view.metrics.data.total_jobs() as usize, view.jobs.data.len());
    assert!(view.quantum_state.data.circuit.is_some());

    let notes = state.notifications.recent(10);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
    assert!(notes[0].message.contains(UNREACHABLE));
}

#[tokio::test]
async fn test_silent_backend_times_out_to_demo() {
    let base = spawn_silent_backend().await;
    let mut config = config_for(&base);
    config.api.timeout_ms = 300;
    let state = Arc::new(AppState::with_config(config).expect("app state"));

    let started = Instant::now();
    let view = state.refresh().await;
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(250), "fetches waited for the timeout");
    assert!(elapsed < Duration::from_secs(3), "cycle took {elapsed:?}");
    assert_eq!(view.connection, ConnectionStatus::Offline);
    assert!(sources(&view).iter().all(|s| *s == DataSource::Demo));
}

#[tokio::test]
async fn test_repeated_failures_notify_once() {
    let state = state_for(UNREACHABLE);
    for _ in 0..3 {
        state.refresh().await;
    }
    assert_eq!(state.snapshot().await.cycle, 3);
    assert_eq!(state.notifications.len(), 1);
}

#[tokio::test]
async fn test_partial_failure_is_degraded() {
    let (base, sim) = spawn_sim().await;
    sim.set_endpoint_mode(Endpoint::Jobs, FailureMode::Unavailable)
        .await;
    sim.set_endpoint_mode(Endpoint::Metrics, FailureMode::NonJson)
        .await;
    sim.set_endpoint_mode(Endpoint::Recommendations, FailureMode::Malformed)
        .await;
    let state = state_for(&base);

    let view = state.refresh().await;
    assert_eq!(view.connection, ConnectionStatus::Degraded);
    assert_eq!(view.source_of(Widget::Jobs), DataSource::Demo);
    assert_eq!(view.source_of(Widget::Metrics), DataSource::Demo);
    assert_eq!(view.source_of(Widget::Recommendations), DataSource::Demo);
    assert_eq!(view.source_of(Widget::Backends), DataSource::Live);

    // Demo metrics agree with the demo job table of the same cycle.
    assert_eq!(view.metrics.data.total_jobs() as usize, view.jobs.data.len());

    let notes = state.notifications.recent(10);
    assert_eq!(notes[0].level, NotificationLevel::Warning);
}

#[tokio::test]
async fn test_cycles_replace_view_wholesale() {
    let (base, sim) = spawn_sim().await;
    let state = state_for(&base);

    let first = state.refresh().await;
    assert_eq!(first.connection, ConnectionStatus::Live);

    sim.set_mode(FailureMode::Unavailable).await;
    let second = state.refresh().await;
    assert_eq!(second.cycle, 2);
    assert_eq!(second.connection, ConnectionStatus::Offline);
    assert_eq!(state.snapshot().await, second);

    sim.reset_modes().await;
    let third = state.refresh().await;
    assert_eq!(third.connection, ConnectionStatus::Live);

    let levels: Vec<_> = state
        .notifications
        .recent(10)
        .into_iter()
        .map(|n| n.level)
        .collect();
    assert_eq!(
        levels,
        vec![
            NotificationLevel::Info,
            NotificationLevel::Error,
            NotificationLevel::Info
        ]
    );
}

#[tokio::test]
async fn test_refresh_publishes_events() {
    let state = state_for(UNREACHABLE);
    let mut events = state.subscribe();

    state.refresh().await;

    let mut saw_change = false;
    let mut saw_update = false;
    let mut saw_notification = false;
    while let Ok(event) = events.try_recv() {
        match event {
            DashboardEvent::ConnectionChanged { from, to } => {
                assert_eq!(from, ConnectionStatus::Connecting);
                assert_eq!(to, ConnectionStatus::Offline);
                saw_change = true;
            }
            DashboardEvent::ViewUpdated {
                cycle,
                live_widgets,
                ..
            } => {
                assert_eq!(cycle, 1);
                assert_eq!(live_widgets, 0);
                saw_update = true;
            }
            DashboardEvent::Notification(_) => saw_notification = true,
        }
    }
    assert!(saw_change && saw_update && saw_notification);
}

// ============================================================================
// Probe
// ============================================================================

#[tokio::test]
async fn test_probe_reports_sim_tick() {
    let (base, _sim) = spawn_sim().await;
    let state = state_for(&base);
    let probe = state.controller.probe().await.expect("probe");
    assert!(probe.is_ok());
    assert!(probe.message.contains("tick"));
}

#[tokio::test]
async fn test_probe_fails_when_unreachable() {
    let state = state_for(UNREACHABLE);
    assert!(state.controller.probe().await.is_err());
}

// ============================================================================
// Poller
// ============================================================================

#[tokio::test]
async fn test_poller_runs_until_shutdown() {
    let state = state_for(UNREACHABLE);
    let (tx, rx) = watch::channel(false);
    let poller = tokio::spawn(run_poller(state.clone(), rx));

    let mut cycles = 0;
    for _ in 0..100 {
        cycles = state.snapshot().await.cycle;
        if cycles >= 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(cycles >= 1, "first cycle runs immediately");

    tx.send(true).expect("poller listening");
    tokio::time::timeout(Duration::from_secs(5), poller)
        .await
        .expect("poller stops")
        .expect("poller task");
}

// ============================================================================
// Rendering of real cycles
// ============================================================================

#[tokio::test]
async fn test_live_page_has_no_demo_badges() {
    let (base, _sim) = spawn_sim().await;
    let state = state_for(&base);
    let view = state.refresh().await;

    let options = render::RenderOptions::from_config(&state.config);
    let html = render::html::page(&view, &[], &options);
    assert!(!html.contains("demo data</span>"));
    assert!(html.contains(r#"id="connection">live"#));
}

#[tokio::test]
async fn test_offline_page_badges_every_widget() {
    let state = state_for(UNREACHABLE);
    let view = state.refresh().await;

    let options = render::RenderOptions::from_config(&state.config);
    let html = render::html::page(&view, &state.notifications.recent(5), &options);
    assert_eq!(html.matches("demo data</span>").count(), Widget::ALL.len());
    assert!(html.contains("Backend unreachable"));

    let text = render::text::snapshot(&view, &options);
    assert!(text.contains("(demo data)"));
}
