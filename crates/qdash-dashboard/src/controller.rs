//! Refresh cycle and polling loop.
//!
//! One cycle issues every endpoint fetch concurrently, substitutes demo
//! data for whatever failed, and replaces the view wholesale. The poller
//! repeats this on a fixed interval until told to stop.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use qdash_model::{Endpoint, TestProbe};

use crate::client::{ApiClient, FetchResult};
use crate::config::DashboardConfig;
use crate::fallback::Fallback;
use crate::notify::{Notification, NotificationLevel};
use crate::state::AppState;
use crate::view::{ConnectionStatus, CycleData, Sourced, ViewState};
use crate::ws::events::DashboardEvent;

/// Owns the backend client and the demo data generator.
pub struct Controller {
    client: ApiClient,
    fallback: Fallback,
}

impl Controller {
    pub fn new(client: ApiClient, fallback: Fallback) -> Self {
        Self { client, fallback }
    }

    /// Build a controller from the API and poll settings.
    pub fn from_config(config: &DashboardConfig) -> FetchResult<Self> {
        let client = ApiClient::new(config.api.base_url.clone(), config.request_timeout())?;
        let fallback = Fallback::new(config.poll.demo_seed, config.poll.demo_jobs);
        Ok(Self::new(client, fallback))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Fetch every endpoint and fill the gaps with demo data.
    pub async fn collect(&self) -> CycleData {
        let c = &self.client;
        let (
            metrics,
            jobs,
            backends,
            measurements,
            entanglement,
            quantum_state,
            recommendations,
            probe,
        ) = futures::join!(
            c.metrics(),
            c.jobs(),
            c.backends(),
            c.measurement_results(),
            c.entanglement_data(),
            c.quantum_state_data(),
            c.recommendations(),
            c.test(),
        );

        let f = &self.fallback;
        let backends = sourced(backends, || f.backends());
        let jobs = sourced(jobs, || f.jobs(&backends.data));
        let metrics = sourced(metrics, || f.metrics(&jobs.data, &backends.data));
        let measurements = sourced(measurements, || f.measurement_results(&jobs.data));
        let entanglement = sourced(entanglement, || f.entanglement());
        let quantum_state = sourced(quantum_state, || f.quantum_state());
        let recommendations = sourced(recommendations, || f.recommendations(&backends.data));
        let probe = sourced(probe, || f.probe());

        CycleData {
            metrics,
            jobs,
            backends,
            measurements,
            entanglement,
            quantum_state,
            recommendations,
            probe,
        }
    }

    /// Run one cycle and publish the result into `state`.
    pub async fn refresh(&self, state: &AppState) -> ViewState {
        let data = self.collect().await;
        let (live, total) = data.live_counts();
        debug!(live, total, "cycle fetched");

        let (previous, next) = {
            let mut view = state.view.write().await;
            let previous = view.connection;
            let next = ViewState::stamped(view.cycle + 1, data);
            *view = next.clone();
            (previous, next)
        };

        if previous != next.connection {
            info!(from = %previous, to = %next.connection, "connection status changed");
            state.publish(DashboardEvent::ConnectionChanged {
                from: previous,
                to: next.connection,
            });
            if let Some(notification) = connection_notice(next.connection, self.client.base_url()) {
                state.notify(notification);
            }
        }

        state.publish(DashboardEvent::ViewUpdated {
            cycle: next.cycle,
            connection: next.connection,
            live_widgets: live,
            total_widgets: total,
        });

        next
    }

    /// Call the backend's test endpoint.
    pub async fn probe(&self) -> FetchResult<TestProbe> {
        self.client.try_fetch(Endpoint::Test).await
    }
}

fn sourced<T>(fetched: Option<T>, fallback: impl FnOnce() -> T) -> Sourced<T> {
    match fetched {
        Some(data) => Sourced::live(data),
        None => Sourced::demo(fallback()),
    }
}

/// Notification raised when the connection enters `status`.
fn connection_notice(status: ConnectionStatus, base_url: &str) -> Option<Notification> {
    let (level, message) = match status {
        ConnectionStatus::Live => (
            NotificationLevel::Info,
            format!("Connected to backend at {base_url}"),
        ),
        ConnectionStatus::Degraded => (
            NotificationLevel::Warning,
            "Some backend endpoints failed, showing partial demo data".to_string(),
        ),
        ConnectionStatus::Offline => (
            NotificationLevel::Error,
            format!("Backend unreachable at {base_url}, showing demo data"),
        ),
        ConnectionStatus::Connecting => return None,
    };
    Some(Notification::new(level, message))
}

/// Refresh on the configured interval until `shutdown` turns true.
///
/// The first cycle runs immediately. Ticks missed while a slow cycle is in
/// flight are skipped rather than bunched.
pub async fn run_poller(state: Arc<AppState>, mut shutdown: watch::Receiver<bool>) {
    let period = state.config.poll_interval();
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!("Polling {} every {:?}", state.controller.client().base_url(), period);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                state.refresh().await;
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!("Poller stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sourced_prefers_fetched() {
        let s = sourced(Some(1), || 2);
        assert!(s.is_live());
        assert_eq!(s.data, 1);

        let s = sourced(None, || 2);
        assert!(!s.is_live());
        assert_eq!(s.data, 2);
    }

    #[test]
    fn test_connection_notice_levels() {
        let n = connection_notice(ConnectionStatus::Offline, "http://x").unwrap();
        assert_eq!(n.level, NotificationLevel::Error);
        assert!(n.message.contains("http://x"));

        let n = connection_notice(ConnectionStatus::Degraded, "http://x").unwrap();
        assert_eq!(n.level, NotificationLevel::Warning);

        assert!(connection_notice(ConnectionStatus::Connecting, "http://x").is_none());
    }
}
