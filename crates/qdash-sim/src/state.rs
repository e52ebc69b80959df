//! Shared state for the simulated backend.

use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use qdash_model::Endpoint;

use crate::world::{World, WorldConfig};

/// How an endpoint should misbehave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Serve the real payload.
    #[default]
    Healthy,
    /// Respond 503 Service Unavailable.
    Unavailable,
    /// Respond 200 with an HTML body.
    NonJson,
    /// Respond 200 `application/json` whose shape matches no record.
    Malformed,
}

struct Clock {
    last_tick: Instant,
}

/// Shared state behind the sim router.
pub struct SimState {
    world: Mutex<World>,
    clock: Mutex<Clock>,
    /// World advances at most once per interval; `None` disables time-based ticking.
    tick_interval: Option<Duration>,
    default_mode: Mutex<FailureMode>,
    overrides: Mutex<FxHashMap<Endpoint, FailureMode>>,
}

impl SimState {
    pub fn new(config: WorldConfig, tick_interval: Option<Duration>) -> Self {
        Self {
            world: Mutex::new(World::new(config)),
            clock: Mutex::new(Clock {
                last_tick: Instant::now(),
            }),
            tick_interval,
            default_mode: Mutex::new(FailureMode::Healthy),
            overrides: Mutex::new(FxHashMap::default()),
        }
    }

    /// Seeded world that only advances when [`SimState::advance`] is called.
    pub fn manual(seed: u64) -> Self {
        Self::new(
            WorldConfig {
                seed: Some(seed),
                ..WorldConfig::default()
            },
            None,
        )
    }

    /// Apply one world tick immediately.
    pub async fn advance(&self) {
        self.world.lock().await.advance();
    }

    /// Apply every tick that came due since the last request.
    pub(crate) async fn catch_up(&self) {
        let Some(interval) = self.tick_interval else {
            return;
        };
        if interval.is_zero() {
            return;
        }
        let due = {
            let mut clock = self.clock.lock().await;
            let elapsed = clock.last_tick.elapsed();
            let due = (elapsed.as_nanos() / interval.as_nanos()).min(u128::from(u32::MAX)) as u32;
            if due > 0 {
                clock.last_tick += interval * due;
            }
            due
        };
        if due > 0 {
            let mut world = self.world.lock().await;
            // Cap the burst after long idle periods.
            for _ in 0..due.min(10) {
                world.advance();
            }
            tracing::debug!(ticks = due, tick = world.tick(), "world advanced");
        }
    }

    pub(crate) async fn world(&self) -> tokio::sync::MutexGuard<'_, World> {
        self.world.lock().await
    }

    /// Set the failure mode for every endpoint without an override.
    pub async fn set_mode(&self, mode: FailureMode) {
        *self.default_mode.lock().await = mode;
    }

    /// Set the failure mode for a single endpoint.
    pub async fn set_endpoint_mode(&self, endpoint: Endpoint, mode: FailureMode) {
        self.overrides.lock().await.insert(endpoint, mode);
    }

    /// Drop all per-endpoint overrides and return to healthy.
    pub async fn reset_modes(&self) {
        self.overrides.lock().await.clear();
        *self.default_mode.lock().await = FailureMode::Healthy;
    }

    pub async fn mode_for(&self, endpoint: Endpoint) -> FailureMode {
        if let Some(mode) = self.overrides.lock().await.get(&endpoint) {
            return *mode;
        }
        *self.default_mode.lock().await
    }
}

impl Default for SimState {
    fn default() -> Self {
        Self::new(WorldConfig::default(), Some(Duration::from_secs(2)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_override_wins_over_default() {
        let state = SimState::manual(1);
        state.set_mode(FailureMode::Unavailable).await;
        state
            .set_endpoint_mode(Endpoint::Jobs, FailureMode::Healthy)
            .await;
        assert_eq!(state.mode_for(Endpoint::Jobs).await, FailureMode::Healthy);
        assert_eq!(
            state.mode_for(Endpoint::Metrics).await,
            FailureMode::Unavailable
        );

        state.reset_modes().await;
        assert_eq!(state.mode_for(Endpoint::Metrics).await, FailureMode::Healthy);
    }

    #[tokio::test]
    async fn test_manual_state_does_not_tick() {
        let state = SimState::manual(2);
        state.catch_up().await;
        assert_eq!(state.world().await.tick(), 0);
        state.advance().await;
        assert_eq!(state.world().await.tick(), 1);
    }
}
