//! In-memory view state rendered by the widgets.
//!
//! The whole state is rebuilt every refresh cycle and replaces the previous
//! one; nothing is merged field by field.

use chrono::{DateTime, Utc};
use serde::Serialize;

use qdash_model::{
    BackendInfo, EntanglementData, JobRecord, MeasurementResults, MetricsSnapshot,
    QuantumStateData, Recommendation, TestProbe,
};

/// Where a widget's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Fetched from the backend this cycle.
    Live,
    /// Generated locally because the fetch failed.
    Demo,
}

/// Data for one widget, tagged with its origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sourced<T> {
    pub source: DataSource,
    pub data: T,
}

impl<T> Sourced<T> {
    pub fn live(data: T) -> Self {
        Self {
            source: DataSource::Live,
            data,
        }
    }

    pub fn demo(data: T) -> Self {
        Self {
            source: DataSource::Demo,
            data,
        }
    }

    pub fn is_live(&self) -> bool {
        self.source == DataSource::Live
    }
}

impl<T: Default> Default for Sourced<T> {
    fn default() -> Self {
        Self::demo(T::default())
    }
}

/// Overall backend reachability, judged from the last cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// No cycle has completed yet.
    Connecting,
    /// Every fetch succeeded.
    Live,
    /// Some fetches fell back to demo data.
    Degraded,
    /// Every fetch fell back to demo data.
    Offline,
}

impl ConnectionStatus {
    /// Classify a cycle from the number of successful fetches.
    pub fn from_counts(live: usize, total: usize) -> Self {
        if total == 0 || live == 0 {
            ConnectionStatus::Offline
        } else if live == total {
            ConnectionStatus::Live
        } else {
            ConnectionStatus::Degraded
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Live => "live",
            ConnectionStatus::Degraded => "degraded",
            ConnectionStatus::Offline => "offline",
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dashboard panel bound to one data category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    Metrics,
    Jobs,
    Backends,
    BlochSphere,
    Circuit,
    Measurements,
    Entanglement,
    Recommendations,
}

impl Widget {
    /// All widgets in page order.
    pub const ALL: [Widget; 8] = [
        Widget::Metrics,
        Widget::Jobs,
        Widget::Backends,
        Widget::BlochSphere,
        Widget::Circuit,
        Widget::Measurements,
        Widget::Entanglement,
        Widget::Recommendations,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Widget::Metrics => "metrics",
            Widget::Jobs => "jobs",
            Widget::Backends => "backends",
            Widget::BlochSphere => "bloch_sphere",
            Widget::Circuit => "circuit",
            Widget::Measurements => "measurements",
            Widget::Entanglement => "entanglement",
            Widget::Recommendations => "recommendations",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Widget::Metrics => "System Metrics",
            Widget::Jobs => "Jobs",
            Widget::Backends => "Backends",
            Widget::BlochSphere => "Bloch Spheres",
            Widget::Circuit => "Circuit",
            Widget::Measurements => "Measurement Results",
            Widget::Entanglement => "Entanglement",
            Widget::Recommendations => "Recommendations",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.name() == name)
    }
}

/// Results of one refresh cycle, before they are stamped into a view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CycleData {
    pub metrics: Sourced<MetricsSnapshot>,
    pub jobs: Sourced<Vec<JobRecord>>,
    pub backends: Sourced<Vec<BackendInfo>>,
    pub measurements: Sourced<MeasurementResults>,
    pub entanglement: Sourced<EntanglementData>,
    pub quantum_state: Sourced<QuantumStateData>,
    pub recommendations: Sourced<Vec<Recommendation>>,
    pub probe: Sourced<TestProbe>,
}

impl CycleData {
    /// (live fetches, total fetches)
    pub fn live_counts(&self) -> (usize, usize) {
        count_live([
            self.metrics.is_live(),
            self.jobs.is_live(),
            self.backends.is_live(),
            self.measurements.is_live(),
            self.entanglement.is_live(),
            self.quantum_state.is_live(),
            self.recommendations.is_live(),
            self.probe.is_live(),
        ])
    }
}

fn count_live(flags: [bool; 8]) -> (usize, usize) {
    (flags.iter().filter(|f| **f).count(), flags.len())
}

/// Everything the renderers need.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    /// Completed refresh cycles.
    pub cycle: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    pub connection: ConnectionStatus,
    pub metrics: Sourced<MetricsSnapshot>,
    pub jobs: Sourced<Vec<JobRecord>>,
    pub backends: Sourced<Vec<BackendInfo>>,
    pub measurements: Sourced<MeasurementResults>,
    pub entanglement: Sourced<EntanglementData>,
    pub quantum_state: Sourced<QuantumStateData>,
    pub recommendations: Sourced<Vec<Recommendation>>,
    pub probe: Sourced<TestProbe>,
}

impl ViewState {
    /// State shown before the first cycle completes.
    pub fn connecting() -> Self {
        Self::from_cycle(0, CycleData::default(), None, ConnectionStatus::Connecting)
    }

    /// Stamp cycle data into a view.
    pub fn stamped(cycle: u64, data: CycleData) -> Self {
        let (live, total) = data.live_counts();
        let connection = ConnectionStatus::from_counts(live, total);
        Self::from_cycle(cycle, data, Some(Utc::now()), connection)
    }

    fn from_cycle(
        cycle: u64,
        data: CycleData,
        last_updated: Option<DateTime<Utc>>,
        connection: ConnectionStatus,
    ) -> Self {
        Self {
            cycle,
            last_updated,
            connection,
            metrics: data.metrics,
            jobs: data.jobs,
            backends: data.backends,
            measurements: data.measurements,
            entanglement: data.entanglement,
            quantum_state: data.quantum_state,
            recommendations: data.recommendations,
            probe: data.probe,
        }
    }

    /// (live fetches, total fetches) of the cycle that produced this view.
    pub fn live_counts(&self) -> (usize, usize) {
        count_live([
            self.metrics.is_live(),
            self.jobs.is_live(),
            self.backends.is_live(),
            self.measurements.is_live(),
            self.entanglement.is_live(),
            self.quantum_state.is_live(),
            self.recommendations.is_live(),
            self.probe.is_live(),
        ])
    }

    /// Origin of the data behind a widget.
    pub fn source_of(&self, widget: Widget) -> DataSource {
        match widget {
            Widget::Metrics => self.metrics.source,
            Widget::Jobs => self.jobs.source,
            Widget::Backends => self.backends.source,
            Widget::BlochSphere | Widget::Circuit => self.quantum_state.source,
            Widget::Measurements => self.measurements.source,
            Widget::Entanglement => self.entanglement.source,
            Widget::Recommendations => self.recommendations.source,
        }
    }

    /// One widget's data as JSON.
    pub fn widget_json(&self, widget: Widget) -> serde_json::Result<serde_json::Value> {
        match widget {
            Widget::Metrics => serde_json::to_value(&self.metrics),
            Widget::Jobs => serde_json::to_value(&self.jobs),
            Widget::Backends => serde_json::to_value(&self.backends),
            Widget::BlochSphere => {
                let vectors: Vec<_> = self
                    .quantum_state
                    .data
                    .qubits
                    .iter()
                    .map(|q| (q.index, q.bloch_vector()))
                    .collect();
                serde_json::to_value(Sourced {
                    source: self.quantum_state.source,
                    data: vectors,
                })
            }
            Widget::Circuit => {
                let layers = self
                    .quantum_state
                    .data
                    .circuit
                    .as_ref()
                    .map(|c| c.layers())
                    .unwrap_or_default();
                serde_json::to_value(Sourced {
                    source: self.quantum_state.source,
                    data: layers,
                })
            }
            Widget::Measurements => serde_json::to_value(&self.measurements),
            Widget::Entanglement => serde_json::to_value(&self.entanglement),
            Widget::Recommendations => serde_json::to_value(&self.recommendations),
        }
    }
}
