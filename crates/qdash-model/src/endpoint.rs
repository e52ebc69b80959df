//! The JSON endpoints a dashboard backend exposes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Metrics,
    Jobs,
    Backends,
    MeasurementResults,
    EntanglementData,
    QuantumStateData,
    Recommendations,
    Test,
}

impl Endpoint {
    pub const ALL: [Endpoint; 8] = [
        Endpoint::Metrics,
        Endpoint::Jobs,
        Endpoint::Backends,
        Endpoint::MeasurementResults,
        Endpoint::EntanglementData,
        Endpoint::QuantumStateData,
        Endpoint::Recommendations,
        Endpoint::Test,
    ];

    /// Path segment under `/api/`.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Metrics => "metrics",
            Endpoint::Jobs => "jobs",
            Endpoint::Backends => "backends",
            Endpoint::MeasurementResults => "measurement_results",
            Endpoint::EntanglementData => "entanglement_data",
            Endpoint::QuantumStateData => "quantum_state_data",
            Endpoint::Recommendations => "recommendations",
            Endpoint::Test => "test",
        }
    }

    /// Absolute request path (e.g., `/api/jobs`).
    pub fn path(&self) -> String {
        format!("/api/{}", self.name())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
