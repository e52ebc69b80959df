//! Backend descriptors.

use serde::{Deserialize, Serialize};

use crate::lenient;

/// Whether a backend is a simulator or physical hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "serde_json::Value")]
pub enum BackendKind {
    /// Classical simulation of a quantum device.
    #[default]
    Simulator,
    /// Physical quantum processing unit.
    Hardware,
}

impl From<serde_json::Value> for BackendKind {
    fn from(value: serde_json::Value) -> Self {
        value.as_str().map(Self::from).unwrap_or_default()
    }
}

impl From<&str> for BackendKind {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "hardware" | "qpu" | "device" => BackendKind::Hardware,
            _ => BackendKind::Simulator,
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Simulator => write!(f, "simulator"),
            BackendKind::Hardware => write!(f, "hardware"),
        }
    }
}

/// Operational status reported for a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "serde_json::Value")]
pub enum BackendStatus {
    /// Accepting and executing jobs.
    Online,
    /// Not reachable.
    Offline,
    /// Temporarily withdrawn for calibration or repair.
    Maintenance,
    /// The backend reported a status string we do not recognize.
    #[default]
    Unknown,
}

impl BackendStatus {
    /// Check if the backend accepts work.
    pub fn is_online(&self) -> bool {
        matches!(self, BackendStatus::Online)
    }

    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendStatus::Online => "online",
            BackendStatus::Offline => "offline",
            BackendStatus::Maintenance => "maintenance",
            BackendStatus::Unknown => "unknown",
        }
    }
}

impl From<serde_json::Value> for BackendStatus {
    fn from(value: serde_json::Value) -> Self {
        value.as_str().map(Self::from).unwrap_or_default()
    }
}

impl From<&str> for BackendStatus {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "online" | "active" | "available" => BackendStatus::Online,
            "offline" | "unavailable" => BackendStatus::Offline,
            "maintenance" | "calibrating" => BackendStatus::Maintenance,
            _ => BackendStatus::Unknown,
        }
    }
}

impl std::fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A simulated or real quantum processing unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendInfo {
    /// Backend name (e.g., "iqm_garnet").
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    /// Vendor or hosting provider.
    #[serde(deserialize_with = "lenient::text")]
    pub provider: String,
    /// Simulator or hardware.
    pub kind: BackendKind,
    /// Current status.
    pub status: BackendStatus,
    /// Number of qubits.
    #[serde(deserialize_with = "lenient::count")]
    pub num_qubits: u32,
    /// Jobs waiting in the backend queue.
    #[serde(deserialize_with = "lenient::count")]
    pub queue_length: u32,
    /// Mean gate fidelity in [0, 1].
    #[serde(deserialize_with = "lenient::or_default")]
    pub avg_gate_fidelity: f64,
    /// Mean T1 relaxation time in microseconds.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub t1_us: Option<f64>,
    /// Mean T2 dephasing time in microseconds.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub t2_us: Option<f64>,
}

impl BackendInfo {
    /// Create a backend descriptor with the given name and size.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            ..Self::default()
        }
    }

    /// Set the status.
    pub fn with_status(mut self, status: BackendStatus) -> Self {
        self.status = status;
        self
    }
}
