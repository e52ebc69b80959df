//! Pairwise entanglement data.

use serde::{Deserialize, Serialize};

/// Concurrence between two qubits.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntangledPair {
    pub qubit_a: u32,
    pub qubit_b: u32,
    /// Concurrence in [0, 1]; 0 is separable, 1 is maximally entangled.
    pub concurrence: f64,
}

/// Entanglement map of a register.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntanglementData {
    /// Register width.
    pub num_qubits: u32,
    /// Measured pairs.
    pub pairs: Vec<EntangledPair>,
    /// Register-wide entanglement measure in [0, 1].
    pub global_entanglement: f64,
}

impl EntanglementData {
    /// The pair with the highest concurrence.
    pub fn strongest_pair(&self) -> Option<&EntangledPair> {
        self.pairs
            .iter()
            .max_by(|a, b| a.concurrence.total_cmp(&b.concurrence))
    }

    /// Mean concurrence over all pairs.
    pub fn mean_concurrence(&self) -> f64 {
        if self.pairs.is_empty() {
            return 0.0;
        }
        self.pairs.iter().map(|p| p.concurrence).sum::<f64>() / self.pairs.len() as f64
    }
}
