//! Per-qubit state data and circuit sketches for the visualization widgets.

use num_complex::Complex64;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

const NORM_EPSILON: f64 = 1e-12;

/// Single-qubit (reduced) pure state `α|0⟩ + β|1⟩`.
///
/// Amplitudes travel as `[re, im]` pairs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QubitState {
    /// Qubit index in the register.
    pub index: u32,
    pub alpha: Complex64,
    pub beta: Complex64,
}

/// Cartesian point on (or inside) the Bloch sphere.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BlochVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl BlochVector {
    /// Distance from the origin; 1 for pure states.
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Polar angle from +Z in radians.
    pub fn theta(&self) -> f64 {
        let r = self.length();
        if r < NORM_EPSILON {
            0.0
        } else {
            (self.z / r).clamp(-1.0, 1.0).acos()
        }
    }

    /// Azimuthal angle from +X in radians.
    pub fn phi(&self) -> f64 {
        self.y.atan2(self.x)
    }
}

impl QubitState {
    pub fn new(index: u32, alpha: Complex64, beta: Complex64) -> Self {
        Self { index, alpha, beta }
    }

    /// Build the state `cos(θ/2)|0⟩ + e^{iφ} sin(θ/2)|1⟩`.
    pub fn from_angles(index: u32, theta: f64, phi: f64) -> Self {
        Self {
            index,
            alpha: Complex64::new((theta / 2.0).cos(), 0.0),
            beta: Complex64::from_polar((theta / 2.0).sin(), phi),
        }
    }

    /// `|α|² + |β|²`.
    pub fn norm_sqr(&self) -> f64 {
        self.alpha.norm_sqr() + self.beta.norm_sqr()
    }

    /// Bloch vector of the normalized state. A zero state maps to the origin.
    pub fn bloch_vector(&self) -> BlochVector {
        let n = self.norm_sqr();
        if n < NORM_EPSILON {
            return BlochVector::default();
        }
        let coherence = self.alpha.conj() * self.beta / n;
        BlochVector {
            x: 2.0 * coherence.re,
            y: 2.0 * coherence.im,
            z: (self.alpha.norm_sqr() - self.beta.norm_sqr()) / n,
        }
    }

    /// Probability of measuring `|1⟩`.
    pub fn prob_one(&self) -> f64 {
        let n = self.norm_sqr();
        if n < NORM_EPSILON {
            0.0
        } else {
            self.beta.norm_sqr() / n
        }
    }
}

/// A gate in a circuit sketch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitGate {
    /// Gate name (e.g., "h", "cx", "rz", "measure").
    pub name: String,
    /// Qubits the gate touches. Empty means the whole register (barrier).
    pub qubits: Vec<u32>,
    /// Rotation parameters in radians.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,
}

impl CircuitGate {
    pub fn new(name: impl Into<String>, qubits: impl Into<Vec<u32>>) -> Self {
        Self {
            name: name.into(),
            qubits: qubits.into(),
            params: vec![],
        }
    }

    pub fn with_params(mut self, params: impl Into<Vec<f64>>) -> Self {
        self.params = params.into();
        self
    }

    /// Display label (e.g., "H", "CX", "RZ(π/2)").
    pub fn label(&self) -> String {
        let base = match self.name.to_ascii_lowercase().as_str() {
            "measure" => return "M".to_string(),
            "barrier" => return "║".to_string(),
            "reset" => return "|0⟩".to_string(),
            "sdg" => "S†".to_string(),
            "tdg" => "T†".to_string(),
            "sx" => "√X".to_string(),
            "swap" => "SWAP".to_string(),
            "iswap" => "iSWAP".to_string(),
            other => other.to_ascii_uppercase(),
        };
        if self.params.is_empty() {
            base
        } else {
            let params: Vec<String> = self.params.iter().map(|p| format_param(*p)).collect();
            format!("{}({})", base, params.join(","))
        }
    }

    pub fn is_measurement(&self) -> bool {
        self.name.eq_ignore_ascii_case("measure")
    }
}

/// Format a rotation angle, naming common multiples of π.
fn format_param(value: f64) -> String {
    let pi = std::f64::consts::PI;
    let named = [
        (pi, "π"),
        (pi / 2.0, "π/2"),
        (pi / 4.0, "π/4"),
        (-pi, "-π"),
        (-pi / 2.0, "-π/2"),
        (-pi / 4.0, "-π/4"),
    ];
    for (v, name) in named {
        if (value - v).abs() < 1e-10 {
            return name.to_string();
        }
    }
    format!("{:.2}", value)
}

/// Gates grouped into one time step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitLayer {
    /// Layer index (0-based).
    pub depth: usize,
    pub gates: Vec<CircuitGate>,
}

/// Ordered gate list for the circuit widget.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitSketch {
    pub num_qubits: u32,
    pub gates: Vec<CircuitGate>,
}

impl CircuitSketch {
    /// Group gates into time layers.
    ///
    /// A gate lands in the first layer after the last layer that touched any
    /// of its qubits. Gates with no listed qubits span the whole register:
    /// they sit on the frontier and nothing after them may go below it.
    pub fn layers(&self) -> Vec<CircuitLayer> {
        let mut layers: Vec<CircuitLayer> = vec![];
        let mut qubit_depth: FxHashMap<u32, usize> = FxHashMap::default();
        let mut frontier = 0usize;
        let mut floor = 0usize;

        for gate in &self.gates {
            let depth = if gate.qubits.is_empty() {
                frontier
            } else {
                gate.qubits
                    .iter()
                    .map(|q| qubit_depth.get(q).copied().unwrap_or(0))
                    .max()
                    .unwrap_or(0)
                    .max(floor)
            };

            while layers.len() <= depth {
                layers.push(CircuitLayer {
                    depth: layers.len(),
                    gates: vec![],
                });
            }
            layers[depth].gates.push(gate.clone());

            if gate.qubits.is_empty() {
                floor = depth + 1;
            } else {
                for q in &gate.qubits {
                    qubit_depth.insert(*q, depth + 1);
                }
            }
            frontier = frontier.max(depth + 1);
        }

        layers
    }

    /// Number of qubit wires needed to draw the circuit: the declared width,
    /// or one past the highest qubit index a gate touches if that is larger.
    pub fn width(&self) -> u64 {
        self.gates
            .iter()
            .flat_map(|g| g.qubits.iter())
            .map(|q| u64::from(*q) + 1)
            .max()
            .unwrap_or(0)
            .max(u64::from(self.num_qubits))
    }
}

/// Payload of `/api/quantum_state_data`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantumStateData {
    pub qubits: Vec<QubitState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circuit: Option<CircuitSketch>,
}
