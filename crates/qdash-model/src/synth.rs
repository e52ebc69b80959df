//! Random placeholder data.
//!
//! Every generator takes the RNG explicitly so callers can choose between a
//! seeded [`rand::rngs::StdRng`] (reproducible demos, tests) and
//! [`rand::thread_rng`].
//!
//! ```
//! use rand::SeedableRng;
//! use qdash_model::synth;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let backends = synth::backends(&mut rng);
//! let jobs = synth::jobs(&mut rng, &backends, 12);
//! assert_eq!(jobs.len(), 12);
//! ```

use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::backend::{BackendInfo, BackendKind, BackendStatus};
use crate::entanglement::{EntangledPair, EntanglementData};
use crate::job::{JobRecord, JobStatus};
use crate::measurement::MeasurementResults;
use crate::metrics::MetricsSnapshot;
use crate::probe::TestProbe;
use crate::recommendation::{Recommendation, Severity};
use crate::state::{CircuitGate, CircuitSketch, QuantumStateData, QubitState};

/// Catalogue of demo backends: (name, provider, kind, qubits).
pub const DEMO_BACKENDS: &[(&str, &str, BackendKind, u32)] = &[
    ("statevector_simulator", "local", BackendKind::Simulator, 24),
    ("noisy_simulator", "local", BackendKind::Simulator, 16),
    ("iqm_garnet", "IQM", BackendKind::Hardware, 20),
    ("ibm_brisbane", "IBM", BackendKind::Hardware, 127),
    ("ionq_aria", "IonQ", BackendKind::Hardware, 25),
    ("aqt_ibex", "AQT", BackendKind::Hardware, 12),
];

const JOB_NAMES: &[&str] = &[
    "bell_state",
    "ghz_5",
    "qft_8",
    "grover_search",
    "vqe_h2",
    "qaoa_maxcut",
    "random_circuit",
    "teleportation",
];

const SHOT_CHOICES: &[u32] = &[100, 512, 1024, 2048, 4096, 8192];

const SINGLE_QUBIT_GATES: &[&str] = &["h", "x", "y", "z", "s", "t", "sx"];
const ROTATION_GATES: &[&str] = &["rx", "ry", "rz"];
const TWO_QUBIT_GATES: &[&str] = &["cx", "cz", "swap"];

/// Lower bound of generated fidelities.
pub const MIN_FIDELITY: f64 = 0.8;

/// Demo backend list drawn from [`DEMO_BACKENDS`].
pub fn backends<R: Rng + ?Sized>(rng: &mut R) -> Vec<BackendInfo> {
    DEMO_BACKENDS
        .iter()
        .map(|&(name, provider, kind, num_qubits)| {
            let status = match (kind, rng.gen_range(0..10)) {
                (BackendKind::Simulator, _) => BackendStatus::Online,
                (BackendKind::Hardware, 0) => BackendStatus::Offline,
                (BackendKind::Hardware, 1) => BackendStatus::Maintenance,
                (BackendKind::Hardware, _) => BackendStatus::Online,
            };
            let hardware = kind == BackendKind::Hardware;
            BackendInfo {
                name: name.to_string(),
                provider: provider.to_string(),
                kind,
                status,
                num_qubits,
                queue_length: if status.is_online() {
                    rng.gen_range(0..25)
                } else {
                    0
                },
                avg_gate_fidelity: if hardware {
                    rng.gen_range(0.95..0.9995)
                } else {
                    1.0
                },
                t1_us: hardware.then(|| rng.gen_range(20.0..300.0)),
                t2_us: hardware.then(|| rng.gen_range(10.0..200.0)),
            }
        })
        .collect()
}

/// Generate `count` jobs spread across `backends`.
pub fn jobs<R: Rng + ?Sized>(rng: &mut R, backends: &[BackendInfo], count: usize) -> Vec<JobRecord> {
    let now = Utc::now();
    (0..count)
        .map(|_| {
            let backend = backends
                .choose(rng)
                .map(|b| (b.name.clone(), b.num_qubits.max(1)))
                .unwrap_or_else(|| ("statevector_simulator".to_string(), 24));
            let status = *JobStatus::ALL.choose(rng).unwrap_or(&JobStatus::Queued);
            let created_at = now - Duration::seconds(rng.gen_range(30..7200));
            let (progress, completed_at, fidelity) = match status {
                JobStatus::Queued => (0, None, None),
                JobStatus::Running => (rng.gen_range(1..100), None, None),
                JobStatus::Completed => (
                    100,
                    Some(created_at + Duration::seconds(rng.gen_range(5..600))),
                    Some(rng.gen_range(MIN_FIDELITY..1.0)),
                ),
                JobStatus::Failed => (
                    rng.gen_range(0..100),
                    Some(created_at + Duration::seconds(rng.gen_range(1..300))),
                    None,
                ),
            };
            let name = JOB_NAMES.choose(rng).copied().unwrap_or("circuit");
            JobRecord {
                id: format!("job-{}", &uuid::Uuid::new_v4().simple().to_string()[..8]),
                name: name.to_string(),
                backend: backend.0,
                status,
                num_qubits: rng.gen_range(1..=backend.1.min(16)),
                shots: SHOT_CHOICES.choose(rng).copied().unwrap_or(1024),
                progress,
                created_at: Some(created_at),
                completed_at,
                fidelity,
            }
        })
        .collect()
}

/// Metrics consistent with the given jobs and backends.
pub fn metrics(jobs: &[JobRecord], backends: &[BackendInfo]) -> MetricsSnapshot {
    MetricsSnapshot::derive_from(jobs, backends)
}

/// Most shots drawn one by one; larger requests are scaled up from a sample.
pub const MAX_GENERATED_SHOTS: u32 = 8192;

/// Random outcome counts over `num_qubits` bits that sum to `shots`.
///
/// The distribution is biased toward a few peaks so the histogram looks like
/// a real algorithm output rather than uniform noise. At most
/// [`MAX_GENERATED_SHOTS`] outcomes are drawn; beyond that the sampled counts
/// are scaled so they still sum to `shots`.
pub fn measurement_results<R: Rng + ?Sized>(
    rng: &mut R,
    job_id: impl Into<String>,
    num_qubits: u32,
    shots: u32,
) -> MeasurementResults {
    let num_qubits = num_qubits.clamp(1, 10);
    let outcomes = 1u64 << num_qubits;
    let peaks: Vec<u64> = (0..rng.gen_range(1..=3))
        .map(|_| rng.gen_range(0..outcomes))
        .collect();

    let sampled = shots.min(MAX_GENERATED_SHOTS);
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for _ in 0..sampled {
        let value = if rng.gen_bool(0.8) {
            peaks[rng.gen_range(0..peaks.len())]
        } else {
            rng.gen_range(0..outcomes)
        };
        let key = format!("{:0width$b}", value, width = num_qubits as usize);
        *counts.entry(key).or_insert(0) += 1;
    }
    if shots > sampled {
        scale_counts(&mut counts, u64::from(sampled), u64::from(shots));
    }

    MeasurementResults {
        job_id: job_id.into(),
        shots,
        counts,
    }
}

/// Scale counts drawn from `sampled` shots up to `shots`, keeping the sum exact.
fn scale_counts(counts: &mut BTreeMap<String, u64>, sampled: u64, shots: u64) {
    let mut total = 0;
    for count in counts.values_mut() {
        *count = *count * shots / sampled;
        total += *count;
    }
    // Rounding down loses less than one shot per outcome; the peak absorbs it.
    if let Some(peak) = counts.values_mut().max() {
        *peak += shots - total;
    }
}

/// Random concurrences for neighbouring and a few distant qubit pairs.
pub fn entanglement<R: Rng + ?Sized>(rng: &mut R, num_qubits: u32) -> EntanglementData {
    let num_qubits = num_qubits.max(2);
    let mut pairs: Vec<EntangledPair> = (0..num_qubits - 1)
        .map(|q| EntangledPair {
            qubit_a: q,
            qubit_b: q + 1,
            concurrence: rng.gen_range(0.0..=1.0),
        })
        .collect();
    if num_qubits > 2 {
        for _ in 0..rng.gen_range(0..num_qubits / 2 + 1) {
            let a = rng.gen_range(0..num_qubits - 2);
            let b = rng.gen_range(a + 2..num_qubits);
            pairs.push(EntangledPair {
                qubit_a: a,
                qubit_b: b,
                concurrence: rng.gen_range(0.0..0.5),
            });
        }
    }
    let global = pairs.iter().map(|p| p.concurrence).sum::<f64>() / pairs.len() as f64;
    EntanglementData {
        num_qubits,
        pairs,
        global_entanglement: global.clamp(0.0, 1.0),
    }
}

/// Random normalized qubit states plus a small circuit sketch.
pub fn quantum_state<R: Rng + ?Sized>(rng: &mut R, num_qubits: u32) -> QuantumStateData {
    let num_qubits = num_qubits.max(1);
    let qubits = (0..num_qubits)
        .map(|index| {
            let theta = rng.gen_range(0.0..std::f64::consts::PI);
            let phi = rng.gen_range(0.0..std::f64::consts::TAU);
            QubitState::from_angles(index, theta, phi)
        })
        .collect();
    QuantumStateData {
        qubits,
        circuit: Some(circuit(rng, num_qubits, (num_qubits * 3) as usize)),
    }
}

/// Random circuit of `num_gates` gates over `num_qubits` qubits, ending in measurements.
pub fn circuit<R: Rng + ?Sized>(rng: &mut R, num_qubits: u32, num_gates: usize) -> CircuitSketch {
    let num_qubits = num_qubits.max(1);
    let mut gates = Vec::with_capacity(num_gates + num_qubits as usize);
    for _ in 0..num_gates {
        let roll = rng.gen_range(0..10);
        let gate = if num_qubits > 1 && roll < 3 {
            let a = rng.gen_range(0..num_qubits);
            let mut b = rng.gen_range(0..num_qubits - 1);
            if b >= a {
                b += 1;
            }
            let name = TWO_QUBIT_GATES.choose(rng).copied().unwrap_or("cx");
            CircuitGate::new(name, [a, b])
        } else if roll < 5 {
            let name = ROTATION_GATES.choose(rng).copied().unwrap_or("rz");
            CircuitGate::new(name, [rng.gen_range(0..num_qubits)])
                .with_params([rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI)])
        } else {
            let name = SINGLE_QUBIT_GATES.choose(rng).copied().unwrap_or("h");
            CircuitGate::new(name, [rng.gen_range(0..num_qubits)])
        };
        gates.push(gate);
    }
    gates.extend((0..num_qubits).map(|q| CircuitGate::new("measure", [q])));
    CircuitSketch { num_qubits, gates }
}

/// Recommendations derived from backend conditions, plus a generic tip.
pub fn recommendations<R: Rng + ?Sized>(rng: &mut R, backends: &[BackendInfo]) -> Vec<Recommendation> {
    let mut out = Vec::new();
    for b in backends {
        match b.status {
            BackendStatus::Offline => out.push(Recommendation {
                title: format!("{} is offline", b.name),
                detail: "Route pending work to another backend.".to_string(),
                severity: Severity::Critical,
                backend: Some(b.name.clone()),
            }),
            BackendStatus::Maintenance => out.push(Recommendation {
                title: format!("{} under maintenance", b.name),
                detail: "Calibration in progress; expect queue delays.".to_string(),
                severity: Severity::Warning,
                backend: Some(b.name.clone()),
            }),
            _ if b.queue_length > 15 => out.push(Recommendation {
                title: format!("Long queue on {}", b.name),
                detail: format!(
                    "{} jobs waiting; consider a simulator for development runs.",
                    b.queue_length
                ),
                severity: Severity::Warning,
                backend: Some(b.name.clone()),
            }),
            _ => {}
        }
    }
    let tips = [
        "Batch small circuits to reduce queue overhead.",
        "Enable readout error mitigation for shallow circuits.",
        "Transpile with optimization level 2 before submitting to hardware.",
        "Use fewer shots while iterating on circuit structure.",
    ];
    if let Some(tip) = tips.choose(rng) {
        out.push(Recommendation {
            title: "Tip".to_string(),
            detail: (*tip).to_string(),
            severity: Severity::Info,
            backend: None,
        });
    }
    out
}

/// The probe a healthy demo backend would answer with.
pub fn test_probe() -> TestProbe {
    TestProbe::ok("demo data generator")
}
