//! Property tests for the demo data generator.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use qdash_model::{JobStatus, MetricsSnapshot, synth};

proptest! {
    #[test]
    fn measurement_counts_sum_to_shots(seed in any::<u64>(), qubits in 1u32..8, shots in 0u32..2048) {
        let mut rng = StdRng::seed_from_u64(seed);
        let m = synth::measurement_results(&mut rng, "job", qubits, shots);
        prop_assert_eq!(m.total(), u64::from(shots));
        prop_assert!(m.counts.keys().all(|k| k.len() == qubits as usize));
    }

    #[test]
    fn generated_states_are_pure(seed in any::<u64>(), qubits in 1u32..12) {
        let mut rng = StdRng::seed_from_u64(seed);
        let data = synth::quantum_state(&mut rng, qubits);
        prop_assert_eq!(data.qubits.len(), qubits as usize);
        for q in &data.qubits {
            prop_assert!((q.norm_sqr() - 1.0).abs() < 1e-9);
            prop_assert!((q.bloch_vector().length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn concurrence_stays_in_unit_interval(seed in any::<u64>(), qubits in 0u32..16) {
        let mut rng = StdRng::seed_from_u64(seed);
        let data = synth::entanglement(&mut rng, qubits);
        prop_assert!(!data.pairs.is_empty());
        prop_assert!(data.pairs.iter().all(|p| (0.0..=1.0).contains(&p.concurrence)));
        prop_assert!(data.pairs.iter().all(|p| p.qubit_a < data.num_qubits && p.qubit_b < data.num_qubits));
        prop_assert!((0.0..=1.0).contains(&data.global_entanglement));
    }

    #[test]
    fn derived_metrics_agree_with_job_table(seed in any::<u64>(), count in 0usize..64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let backends = synth::backends(&mut rng);
        let jobs = synth::jobs(&mut rng, &backends, count);
        let m: MetricsSnapshot = synth::metrics(&jobs, &backends);

        prop_assert_eq!(m.total_jobs() as usize, count);
        let running = jobs.iter().filter(|j| j.status == JobStatus::Running).count();
        prop_assert_eq!(m.active_jobs as usize, running);
        prop_assert!((0.0..=1.0).contains(&m.success_rate));
        prop_assert!((0.0..=100.0).contains(&m.uptime_percent));
    }

    #[test]
    fn circuit_layers_preserve_every_gate(seed in any::<u64>(), qubits in 1u32..6, gates in 0usize..40) {
        let mut rng = StdRng::seed_from_u64(seed);
        let sketch = synth::circuit(&mut rng, qubits, gates);
        let layered: usize = sketch.layers().iter().map(|l| l.gates.len()).sum();
        prop_assert_eq!(layered, sketch.gates.len());
    }
}
