//! Demo data substituted for failed fetches.

use std::sync::Mutex;

use rand::SeedableRng;
use rand::rngs::StdRng;

use qdash_model::{
    BackendInfo, EntanglementData, JobRecord, JobStatus, MeasurementResults, MetricsSnapshot,
    QuantumStateData, Recommendation, TestProbe, synth,
};

const DEMO_QUBITS: u32 = 3;
const DEMO_ENTANGLED_QUBITS: u32 = 4;
const DEMO_SHOTS: u32 = 1024;

/// Generator of synthetic widget data.
///
/// Each category is generated independently; only the metrics are derived
/// from data already chosen for the cycle.
pub struct Fallback {
    rng: Mutex<StdRng>,
    demo_jobs: usize,
}

impl Fallback {
    /// `seed` makes the demo data reproducible; `None` seeds from entropy.
    pub fn new(seed: Option<u64>, demo_jobs: usize) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
            demo_jobs,
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A panic while generating cannot leave the RNG in an invalid state.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }

    pub fn backends(&self) -> Vec<BackendInfo> {
        self.with_rng(|rng| synth::backends(rng))
    }

    pub fn jobs(&self, backends: &[BackendInfo]) -> Vec<JobRecord> {
        self.with_rng(|rng| synth::jobs(rng, backends, self.demo_jobs))
    }

    /// Metrics consistent with the cycle's job table and backend list.
    pub fn metrics(&self, jobs: &[JobRecord], backends: &[BackendInfo]) -> MetricsSnapshot {
        synth::metrics(jobs, backends)
    }

    /// Counts for the most recent completed job in `jobs`, or a placeholder job.
    pub fn measurement_results(&self, jobs: &[JobRecord]) -> MeasurementResults {
        let completed = jobs
            .iter()
            .filter(|j| j.status == JobStatus::Completed)
            .max_by_key(|j| j.completed_at);
        let (job_id, num_qubits, shots) = match completed {
            Some(job) => (job.id.clone(), job.num_qubits, job.shots),
            None => ("demo-job".to_string(), DEMO_QUBITS, DEMO_SHOTS),
        };
        let shots = if shots == 0 { DEMO_SHOTS } else { shots };
        self.with_rng(|rng| synth::measurement_results(rng, job_id, num_qubits, shots))
    }

    pub fn entanglement(&self) -> EntanglementData {
        self.with_rng(|rng| synth::entanglement(rng, DEMO_ENTANGLED_QUBITS))
    }

    pub fn quantum_state(&self) -> QuantumStateData {
        self.with_rng(|rng| synth::quantum_state(rng, DEMO_QUBITS))
    }

    pub fn recommendations(&self, backends: &[BackendInfo]) -> Vec<Recommendation> {
        self.with_rng(|rng| synth::recommendations(rng, backends))
    }

    pub fn probe(&self) -> TestProbe {
        synth::test_probe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_fallback_is_reproducible() {
        let a = Fallback::new(Some(9), 5);
        let b = Fallback::new(Some(9), 5);
        let backends = a.backends();
        assert_eq!(backends, b.backends());

        let statuses = |jobs: Vec<JobRecord>| -> Vec<_> {
            jobs.into_iter().map(|j| (j.backend, j.status, j.shots)).collect()
        };
        assert_eq!(statuses(a.jobs(&backends)), statuses(b.jobs(&backends)));
    }

    #[test]
    fn test_job_count_follows_config() {
        let fallback = Fallback::new(Some(1), 7);
        let backends = fallback.backends();
        assert_eq!(fallback.jobs(&backends).len(), 7);
    }

    #[test]
    fn test_metrics_agree_with_jobs() {
        let fallback = Fallback::new(Some(2), 20);
        let backends = fallback.backends();
        let jobs = fallback.jobs(&backends);
        let metrics = fallback.metrics(&jobs, &backends);
        assert_eq!(metrics.total_jobs() as usize, jobs.len());
        assert_eq!(metrics.total_backends as usize, backends.len());
    }

    #[test]
    fn test_measurements_follow_completed_job() {
        let fallback = Fallback::new(Some(3), 0);
        let mut job = JobRecord::new("job-42", "sim");
        job.status = JobStatus::Completed;
        job.num_qubits = 2;
        job.shots = 500;
        let results = fallback.measurement_results(&[job]);
        assert_eq!(results.job_id, "job-42");
        assert_eq!(results.total(), 500);
        assert!(results.counts.keys().all(|k| k.len() == 2));
    }

    #[test]
    fn test_measurements_without_completed_job() {
        let fallback = Fallback::new(Some(4), 0);
        let results = fallback.measurement_results(&[]);
        assert_eq!(results.job_id, "demo-job");
        assert_eq!(results.total(), u64::from(DEMO_SHOTS));
    }

    #[test]
    fn test_measurements_for_huge_live_job_stay_cheap() {
        let fallback = Fallback::new(Some(4), 5);
        let mut job = JobRecord::new("live-big", "ibm_brisbane");
        job.status = JobStatus::Completed;
        job.num_qubits = 5;
        job.shots = 5_000_000;
        let results = fallback.measurement_results(&[job]);
        assert_eq!(results.job_id, "live-big");
        assert_eq!(results.total(), 5_000_000);
    }
}

