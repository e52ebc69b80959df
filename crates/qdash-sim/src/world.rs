//! Simulated job population that evolves over time.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;

use qdash_model::{
    BackendInfo, EntanglementData, JobRecord, JobStatus, MeasurementResults, MetricsSnapshot,
    QuantumStateData, Recommendation, synth,
};

/// Probability that a running job fails when it reaches 100%.
const FAILURE_RATE: f64 = 0.1;

/// Width of the register shown in the state and entanglement widgets.
const VISUAL_QUBITS: u32 = 4;

/// Simulation knobs.
#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Jobs created at startup.
    pub initial_jobs: usize,
    /// Upper bound on retained jobs; oldest terminal jobs are evicted first.
    pub max_jobs: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            initial_jobs: 12,
            max_jobs: 40,
        }
    }
}

/// Backends, jobs and the per-tick visualization payloads.
pub struct World {
    rng: StdRng,
    config: WorldConfig,
    tick: u64,
    pub backends: Vec<BackendInfo>,
    pub jobs: Vec<JobRecord>,
    measurements: FxHashMap<String, MeasurementResults>,
    entanglement: EntanglementData,
    quantum_state: QuantumStateData,
    recommendations: Vec<Recommendation>,
}

impl World {
    pub fn new(config: WorldConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let backends = synth::backends(&mut rng);
        let jobs = synth::jobs(&mut rng, &backends, config.initial_jobs);
        let entanglement = synth::entanglement(&mut rng, VISUAL_QUBITS);
        let quantum_state = synth::quantum_state(&mut rng, VISUAL_QUBITS);
        let recommendations = synth::recommendations(&mut rng, &backends);

        Self {
            rng,
            config,
            tick: 0,
            backends,
            jobs,
            measurements: FxHashMap::default(),
            entanglement,
            quantum_state,
            recommendations,
        }
    }

    /// Number of ticks applied so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance every job one step and refresh the visualization payloads.
    ///
    /// Queued jobs start with probability 1/2, running jobs gain 10-40%
    /// progress and finish at 100%. A new job arrives with probability 1/3.
    pub fn advance(&mut self) {
        self.tick += 1;
        let now = Utc::now();

        for job in &mut self.jobs {
            match job.status {
                JobStatus::Queued => {
                    if self.rng.gen_bool(0.5) {
                        job.status = JobStatus::Running;
                        job.progress = 1;
                    }
                }
                JobStatus::Running => {
                    let step: u8 = self.rng.gen_range(10..=40);
                    job.progress = job.progress.saturating_add(step).min(100);
                    if job.progress == 100 {
                        job.completed_at = Some(now);
                        if self.rng.gen_bool(FAILURE_RATE) {
                            job.status = JobStatus::Failed;
                        } else {
                            job.status = JobStatus::Completed;
                            job.fidelity = Some(self.rng.gen_range(synth::MIN_FIDELITY..1.0));
                        }
                    }
                }
                JobStatus::Completed | JobStatus::Failed => {}
            }
        }

        if self.rng.gen_bool(1.0 / 3.0) {
            let mut fresh = synth::jobs(&mut self.rng, &self.backends, 1);
            for job in &mut fresh {
                job.status = JobStatus::Queued;
                job.progress = 0;
                job.completed_at = None;
                job.fidelity = None;
                job.created_at = Some(now);
            }
            self.jobs.extend(fresh);
        }
        self.evict();

        for backend in &mut self.backends {
            if backend.status.is_online() {
                let delta: i64 = self.rng.gen_range(-2..=2);
                backend.queue_length = (i64::from(backend.queue_length) + delta).clamp(0, 30) as u32;
            }
        }

        self.entanglement = synth::entanglement(&mut self.rng, VISUAL_QUBITS);
        self.quantum_state = synth::quantum_state(&mut self.rng, VISUAL_QUBITS);
        self.recommendations = synth::recommendations(&mut self.rng, &self.backends);
    }

    fn evict(&mut self) {
        while self.jobs.len() > self.config.max_jobs {
            match self.jobs.iter().position(|j| j.status.is_terminal()) {
                Some(idx) => {
                    let job = self.jobs.remove(idx);
                    self.measurements.remove(&job.id);
                }
                None => break,
            }
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        MetricsSnapshot::derive_from(&self.jobs, &self.backends)
    }

    /// Counts for the most recently completed job, generated once per job.
    pub fn latest_measurements(&mut self) -> Option<MeasurementResults> {
        let job = self
            .jobs
            .iter()
            .filter(|j| j.status == JobStatus::Completed)
            .max_by_key(|j| j.completed_at)?
            .clone();
        let rng = &mut self.rng;
        let results = self
            .measurements
            .entry(job.id.clone())
            .or_insert_with(|| synth::measurement_results(rng, job.id.clone(), job.num_qubits, job.shots));
        Some(results.clone())
    }

    pub fn entanglement(&self) -> &EntanglementData {
        &self.entanglement
    }

    pub fn quantum_state(&self) -> &QuantumStateData {
        &self.quantum_state
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }
}
