//! Aggregate metrics shown on the dashboard cards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::BackendInfo;
use crate::job::{JobRecord, JobStatus};
use crate::lenient;

/// Nominal wait contributed by each queued job when estimating queue time.
pub const SECONDS_PER_QUEUED_JOB: f64 = 15.0;

/// Point-in-time summary of jobs and backends.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSnapshot {
    /// Jobs currently running.
    pub active_jobs: u32,
    /// Jobs waiting in a queue.
    pub queued_jobs: u32,
    /// Jobs that finished successfully.
    pub completed_jobs: u32,
    /// Jobs that finished with an error.
    pub failed_jobs: u32,
    /// Number of known backends.
    pub total_backends: u32,
    /// Backends currently online.
    pub online_backends: u32,
    /// Mean fidelity across completed jobs (or backend gate fidelity).
    pub avg_fidelity: f64,
    /// completed / (completed + failed), 0 when nothing has finished.
    pub success_rate: f64,
    /// Estimated mean queue wait in seconds.
    pub avg_queue_time_s: f64,
    /// Percentage of backends online.
    pub uptime_percent: f64,
    /// When the snapshot was taken.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl MetricsSnapshot {
    /// Compute a snapshot from job and backend lists.
    pub fn derive_from(jobs: &[JobRecord], backends: &[BackendInfo]) -> Self {
        let count = |status: JobStatus| jobs.iter().filter(|j| j.status == status).count() as u32;

        let completed_jobs = count(JobStatus::Completed);
        let failed_jobs = count(JobStatus::Failed);
        let finished = completed_jobs + failed_jobs;

        let job_fidelities: Vec<f64> = jobs.iter().filter_map(|j| j.fidelity).collect();
        let avg_fidelity = if !job_fidelities.is_empty() {
            mean(&job_fidelities)
        } else {
            let gate: Vec<f64> = backends.iter().map(|b| b.avg_gate_fidelity).collect();
            mean(&gate)
        };

        let online_backends = backends.iter().filter(|b| b.status.is_online()).count() as u32;
        let total_backends = backends.len() as u32;

        let queue_lengths: Vec<f64> = backends.iter().map(|b| f64::from(b.queue_length)).collect();

        Self {
            active_jobs: count(JobStatus::Running),
            queued_jobs: count(JobStatus::Queued),
            completed_jobs,
            failed_jobs,
            total_backends,
            online_backends,
            avg_fidelity,
            success_rate: if finished == 0 {
                0.0
            } else {
                f64::from(completed_jobs) / f64::from(finished)
            },
            avg_queue_time_s: mean(&queue_lengths) * SECONDS_PER_QUEUED_JOB,
            uptime_percent: if total_backends == 0 {
                0.0
            } else {
                f64::from(online_backends) / f64::from(total_backends) * 100.0
            },
            timestamp: Some(Utc::now()),
        }
    }

    /// Total number of jobs counted in the snapshot.
    pub fn total_jobs(&self) -> u32 {
        self.active_jobs + self.queued_jobs + self.completed_jobs + self.failed_jobs
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
