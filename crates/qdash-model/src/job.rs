//! Job descriptors.
//!
//! The dashboard only observes jobs; it never drives them. The status moves
//! forward on the backend:
//!
//! ```text
//!   Queued ──→ Running ──→ Completed
//!                 │
//!                 └──→ Failed
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lenient;

/// Status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "serde_json::Value")]
pub enum JobStatus {
    /// Job is waiting in a backend queue.
    #[default]
    Queued,
    /// Job is executing.
    Running,
    /// Job finished successfully.
    Completed,
    /// Job finished with an error.
    Failed,
}

impl JobStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Queued,
        JobStatus::Running,
        JobStatus::Completed,
        JobStatus::Failed,
    ];

    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Check if the job is still in flight (queued or running).
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl From<serde_json::Value> for JobStatus {
    fn from(value: serde_json::Value) -> Self {
        value.as_str().map(Self::from).unwrap_or_default()
    }
}

impl From<&str> for JobStatus {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "running" | "executing" => JobStatus::Running,
            "completed" | "done" | "succeeded" => JobStatus::Completed,
            "failed" | "error" | "cancelled" => JobStatus::Failed,
            _ => JobStatus::Queued,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of quantum work as reported by the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobRecord {
    /// Job identifier.
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    /// Human-readable job name.
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    /// Backend the job runs on.
    #[serde(deserialize_with = "lenient::text")]
    pub backend: String,
    /// Current status.
    pub status: JobStatus,
    /// Circuit width.
    #[serde(deserialize_with = "lenient::count")]
    pub num_qubits: u32,
    /// Requested shots.
    #[serde(deserialize_with = "lenient::count")]
    pub shots: u32,
    /// Progress percentage (0-100).
    #[serde(deserialize_with = "lenient::percent")]
    pub progress: u8,
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// Completion time, set once the job is terminal.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Result fidelity in [0, 1] for completed jobs.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub fidelity: Option<f64>,
}

impl JobRecord {
    /// Create a queued job.
    pub fn new(id: impl Into<String>, backend: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            backend: backend.into(),
            created_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    /// Time spent between creation and completion, if both are known.
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.created_at, self.completed_at) {
            (Some(start), Some(end)) if end >= start => Some(end - start),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_predicates() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Queued.is_active());
        assert!(JobStatus::Running.is_active());
    }

    #[test]
    fn test_unknown_status_decodes_as_queued() {
        let job: JobRecord = serde_json::from_str(r#"{"id": "j1", "status": "pending"}"#).unwrap();
        assert_eq!(job.status, JobStatus::Queued);
    }

    #[test]
    fn test_naive_isoformat_timestamp_decodes_as_utc() {
        let jobs: Vec<JobRecord> = serde_json::from_str(
            r#"[{"id": "j1", "created_at": "2024-05-01T12:00:00.123456", "completed_at": "soon"}]"#,
        )
        .unwrap();
        let created = jobs[0].created_at.unwrap();
        assert_eq!(created.to_rfc3339(), "2024-05-01T12:00:00.123456+00:00");
        assert!(jobs[0].completed_at.is_none());
    }

    #[test]
    fn test_float_progress_is_rounded_and_clamped() {
        let jobs: Vec<JobRecord> = serde_json::from_str(
            r#"[{"progress": 42.5}, {"progress": 180}, {"progress": -3}, {"progress": "77"}]"#,
        )
        .unwrap();
        let progress: Vec<u8> = jobs.iter().map(|j| j.progress).collect();
        assert_eq!(progress, vec![43, 100, 0, 77]);
    }

    #[test]
    fn test_null_or_numeric_status_is_queued() {
        let jobs: Vec<JobRecord> =
            serde_json::from_str(r#"[{"status": null}, {"status": 3}, {"status": "running"}]"#)
                .unwrap();
        assert_eq!(jobs[0].status, JobStatus::Queued);
        assert_eq!(jobs[1].status, JobStatus::Queued);
        assert_eq!(jobs[2].status, JobStatus::Running);
    }

    #[test]
    fn test_mistyped_fields_fall_back_to_defaults() {
        let job: JobRecord = serde_json::from_str(
            r#"{"id": 17, "backend": null, "shots": 1024.0, "num_qubits": "x", "fidelity": "high"}"#,
        )
        .unwrap();
        assert_eq!(job.id, "17");
        assert_eq!(job.backend, "");
        assert_eq!(job.shots, 1024);
        assert_eq!(job.num_qubits, 0);
        assert!(job.fidelity.is_none());
    }

    #[test]
    fn test_status_aliases() {
        let job: JobRecord = serde_json::from_str(r#"{"status": "DONE"}"#).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
    }

    #[test]
    fn test_status_round_trips_lowercase() {
        let mut job = JobRecord::new("j2", "sim");
        job.status = JobStatus::Running;
        let v = serde_json::to_value(&job).unwrap();
        assert_eq!(v["status"], "running");
        assert!(v.get("completed_at").is_none());
    }

    #[test]
    fn test_duration() {
        let mut job = JobRecord::new("j3", "sim");
        let start = job.created_at.unwrap();
        job.completed_at = Some(start + chrono::Duration::seconds(42));
        assert_eq!(job.duration().unwrap().num_seconds(), 42);

        job.completed_at = Some(start - chrono::Duration::seconds(1));
        assert!(job.duration().is_none());
    }
}
