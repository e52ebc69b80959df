//! Record types exchanged between a quantum job backend and the qdash dashboard.
//!
//! The backend exposes a handful of JSON endpoints (`/api/metrics`,
//! `/api/jobs`, `/api/backends`, ...). Their payloads are flat, loosely
//! shaped records: every field carries a default so that a partial object
//! still decodes, and unknown enum strings collapse to a neutral variant
//! instead of failing the whole payload.
//!
//! The [`synth`] module produces plausible random values for every record
//! type. The dashboard substitutes these when the backend cannot be reached.

pub mod backend;
pub mod endpoint;
pub mod entanglement;
pub mod job;
pub mod lenient;
pub mod measurement;
pub mod metrics;
pub mod probe;
pub mod recommendation;
pub mod state;
pub mod synth;

pub use backend::{BackendInfo, BackendKind, BackendStatus};
pub use endpoint::Endpoint;
pub use entanglement::{EntanglementData, EntangledPair};
pub use job::{JobRecord, JobStatus};
pub use measurement::{MeasurementResults, OutcomeProbability};
pub use metrics::MetricsSnapshot;
pub use probe::TestProbe;
pub use recommendation::{Recommendation, Severity};
pub use state::{BlochVector, CircuitGate, CircuitLayer, CircuitSketch, QuantumStateData, QubitState};
