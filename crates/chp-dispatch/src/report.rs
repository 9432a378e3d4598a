//! Per-backend replay outcomes and their aggregation.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chp_hal::HalError;
use chp_ir::QubitIndex;

/// Unique identifier for one backend's replay run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    /// Generate a fresh run id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A replay failure pinned to the step that raised it.
#[derive(Debug)]
pub struct ReplayFailure {
    /// Zero-based index of the failing operation in the circuit log.
    pub step: usize,
    /// The adapter error.
    pub error: HalError,
}

/// How one backend's replay ended.
#[derive(Debug)]
pub enum ReplayStatus {
    /// Every operation applied.
    Completed,
    /// Qubit allocation failed before any operation ran.
    AllocationFailed(HalError),
    /// An operation failed mid-replay; replay stopped on this backend only.
    Failed(ReplayFailure),
    /// The replay deadline elapsed before the circuit finished.
    Cancelled,
    /// The backend task panicked.
    Panicked(String),
}

impl ReplayStatus {
    /// Whether the full circuit was applied.
    pub fn is_completed(&self) -> bool {
        matches!(self, ReplayStatus::Completed)
    }
}

/// The complete outcome of one backend's replay.
///
/// Always produced, whatever happened: the caller can see for every backend
/// how far it got, how it ended, and what the release path found. No
/// aggregate error ever swallows this.
#[derive(Debug)]
pub struct BackendOutcome {
    /// Name of the backend.
    pub backend: String,
    /// Identifier of this replay run.
    pub run_id: RunId,
    /// Number of operations that applied successfully.
    pub steps_applied: usize,
    /// How the replay ended.
    pub status: ReplayStatus,
    /// Qubits the release check found outside |0⟩ (strict mode only).
    pub release_violations: Vec<QubitIndex>,
    /// Qubits whose release itself errored, with the error.
    pub release_errors: Vec<(QubitIndex, HalError)>,
}

impl BackendOutcome {
    /// Whether the replay completed with a clean release on every qubit.
    pub fn is_success(&self) -> bool {
        self.status.is_completed()
            && self.release_violations.is_empty()
            && self.release_errors.is_empty()
    }

    pub(crate) fn panicked(backend: String, run_id: RunId, message: String) -> Self {
        Self {
            backend,
            run_id,
            steps_applied: 0,
            status: ReplayStatus::Panicked(message),
            release_violations: Vec::new(),
            release_errors: Vec::new(),
        }
    }
}

/// Aggregated outcomes of one circuit across all scheduled backends.
#[derive(Debug, Default)]
pub struct ReplayReport {
    /// One outcome per backend, in scheduling order.
    pub outcomes: Vec<BackendOutcome>,
}

impl ReplayReport {
    /// Whether every backend completed with a clean release.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(BackendOutcome::is_success)
    }

    /// Look up the outcome for a backend by name.
    pub fn outcome(&self, backend: &str) -> Option<&BackendOutcome> {
        self.outcomes.iter().find(|o| o.backend == backend)
    }

    /// Outcomes whose replay did not complete.
    pub fn failures(&self) -> impl Iterator<Item = &BackendOutcome> {
        self.outcomes.iter().filter(|o| !o.status.is_completed())
    }

    /// Total number of release-invariant violations across backends.
    pub fn release_violations(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| o.release_violations.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(backend: &str) -> BackendOutcome {
        BackendOutcome {
            backend: backend.into(),
            run_id: RunId::new(),
            steps_applied: 2,
            status: ReplayStatus::Completed,
            release_violations: Vec::new(),
            release_errors: Vec::new(),
        }
    }

    #[test]
    fn test_success_requires_clean_release() {
        let mut outcome = completed("a");
        assert!(outcome.is_success());

        outcome.release_violations.push(QubitIndex(0));
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_report_lookup_and_failures() {
        let mut failed = completed("b");
        failed.status = ReplayStatus::Failed(ReplayFailure {
            step: 1,
            error: HalError::Backend("boom".into()),
        });

        let report = ReplayReport {
            outcomes: vec![completed("a"), failed],
        };

        assert!(!report.is_success());
        assert!(report.outcome("a").unwrap().is_success());
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.failures().next().unwrap().backend, "b");
        assert!(report.outcome("missing").is_none());
    }

    #[test]
    fn test_run_ids_are_unique() {
        assert_ne!(RunId::new(), RunId::new());
    }
}
