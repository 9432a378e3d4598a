//! The circuit dispatcher: allocate, replay, release.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, warn};

use chp_hal::{BackendAdapter, HalError, HalResult, ReleaseOutcome};
use chp_ir::{CircuitLog, CliffordOperation, QubitIndex};

use crate::error::{DispatchError, DispatchResult};
use crate::report::{BackendOutcome, ReplayFailure, ReplayReport, ReplayStatus, RunId};

/// Replays circuit logs against sets of backends.
///
/// The dispatcher owns no simulation state of its own; it only sequences
/// capability calls and aggregates what comes back. Configuration is
/// builder-style and immutable during a run.
#[derive(Debug, Clone)]
pub struct CircuitDispatcher {
    enforce_zero_on_release: bool,
    dispose_when_done: bool,
    deadline: Option<Duration>,
}

impl CircuitDispatcher {
    /// Create a dispatcher with strict release checking and no deadline.
    pub fn new() -> Self {
        Self {
            enforce_zero_on_release: true,
            dispose_when_done: false,
            deadline: None,
        }
    }

    /// Skip the zero-state check when releasing qubits.
    pub fn without_release_check(mut self) -> Self {
        self.enforce_zero_on_release = false;
        self
    }

    /// Dispose every backend after its release path has run.
    pub fn dispose_when_done(mut self) -> Self {
        self.dispose_when_done = true;
        self
    }

    /// Abort replays that exceed `deadline`. The release path still runs
    /// for every qubit already allocated before the cancellation outcome is
    /// reported.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Allocate `count` qubits on one backend.
    ///
    /// Position `i` of the returned sequence is logical qubit `i`. When an
    /// allocation fails partway, the qubits already obtained are released
    /// again before the error is returned — the backend never leaks.
    pub async fn allocate_qubits(
        &self,
        adapter: &dyn BackendAdapter,
        count: usize,
    ) -> DispatchResult<Vec<QubitIndex>> {
        let mut qubits = Vec::with_capacity(count);
        for _ in 0..count {
            match adapter.allocate_qubit().await {
                Ok(q) => qubits.push(q),
                Err(source) => {
                    release_all(adapter, &qubits, false).await;
                    return Err(DispatchError::Backend {
                        backend: adapter.name().to_string(),
                        source,
                    });
                }
            }
        }
        Ok(qubits)
    }

    /// Release the given qubits on every backend.
    ///
    /// Release always proceeds on every backend regardless of what sibling
    /// backends report; the summaries carry any invariant violations and
    /// release errors per backend.
    pub async fn release_qubits(
        &self,
        adapters: &[Arc<dyn BackendAdapter>],
        qubits: &[QubitIndex],
        enforce_zero: bool,
    ) -> Vec<ReleaseSummary> {
        let mut summaries = Vec::with_capacity(adapters.len());
        for adapter in adapters {
            let (violations, errors) = release_all(adapter.as_ref(), qubits, enforce_zero).await;
            summaries.push(ReleaseSummary {
                backend: adapter.name().to_string(),
                violations,
                errors,
            });
        }
        summaries
    }

    /// Replay `circuit` on every backend, in the circuit's exact program
    /// order per backend, and aggregate the outcomes.
    ///
    /// Backends own disjoint state, so each one runs in its own task; the
    /// only synchronization point is the outcome collection. One backend's
    /// failure stops that backend alone — every other backend finishes its
    /// replay and appears in the report. The call suspends until all
    /// scheduled backends are done (or cancelled by the deadline).
    pub async fn run_on_all(
        &self,
        circuit: &CircuitLog,
        adapters: &[Arc<dyn BackendAdapter>],
    ) -> ReplayReport {
        let circuit = Arc::new(circuit.clone());

        // One task per backend; backends share no state, so the tasks run
        // freely in parallel and only the collection below synchronizes.
        let tasks: Vec<_> = adapters
            .iter()
            .map(|adapter| {
                let run_id = RunId::new();
                let handle = tokio::spawn(replay_one(
                    Arc::clone(adapter),
                    Arc::clone(&circuit),
                    run_id.clone(),
                    self.clone(),
                ));
                (adapter.name().to_string(), run_id, handle)
            })
            .collect();

        // Awaiting in scheduling order keeps the report stable; every task
        // keeps running regardless of which one is being joined.
        let mut outcomes = Vec::with_capacity(tasks.len());
        for (backend, run_id, handle) in tasks {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(join_err) => {
                    // a panicking adapter is a backend failure, not ours
                    warn!(backend = %backend, "replay task panicked: {join_err}");
                    outcomes.push(BackendOutcome::panicked(
                        backend,
                        run_id,
                        join_err.to_string(),
                    ));
                }
            }
        }

        ReplayReport { outcomes }
    }
}

impl Default for CircuitDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Release report for one backend from
/// [`CircuitDispatcher::release_qubits`].
#[derive(Debug)]
pub struct ReleaseSummary {
    /// Name of the backend.
    pub backend: String,
    /// Qubits found outside |0⟩ under strict checking.
    pub violations: Vec<QubitIndex>,
    /// Qubits whose release errored.
    pub errors: Vec<(QubitIndex, HalError)>,
}

/// Drive one backend through allocate → replay → release.
///
/// The release loop is unconditional: it runs after completion, after a
/// mid-replay failure, and after a deadline cancellation alike.
async fn replay_one(
    adapter: Arc<dyn BackendAdapter>,
    circuit: Arc<CircuitLog>,
    run_id: RunId,
    config: CircuitDispatcher,
) -> BackendOutcome {
    let backend = adapter.name().to_string();
    debug!(backend = %backend, run = %run_id, ops = circuit.len(), "starting replay");

    // Allocation phase. A failure here still releases whatever was
    // obtained before it.
    let width = circuit.width();
    let mut qubits = Vec::with_capacity(width);
    let mut alloc_failure = None;
    for _ in 0..width {
        match adapter.allocate_qubit().await {
            Ok(q) => qubits.push(q),
            Err(error) => {
                alloc_failure = Some(error);
                break;
            }
        }
    }

    // Replay phase, bounded by the deadline when one is set. The progress
    // counter survives a cancelled future, so the outcome still reports
    // how far the backend got.
    let progress = Arc::new(AtomicUsize::new(0));
    let status = match alloc_failure {
        Some(error) => ReplayStatus::AllocationFailed(error),
        None => {
            let replay = apply_in_order(adapter.as_ref(), &circuit, &qubits, &progress);
            match config.deadline {
                Some(limit) => match timeout(limit, replay).await {
                    Ok(status) => status,
                    Err(_) => {
                        debug!(backend = %backend, "replay cancelled by deadline");
                        ReplayStatus::Cancelled
                    }
                },
                None => replay.await,
            }
        }
    };
    let steps_applied = progress.load(Ordering::Relaxed);

    // Release phase: unconditional, every exit path.
    let (release_violations, release_errors) =
        release_all(adapter.as_ref(), &qubits, config.enforce_zero_on_release).await;

    if config.dispose_when_done {
        if let Err(error) = adapter.dispose().await {
            warn!(backend = %backend, %error, "dispose failed");
        }
    }

    debug!(backend = %backend, run = %run_id, steps_applied, "replay finished");
    BackendOutcome {
        backend,
        run_id,
        steps_applied,
        status,
        release_violations,
        release_errors,
    }
}

/// Apply every operation in program order, translating logical indices to
/// the backend's allocated qubits.
async fn apply_in_order(
    adapter: &dyn BackendAdapter,
    circuit: &CircuitLog,
    qubits: &[QubitIndex],
    progress: &AtomicUsize,
) -> ReplayStatus {
    for (step, op) in circuit.iter().enumerate() {
        let applied = match *op {
            CliffordOperation::Cnot { control, target } => {
                match (resolve(qubits, control), resolve(qubits, target)) {
                    (Ok(c), Ok(t)) => adapter.apply_cnot(c, t).await,
                    (Err(e), _) | (_, Err(e)) => Err(e),
                }
            }
            CliffordOperation::Hadamard { target } => match resolve(qubits, target) {
                Ok(t) => adapter.apply_hadamard(t).await,
                Err(e) => Err(e),
            },
            CliffordOperation::Phase { target } => match resolve(qubits, target) {
                Ok(t) => adapter.apply_phase(t).await,
                Err(e) => Err(e),
            },
            CliffordOperation::AdjointPhase { target } => match resolve(qubits, target) {
                Ok(t) => adapter.apply_adjoint_phase(t).await,
                Err(e) => Err(e),
            },
        };

        if let Err(error) = applied {
            warn!(step, %error, "operation failed during replay");
            return ReplayStatus::Failed(ReplayFailure { step, error });
        }
        progress.fetch_add(1, Ordering::Relaxed);
    }
    ReplayStatus::Completed
}

/// Translate a logical qubit index into the backend's allocated index.
fn resolve(qubits: &[QubitIndex], logical: QubitIndex) -> HalResult<QubitIndex> {
    qubits.get(logical.0 as usize).copied().ok_or_else(|| {
        HalError::QubitIndex(format!(
            "circuit references logical qubit {logical} outside the allocated width {}",
            qubits.len()
        ))
    })
}

/// Release every listed qubit, collecting violations and errors without
/// stopping.
async fn release_all(
    adapter: &dyn BackendAdapter,
    qubits: &[QubitIndex],
    enforce_zero: bool,
) -> (Vec<QubitIndex>, Vec<(QubitIndex, HalError)>) {
    let mut violations = Vec::new();
    let mut errors = Vec::new();
    for &qubit in qubits {
        match adapter.release_qubit(qubit, enforce_zero).await {
            Ok(ReleaseOutcome::Clean) => {}
            Ok(ReleaseOutcome::OutOfZeroState) => violations.push(qubit),
            Err(error) => errors.push((qubit, error)),
        }
    }
    (violations, errors)
}
