//! The backend adapter trait and release reporting.
//!
//! # Capability contract
//!
//! [`BackendAdapter`] is the whole of the dispatcher-facing surface:
//!
//! | Method | Kind | Returns |
//! |--------|------|---------|
//! | `name()` | sync | `&str` |
//! | `allocate_qubit()` | async | `HalResult<QubitIndex>` |
//! | `apply_cnot()` | async | `HalResult<()>` |
//! | `apply_hadamard()` | async | `HalResult<()>` |
//! | `apply_phase()` | async | `HalResult<()>` |
//! | `apply_adjoint_phase()` | async | `HalResult<()>` |
//! | `release_qubit()` | async | `HalResult<ReleaseOutcome>` |
//! | `dispose()` | async | `HalResult<()>` |
//! | `apply()` | provided | `HalResult<()>` |
//!
//! ## Design principles
//!
//! - **State privacy**: an adapter exclusively owns its simulation state;
//!   nothing is shared between adapter instances.
//! - **Thread-safe**: the `Send + Sync` bound lets the dispatcher drive
//!   adapters from concurrent tasks through `Arc`.
//! - **Allocation discipline**: `allocate_qubit()` MUST hand out the lowest
//!   free index so every backend driven from the same circuit agrees on
//!   logical qubit numbering; indices are recycled only after release.
//! - **Release never leaks**: `release_qubit()` MUST return the index to
//!   the free pool on every path; a failed zero-state check is reported
//!   through [`ReleaseOutcome`], not by refusing the release.

use async_trait::async_trait;

use chp_ir::{CliffordOperation, QubitIndex};

use crate::error::HalResult;

/// Result of releasing one qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The qubit was released in the initial zero stabilizer state (or the
    /// check was not requested).
    Clean,
    /// The qubit was released anyway, but the zero-state check found it
    /// outside |0⟩. Reported per backend; never aborts siblings.
    OutOfZeroState,
}

impl ReleaseOutcome {
    /// Whether the release passed without an invariant report.
    pub fn is_clean(&self) -> bool {
        matches!(self, ReleaseOutcome::Clean)
    }
}

/// Trait for simulation backends.
///
/// This trait defines the interface that all backends MUST implement. It
/// covers the four Clifford-group operations and the qubit lifecycle:
/// allocation, release and disposal.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Allocate one qubit in |0⟩ and return its index.
    ///
    /// MUST return the lowest index not currently allocated.
    async fn allocate_qubit(&self) -> HalResult<QubitIndex>;

    /// Apply a CNOT with the given control and target.
    async fn apply_cnot(&self, control: QubitIndex, target: QubitIndex) -> HalResult<()>;

    /// Apply a Hadamard on `target`.
    async fn apply_hadamard(&self, target: QubitIndex) -> HalResult<()>;

    /// Apply a phase gate (S) on `target`.
    async fn apply_phase(&self, target: QubitIndex) -> HalResult<()>;

    /// Apply an adjoint phase gate (S†) on `target`.
    async fn apply_adjoint_phase(&self, target: QubitIndex) -> HalResult<()>;

    /// Release a qubit back to the free pool.
    ///
    /// When `enforce_zero` is set, the backend checks whether the qubit was
    /// in the initial zero stabilizer state; a failed check is reported as
    /// [`ReleaseOutcome::OutOfZeroState`] but the release still happens.
    async fn release_qubit(
        &self,
        qubit: QubitIndex,
        enforce_zero: bool,
    ) -> HalResult<ReleaseOutcome>;

    /// Tear down the backend. After disposal every capability call fails
    /// with [`HalError::Disposed`](crate::HalError::Disposed).
    async fn dispose(&self) -> HalResult<()>;

    /// Apply one recorded operation by dispatching on its kind.
    ///
    /// The match is exhaustive over the closed operation set, so a new gate
    /// variant fails to compile here until every adapter is taught about
    /// it.
    async fn apply(&self, op: &CliffordOperation) -> HalResult<()> {
        match *op {
            CliffordOperation::Cnot { control, target } => {
                self.apply_cnot(control, target).await
            }
            CliffordOperation::Hadamard { target } => self.apply_hadamard(target).await,
            CliffordOperation::Phase { target } => self.apply_phase(target).await,
            CliffordOperation::AdjointPhase { target } => {
                self.apply_adjoint_phase(target).await
            }
        }
    }
}

/// Measurement reporting for backends that support it.
///
/// This sits outside [`BackendAdapter`] on purpose: the dispatcher never
/// measures, and readout semantics are owned by each backend. Test
/// harnesses use it to compare outcome statistics across backends.
#[async_trait]
pub trait SampleReadout: Send + Sync {
    /// Measure one qubit in the Z basis, collapsing the backend's state.
    async fn measure_qubit(&self, qubit: QubitIndex) -> HalResult<bool>;
}
