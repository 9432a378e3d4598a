//! Adapter implementation over the sparse engine.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rand::thread_rng;
use tracing::debug;

use chp_hal::{
    AdapterConfig, AdapterFactory, BackendAdapter, HalError, HalResult, ReleaseOutcome,
    SampleReadout,
};
use chp_ir::QubitIndex;

use crate::sparse::SparseState;

// Basis-state keys are u64, one bit per qubit.
const MAX_QUBITS: u64 = 64;

/// Backend adapter backed by a sparse amplitude map.
pub struct SparseAdapter {
    config: AdapterConfig,
    state: Mutex<SpState>,
}

struct SpState {
    engine: SparseState,
    free: BTreeSet<u64>,
    disposed: bool,
}

impl SparseAdapter {
    /// Create an adapter with an empty register.
    pub fn new() -> Self {
        Self {
            config: AdapterConfig::new("sparse"),
            state: Mutex::new(SpState {
                engine: SparseState::new(),
                free: BTreeSet::new(),
                disposed: false,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, SpState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn active_state(&self) -> HalResult<MutexGuard<'_, SpState>> {
        let state = self.state();
        if state.disposed {
            return Err(HalError::Disposed);
        }
        Ok(state)
    }
}

impl SpState {
    fn ensure_active(&self, qubit: QubitIndex) -> HalResult<usize> {
        if qubit.0 >= self.engine.num_qubits() as u64 || self.free.contains(&qubit.0) {
            return Err(HalError::QubitIndex(format!(
                "qubit {qubit} is not in the active allocation set"
            )));
        }
        Ok(qubit.0 as usize)
    }
}

impl Default for SparseAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendAdapter for SparseAdapter {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn allocate_qubit(&self) -> HalResult<QubitIndex> {
        let mut state = self.active_state()?;
        if let Some(index) = state.free.pop_first() {
            return Ok(QubitIndex(index));
        }
        if state.engine.num_qubits() as u64 >= MAX_QUBITS {
            return Err(HalError::Allocation(format!(
                "register already holds {MAX_QUBITS} qubits"
            )));
        }
        let qubit = state.engine.push_qubit();
        debug!(qubit, "allocated sparse qubit");
        Ok(QubitIndex(qubit as u64))
    }

    async fn apply_cnot(&self, control: QubitIndex, target: QubitIndex) -> HalResult<()> {
        let mut state = self.active_state()?;
        let c = state.ensure_active(control)?;
        let t = state.ensure_active(target)?;
        if c == t {
            return Err(HalError::Backend(format!(
                "control and target refer to the same qubit {control}"
            )));
        }
        state.engine.apply_cx(c, t);
        Ok(())
    }

    async fn apply_hadamard(&self, target: QubitIndex) -> HalResult<()> {
        let mut state = self.active_state()?;
        let t = state.ensure_active(target)?;
        state.engine.apply_h(t);
        Ok(())
    }

    async fn apply_phase(&self, target: QubitIndex) -> HalResult<()> {
        let mut state = self.active_state()?;
        let t = state.ensure_active(target)?;
        state.engine.apply_s(t, false);
        Ok(())
    }

    async fn apply_adjoint_phase(&self, target: QubitIndex) -> HalResult<()> {
        let mut state = self.active_state()?;
        let t = state.ensure_active(target)?;
        state.engine.apply_s(t, true);
        Ok(())
    }

    async fn release_qubit(
        &self,
        qubit: QubitIndex,
        enforce_zero: bool,
    ) -> HalResult<ReleaseOutcome> {
        let mut state = self.active_state()?;
        let q = state.ensure_active(qubit)?;

        let clean = !enforce_zero || state.engine.is_zero_state(q);
        state.engine.reset(q, &mut thread_rng());
        state.free.insert(qubit.0);

        if clean {
            Ok(ReleaseOutcome::Clean)
        } else {
            debug!(qubit = %qubit, "released qubit outside |0⟩");
            Ok(ReleaseOutcome::OutOfZeroState)
        }
    }

    async fn dispose(&self) -> HalResult<()> {
        let mut state = self.state();
        state.disposed = true;
        state.engine = SparseState::new();
        state.free.clear();
        debug!("sparse adapter disposed");
        Ok(())
    }
}

#[async_trait]
impl SampleReadout for SparseAdapter {
    async fn measure_qubit(&self, qubit: QubitIndex) -> HalResult<bool> {
        let mut state = self.active_state()?;
        let q = state.ensure_active(qubit)?;
        Ok(state.engine.measure(q, &mut thread_rng()))
    }
}

impl AdapterFactory for SparseAdapter {
    fn from_config(config: AdapterConfig) -> HalResult<Self> {
        let mut adapter = Self::new();
        adapter.config = config;
        Ok(adapter)
    }
}
