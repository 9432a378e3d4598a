//! Adapter implementation over the dense engine.

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

use crate::statevector::Statevector;

const DEFAULT_MAX_QUBITS: u64 = 20;

/// Backend adapter backed by a dense state vector.
///
/// Supports registers up to `max_qubits` (limited by the 2^n amplitude
/// vector). Released indices are reset to |0⟩ and recycled lowest-first.
pub struct StatevectorAdapter {
    config: AdapterConfig,
    max_qubits: u64,
    state: Mutex<SvState>,
}

struct SvState {
    engine: Statevector,
    free: BTreeSet<u64>,
    disposed: bool,
}

impl StatevectorAdapter {
    /// Create an adapter with the default qubit cap.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create an adapter with a custom qubit cap.
    pub fn with_max_qubits(max_qubits: u64) -> Self {
        Self {
            config: AdapterConfig::new("statevector"),
            max_qubits,
            state: Mutex::new(SvState {
                engine: Statevector::new(),
                free: BTreeSet::new(),
                disposed: false,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, SvState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn active_state(&self) -> HalResult<MutexGuard<'_, SvState>> {
        let state = self.state();
        if state.disposed {
            return Err(HalError::Disposed);
        }
        Ok(state)
    }
}

impl SvState {
    fn ensure_active(&self, qubit: QubitIndex) -> HalResult<usize> {
        if qubit.0 >= self.engine.num_qubits() as u64 || self.free.contains(&qubit.0) {
            return Err(HalError::QubitIndex(format!(
                "qubit {qubit} is not in the active allocation set"
            )));
        }
        Ok(qubit.0 as usize)
    }
}

impl Default for StatevectorAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendAdapter for StatevectorAdapter {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn allocate_qubit(&self) -> HalResult<QubitIndex> {
        let mut state = self.active_state()?;
        if let Some(index) = state.free.pop_first() {
            return Ok(QubitIndex(index));
        }
        if state.engine.num_qubits() as u64 >= self.max_qubits {
            return Err(HalError::Allocation(format!(
                "register already holds {} qubits (cap {})",
                state.engine.num_qubits(),
                self.max_qubits
            )));
        }
        let qubit = state.engine.push_qubit();
        debug!(qubit, "allocated statevector qubit");
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
        state.engine = Statevector::new();
        state.free.clear();
        debug!("statevector adapter disposed");
        Ok(())
    }
}

#[async_trait]
impl SampleReadout for StatevectorAdapter {
    async fn measure_qubit(&self, qubit: QubitIndex) -> HalResult<bool> {
        let mut state = self.active_state()?;
        let q = state.ensure_active(qubit)?;
        Ok(state.engine.measure(q, &mut thread_rng()))
    }
}

impl AdapterFactory for StatevectorAdapter {
    fn from_config(config: AdapterConfig) -> HalResult<Self> {
        let max_qubits = config.extra_u64("max_qubits").unwrap_or(DEFAULT_MAX_QUBITS);
        let mut adapter = Self::with_max_qubits(max_qubits);
        adapter.config = config;
        Ok(adapter)
    }
}
