//! Adapter implementation over the tableau engine.

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
use chp_tableau::{Tableau, TableauError};

/// Backend adapter backed by a stabilizer tableau.
///
/// All state is private and lives behind one mutex; gate application within
/// the adapter is strictly sequential because every tableau update depends
/// on the full prior state.
pub struct StabilizerAdapter {
    config: AdapterConfig,
    state: Mutex<StabState>,
}

struct StabState {
    tableau: Tableau,
    free: BTreeSet<u64>,
    disposed: bool,
}

impl StabilizerAdapter {
    /// Create an adapter with an empty register.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an adapter with `capacity` unallocated qubits prepared.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            config: AdapterConfig::new("stabilizer"),
            state: Mutex::new(StabState {
                tableau: Tableau::new(capacity),
                free: (0..capacity as u64).collect(),
                disposed: false,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, StabState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn active_state(&self) -> HalResult<MutexGuard<'_, StabState>> {
        let state = self.state();
        if state.disposed {
            return Err(HalError::Disposed);
        }
        Ok(state)
    }
}

impl StabState {
    /// Reject indices never allocated or already back in the free pool.
    fn ensure_active(&self, qubit: QubitIndex) -> HalResult<()> {
        if qubit.0 >= self.tableau.num_qubits() as u64 || self.free.contains(&qubit.0) {
            return Err(HalError::QubitIndex(format!(
                "qubit {qubit} is not in the active allocation set"
            )));
        }
        Ok(())
    }
}

impl Default for StabilizerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn hal_err(err: TableauError) -> HalError {
    match err {
        TableauError::IndexOutOfRange { .. } => HalError::QubitIndex(err.to_string()),
        other => HalError::Backend(other.to_string()),
    }
}

#[async_trait]
impl BackendAdapter for StabilizerAdapter {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn allocate_qubit(&self) -> HalResult<QubitIndex> {
        let mut state = self.active_state()?;
        let qubit = match state.free.pop_first() {
            // recycled indices were reset to |0⟩ on release
            Some(index) => QubitIndex(index),
            None => state.tableau.push_qubit(),
        };
        debug!(qubit = %qubit, "allocated stabilizer qubit");
        Ok(qubit)
    }

    async fn apply_cnot(&self, control: QubitIndex, target: QubitIndex) -> HalResult<()> {
        let mut state = self.active_state()?;
        state.ensure_active(control)?;
        state.ensure_active(target)?;
        state.tableau.apply_cnot(control, target).map_err(hal_err)
    }

    async fn apply_hadamard(&self, target: QubitIndex) -> HalResult<()> {
        let mut state = self.active_state()?;
        state.ensure_active(target)?;
        state.tableau.apply_hadamard(target).map_err(hal_err)
    }

    async fn apply_phase(&self, target: QubitIndex) -> HalResult<()> {
        let mut state = self.active_state()?;
        state.ensure_active(target)?;
        state.tableau.apply_phase(target).map_err(hal_err)
    }

    async fn apply_adjoint_phase(&self, target: QubitIndex) -> HalResult<()> {
        let mut state = self.active_state()?;
        state.ensure_active(target)?;
        state.tableau.apply_adjoint_phase(target).map_err(hal_err)
    }

    async fn release_qubit(
        &self,
        qubit: QubitIndex,
        enforce_zero: bool,
    ) -> HalResult<ReleaseOutcome> {
        let mut state = self.active_state()?;
        state.ensure_active(qubit)?;

        let clean = if enforce_zero {
            state.tableau.is_zero_state(qubit).map_err(hal_err)?
        } else {
            true
        };

        // reset before recycling so the next allocation hands out |0⟩
        state
            .tableau
            .reset(qubit, &mut thread_rng())
            .map_err(hal_err)?;
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
        state.tableau = Tableau::new(0);
        state.free.clear();
        debug!("stabilizer adapter disposed");
        Ok(())
    }
}

#[async_trait]
impl SampleReadout for StabilizerAdapter {
    async fn measure_qubit(&self, qubit: QubitIndex) -> HalResult<bool> {
        let mut state = self.active_state()?;
        state.ensure_active(qubit)?;
        state.tableau.measure(qubit, &mut thread_rng()).map_err(hal_err)
    }
}

impl AdapterFactory for StabilizerAdapter {
    fn from_config(config: AdapterConfig) -> HalResult<Self> {
        let capacity = config.extra_u64("initial_qubits").unwrap_or(0) as usize;
        let mut adapter = Self::with_capacity(capacity);
        adapter.config = config;
        Ok(adapter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_allocation_is_dense_and_ascending() {
        let adapter = StabilizerAdapter::new();
        for expected in 0..4_u64 {
            assert_eq!(adapter.allocate_qubit().await.unwrap(), QubitIndex(expected));
        }
    }

    #[tokio::test]
    async fn test_released_index_is_recycled_lowest_first() {
        let adapter = StabilizerAdapter::new();
        for _ in 0..3 {
            adapter.allocate_qubit().await.unwrap();
        }
        adapter
            .release_qubit(QubitIndex(1), true)
            .await
            .unwrap();
        assert_eq!(adapter.allocate_qubit().await.unwrap(), QubitIndex(1));
        assert_eq!(adapter.allocate_qubit().await.unwrap(), QubitIndex(3));
    }

    #[tokio::test]
    async fn test_ops_on_unallocated_qubit_fail() {
        let adapter = StabilizerAdapter::new();
        adapter.allocate_qubit().await.unwrap();
        assert!(matches!(
            adapter.apply_hadamard(QubitIndex(1)).await,
            Err(HalError::QubitIndex(_))
        ));

        adapter.release_qubit(QubitIndex(0), true).await.unwrap();
        assert!(adapter.apply_phase(QubitIndex(0)).await.is_err());
    }

    #[tokio::test]
    async fn test_release_reports_out_of_zero_state() {
        let adapter = StabilizerAdapter::new();
        let q = adapter.allocate_qubit().await.unwrap();
        adapter.apply_hadamard(q).await.unwrap();

        let outcome = adapter.release_qubit(q, true).await.unwrap();
        assert_eq!(outcome, ReleaseOutcome::OutOfZeroState);

        // the release still happened and the recycled qubit is |0⟩ again
        let q2 = adapter.allocate_qubit().await.unwrap();
        assert_eq!(q2, q);
        assert_eq!(
            adapter.release_qubit(q2, true).await.unwrap(),
            ReleaseOutcome::Clean
        );
    }

    #[tokio::test]
    async fn test_release_without_check_never_reports() {
        let adapter = StabilizerAdapter::new();
        let q = adapter.allocate_qubit().await.unwrap();
        adapter.apply_hadamard(q).await.unwrap();
        assert_eq!(
            adapter.release_qubit(q, false).await.unwrap(),
            ReleaseOutcome::Clean
        );
    }

    #[tokio::test]
    async fn test_disposed_adapter_rejects_everything() {
        let adapter = StabilizerAdapter::new();
        let q = adapter.allocate_qubit().await.unwrap();
        adapter.dispose().await.unwrap();

        assert!(matches!(
            adapter.allocate_qubit().await,
            Err(HalError::Disposed)
        ));
        assert!(matches!(
            adapter.apply_hadamard(q).await,
            Err(HalError::Disposed)
        ));
        assert!(matches!(
            adapter.release_qubit(q, true).await,
            Err(HalError::Disposed)
        ));
    }

    #[tokio::test]
    async fn test_bell_measurements_correlate() {
        for _ in 0..32 {
            let adapter = StabilizerAdapter::new();
            let a = adapter.allocate_qubit().await.unwrap();
            let b = adapter.allocate_qubit().await.unwrap();
            adapter.apply_hadamard(a).await.unwrap();
            adapter.apply_cnot(a, b).await.unwrap();

            let first = adapter.measure_qubit(a).await.unwrap();
            let second = adapter.measure_qubit(b).await.unwrap();
            assert_eq!(first, second);
        }
    }

    #[tokio::test]
    async fn test_from_config_preallocates() {
        let config = AdapterConfig::new("stab").with_extra("initial_qubits", serde_json::json!(2));
        let adapter = StabilizerAdapter::from_config(config).unwrap();
        assert_eq!(adapter.name(), "stab");
        assert_eq!(adapter.allocate_qubit().await.unwrap(), QubitIndex(0));
        assert_eq!(adapter.allocate_qubit().await.unwrap(), QubitIndex(1));
        assert_eq!(adapter.allocate_qubit().await.unwrap(), QubitIndex(2));
    }
}
