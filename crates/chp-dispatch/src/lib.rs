//! CHP Circuit Dispatcher
//!
//! Replays one recorded circuit against any number of interchangeable
//! simulation backends and enforces the qubit-lifecycle discipline around
//! the replay.
//!
//! # Overview
//!
//! - [`CircuitDispatcher`] drives every adapter through allocate → replay →
//!   release, one concurrent task per backend
//! - [`ReplayReport`] / [`BackendOutcome`] aggregate per-backend results;
//!   one backend's failure never hides another backend's outcome
//! - Release runs on **every** exit path — completion, mid-replay failure,
//!   cancellation — so backends never leak qubits
//!
//! # Ordering model
//!
//! Within one backend, operations apply strictly in the circuit's program
//! order: tableau updates depend on the full prior state and are not
//! reorderable. Across backends there is no ordering requirement at all —
//! each adapter exclusively owns its state, so the per-backend tasks run
//! freely in parallel and only the outcome collection is synchronized.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use chp_dispatch::CircuitDispatcher;
//! use chp_hal::BackendAdapter;
//! use chp_ir::CircuitLog;
//! use chp_adapter_stabilizer::StabilizerAdapter;
//! use chp_adapter_statevector::StatevectorAdapter;
//!
//! #[tokio::main]
//! async fn main() {
//!     let adapters: Vec<Arc<dyn BackendAdapter>> = vec![
//!         Arc::new(StabilizerAdapter::new()),
//!         Arc::new(StatevectorAdapter::new()),
//!     ];
//!
//!     let report = CircuitDispatcher::new()
//!         .run_on_all(&CircuitLog::bell(), &adapters)
//!         .await;
//!
//!     for outcome in &report.outcomes {
//!         println!("{}: {:?}", outcome.backend, outcome.status);
//!     }
//! }
//! ```

pub mod dispatcher;
pub mod error;
pub mod report;

pub use dispatcher::{CircuitDispatcher, ReleaseSummary};
pub use error::{DispatchError, DispatchResult};
pub use report::{BackendOutcome, ReplayFailure, ReplayReport, ReplayStatus, RunId};
