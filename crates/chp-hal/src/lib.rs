//! CHP Backend Abstraction Layer
//!
//! This crate defines the capability contract every simulation backend must
//! satisfy to be driven by the circuit dispatcher, independent of how the
//! backend represents quantum state internally.
//!
//! # Overview
//!
//! - A common [`BackendAdapter`] trait covering exactly the capability set
//!   the dispatcher uses: the four Clifford gates, qubit allocation and
//!   release, and disposal
//! - [`ReleaseOutcome`] for the release-invariant report
//! - [`SampleReadout`] for backends that expose measurement through their
//!   own reporting (never called by the dispatcher)
//! - [`AdapterConfig`] / [`AdapterFactory`] for composition-time
//!   construction from configuration
//!
//! # Contract
//!
//! The dispatcher is fully agnostic to internal representation. A
//! stabilizer tableau, a dense state vector and a sparse amplitude map all
//! sit behind the same trait; the dispatcher only observes success or
//! failure of capability calls. Each adapter exclusively owns its state, so
//! distinct adapters may be driven concurrently without shared locking.
//!
//! # Implementing an Adapter
//!
//! ```ignore
//! use chp_hal::{AdapterConfig, BackendAdapter, HalResult, ReleaseOutcome};
//! use chp_ir::QubitIndex;
//! use async_trait::async_trait;
//!
//! struct MyAdapter { /* private state */ }
//!
//! #[async_trait]
//! impl BackendAdapter for MyAdapter {
//!     fn name(&self) -> &str { "my_adapter" }
//!
//!     async fn allocate_qubit(&self) -> HalResult<QubitIndex> {
//!         # todo!()
//!     }
//!
//!     async fn apply_cnot(&self, control: QubitIndex, target: QubitIndex) -> HalResult<()> {
//!         # todo!()
//!     }
//!
//!     // ... remaining capabilities
//!     # async fn apply_hadamard(&self, target: QubitIndex) -> HalResult<()> { todo!() }
//!     # async fn apply_phase(&self, target: QubitIndex) -> HalResult<()> { todo!() }
//!     # async fn apply_adjoint_phase(&self, target: QubitIndex) -> HalResult<()> { todo!() }
//!     # async fn release_qubit(&self, qubit: QubitIndex, enforce_zero: bool) -> HalResult<ReleaseOutcome> { todo!() }
//!     # async fn dispose(&self) -> HalResult<()> { todo!() }
//! }
//! ```

pub mod adapter;
pub mod config;
pub mod error;

pub use adapter::{BackendAdapter, ReleaseOutcome, SampleReadout};
pub use config::{AdapterConfig, AdapterFactory};
pub use error::{HalError, HalResult};
