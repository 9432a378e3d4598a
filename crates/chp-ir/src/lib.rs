//! CHP Circuit Representation
//!
//! This crate provides the canonical operation model shared by every CHP
//! component: the compiler front end records circuits in this form, the
//! dispatcher replays them, and simulation backends consume them.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitIndex`] for addressing qubits within a backend's
//!   allocation set
//! - **Operations**: [`CliffordOperation`], a closed set of Clifford-group
//!   gates (CNOT, Hadamard, Phase, adjoint Phase)
//! - **Circuit log**: [`CircuitLog`], an append-only recording of operations
//!   in program order
//! - **Wire codec**: [`codec`], the stable single-key JSON encoding used to
//!   interoperate with the compiler and the driver-generation stage
//!
//! # Example: Recording a Bell Circuit
//!
//! ```rust
//! use chp_ir::{CircuitLog, CliffordOperation};
//!
//! let mut log = CircuitLog::new();
//! log.record(CliffordOperation::hadamard(0));
//! log.record(CliffordOperation::cnot(0, 1).unwrap());
//!
//! assert_eq!(log.len(), 2);
//! assert_eq!(log.width(), 2);
//! ```
//!
//! # Wire Form
//!
//! Each operation encodes as a single-key JSON object. The key is the
//! variant name; `Cnot` carries a `[control, target]` pair, every other
//! variant a single unsigned 64-bit index:
//!
//! ```rust
//! use chp_ir::{CliffordOperation, codec};
//!
//! let op = CliffordOperation::cnot(0, 1).unwrap();
//! assert_eq!(codec::encode(&op).unwrap(), r#"{"Cnot":[0,1]}"#);
//!
//! let h = CliffordOperation::hadamard(3);
//! assert_eq!(codec::encode(&h).unwrap(), r#"{"Hadamard":3}"#);
//! ```
//!
//! The encoding is an interop contract: decoding rejects any deviation
//! (unknown key, wrong arity, wrong value type, trailing keys) with
//! [`IrError::Format`] rather than coercing it.

pub mod circuit;
pub mod codec;
pub mod error;
pub mod operation;
pub mod qubit;

pub use circuit::CircuitLog;
pub use error::{IrError, IrResult};
pub use operation::CliffordOperation;
pub use qubit::QubitIndex;
