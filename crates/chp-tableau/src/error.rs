//! Error types for the tableau engine.

use chp_ir::QubitIndex;
use thiserror::Error;

/// Errors that can occur when driving a tableau.
///
/// Both variants signal a defect in the caller: they are fatal for the
/// current operation and never retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TableauError {
    /// Qubit index outside the allocated range.
    #[error("Qubit index {index} outside the allocated range 0..{num_qubits}")]
    IndexOutOfRange {
        /// The offending index.
        index: u64,
        /// Number of qubits in the tableau.
        num_qubits: usize,
    },

    /// A two-qubit gate was given the same qubit twice.
    #[error("Control and target refer to the same qubit {qubit}")]
    IdenticalOperands {
        /// The duplicated qubit.
        qubit: QubitIndex,
    },
}

/// Result type for tableau operations.
pub type TableauResult<T> = Result<T, TableauError>;
