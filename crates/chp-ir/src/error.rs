//! Error types for the IR crate.

use crate::qubit::QubitIndex;
use thiserror::Error;

/// Errors that can occur when constructing or decoding operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Wire payload did not match the operation encoding contract.
    #[error("Malformed operation encoding: {0}")]
    Format(String),

    /// Two operands of one gate refer to the same qubit.
    #[error("Duplicate qubit {qubit} in operation (gate: {gate})")]
    DuplicateQubit {
        /// The duplicated qubit.
        qubit: QubitIndex,
        /// Name of the offending gate.
        gate: &'static str,
    },
}

impl From<serde_json::Error> for IrError {
    fn from(err: serde_json::Error) -> Self {
        IrError::Format(err.to_string())
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
