//! Error types for the backend abstraction layer.

use thiserror::Error;

/// Errors that can occur in adapter operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Qubit index outside the backend's active allocation set.
    ///
    /// Fatal for the caller: signals a defect in the driving code, never
    /// retried.
    #[error("Qubit index error: {0}")]
    QubitIndex(String),

    /// Qubit allocation failed.
    #[error("Allocation failed: {0}")]
    Allocation(String),

    /// The adapter has been disposed; no further capability calls succeed.
    #[error("Adapter has been disposed")]
    Disposed,

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Readout is not supported by this backend.
    #[error("Readout not supported: {0}")]
    ReadoutUnsupported(String),

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for adapter operations.
pub type HalResult<T> = Result<T, HalError>;
