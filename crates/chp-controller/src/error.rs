//! Error types for the controller crate.

use thiserror::Error;

/// Errors that can occur in controller collaborators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ControllerError {
    /// Filesystem or stream error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The driver-generation stage rejected its input.
    #[error("Driver generation failed: {0}")]
    DriverGeneration(String),
}

/// Result type for controller operations.
pub type ControllerResult<T> = Result<T, ControllerError>;
