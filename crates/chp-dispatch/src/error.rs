//! Error types for the dispatcher crate.

use chp_hal::HalError;
use thiserror::Error;

/// Errors surfaced by the dispatcher's direct lifecycle operations.
///
/// Replay itself never returns an error: per-backend failures are
/// aggregated into the [`ReplayReport`](crate::ReplayReport) instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DispatchError {
    /// A backend rejected a lifecycle operation.
    #[error("backend {backend}: {source}")]
    Backend {
        /// Name of the backend.
        backend: String,
        /// The underlying adapter error.
        #[source]
        source: HalError,
    },
}

/// Result type for dispatcher operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
