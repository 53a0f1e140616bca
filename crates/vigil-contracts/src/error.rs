//! Runtime error types for the VIGIL proctoring pipeline.
//!
//! All fallible operations in VIGIL return `VigilResult<T>`.  The taxonomy
//! mirrors the failure policy: only `SubmissionFailed` is surfaced to the
//! candidate; everything else degrades gracefully and is observable only
//! through log entries and status indicators.

use thiserror::Error;

/// The unified error type for the VIGIL runtime.
#[derive(Debug, Error)]
pub enum VigilError {
    /// The final submission to the remote authority was rejected or the
    /// transport failed.
    ///
    /// This is the one error a candidate must see; it represents potential
    /// loss of the final record of truth and must remain retryable.
    #[error("submission failed: {reason}")]
    SubmissionFailed { reason: String },

    /// A best-effort sync attempt against the remote authority failed.
    ///
    /// Advisory only: callers observe this through `SyncState`, never as a
    /// blocking error.
    #[error("sync failed: {reason}")]
    SyncFailed { reason: String },

    /// Durable local storage could not be read or written.
    #[error("storage failure: {reason}")]
    StorageFailed { reason: String },

    /// A session operation was invoked in a phase that does not permit it.
    #[error("session state error: {reason}")]
    StateMachine { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Convenience alias used throughout the VIGIL crates.
pub type VigilResult<T> = Result<T, VigilError>;
