//! The remote authority seam.
//!
//! VIGIL talks to exactly two remote endpoints: the sync endpoint, which
//! mirrors the current trail best-effort, and the submission endpoint, which
//! receives the final record of truth.  Both are modeled behind one trait so
//! hosts can plug in their transport and tests can script failures.

use vigil_contracts::error::VigilResult;
use vigil_contracts::sync::{LogSnapshot, Submission};

/// Transport to the remote authority.
///
/// Implementations are expected to map any transport error or non-success
/// response to `Err`; the engine treats every `Err` identically as a sync
/// or submission failure.
pub trait RemoteAuthority: Send + Sync {
    /// Mirror the current trail snapshot to the sync endpoint.
    ///
    /// Advisory: the caller never retries automatically, and a later
    /// snapshot simply supersedes this one.
    fn push_snapshot(&self, snapshot: &LogSnapshot) -> VigilResult<()>;

    /// Deliver the final submission. Success seals the attempt on the
    /// caller's side; failure must be surfaced to the candidate.
    fn submit(&self, submission: &Submission) -> VigilResult<()>;
}
