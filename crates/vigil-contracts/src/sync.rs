//! Sync status and the payloads sent to the remote authority.

use serde::{Deserialize, Serialize};

use crate::attempt::AttemptId;
use crate::event::AuditEvent;

/// Outcome of the most recent sync attempt against the current log contents.
///
/// Process-wide and never persisted; this is not a per-event delivery
/// status. Last-write-wins when background attempts overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    Idle,
    Syncing,
    Synced,
    Failed,
}

/// The full current log snapshot mirrored to the remote sync endpoint.
///
/// May already be stale by the time transmission completes; acceptable,
/// since finalization always sends the final, complete snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSnapshot {
    pub attempt_id: AttemptId,
    pub events: Vec<AuditEvent>,
    /// SHA-256 commitment to the trail contents (see `vigil-sync::digest`).
    pub digest: String,
}

/// The final record of truth sent to the remote submission endpoint.
///
/// A successful transmission seals the attempt; failure must be surfaced
/// to the candidate as a retryable error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub attempt_id: AttemptId,
    /// Opaque candidate answers, keyed by question id.
    pub answers: serde_json::Value,
    pub events: Vec<AuditEvent>,
    pub digest: String,
}
