//! Attempt identity and the persisted session blob.
//!
//! One `AttemptId` identifies one candidate's run through the assessment.
//! Ids are generated at session start (or session reset) and never reused
//! within a browser profile; a reset always mints a fresh id rather than
//! unsealing the old one.

use serde::{Deserialize, Serialize};

use crate::event::AuditEvent;

/// Unique identifier for a single assessment attempt.
///
/// Appears in every audit event and in every payload sent to the remote
/// authority. Serializes as the hyphenated UUID string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptId(pub uuid::Uuid);

impl AttemptId {
    /// Create a new, unique attempt ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for AttemptId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AttemptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identity and lifecycle flag for one attempt.
///
/// `sealed` is false while the assessment is live and permanently true after
/// a successful final submission. Once sealed, the associated audit trail
/// accepts no further appends.  `sealed` defaults so that blobs written by
/// older builds (which omitted the flag) still restore.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSession {
    pub attempt_id: AttemptId,
    #[serde(default)]
    pub sealed: bool,
}

impl AttemptSession {
    /// A fresh, unsealed session with a brand-new id.
    pub fn fresh() -> Self {
        Self {
            attempt_id: AttemptId::new(),
            sealed: false,
        }
    }
}

/// The single keyed blob written to durable local storage.
///
/// Read once at store construction and overwritten on every append and on
/// reset.  The session fields flatten into the blob root, keeping the
/// `{attemptId, sealed, events}` wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedAttempt {
    #[serde(flatten)]
    pub session: AttemptSession,
    #[serde(default)]
    pub events: Vec<AuditEvent>,
}
