//! Tamper-evidence digest over an audit trail.
//!
//! The digest is a compact SHA-256 commitment to the full trail, carried in
//! every snapshot and submission payload so the remote authority can detect
//! divergence between mirrors of the same attempt.
//!
//! Hash input layout (bytes, in order):
//!   1. attempt id as UTF-8 bytes
//!   2. for each event in insertion order, the canonical JSON of the event
//!      (serde_json with no pretty-printing)

use sha2::{Digest, Sha256};

use vigil_contracts::attempt::AttemptId;
use vigil_contracts::event::AuditEvent;

/// Compute the SHA-256 commitment for a trail.
///
/// Deterministic and order-sensitive: reordering, dropping, or editing any
/// event produces a different digest.  Returns a lowercase 64-character hex
/// string; the digest of an empty trail commits to the attempt id alone.
///
/// # Panics
///
/// Panics if an event cannot be serialized to JSON, which cannot happen
/// for the well-formed `AuditEvent` type.
pub fn trail_digest(attempt_id: &AttemptId, events: &[AuditEvent]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(attempt_id.to_string().as_bytes());

    for event in events {
        let event_json =
            serde_json::to_vec(event).expect("AuditEvent must always be serializable to JSON");
        hasher.update(&event_json);
    }

    hex::encode(hasher.finalize())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
