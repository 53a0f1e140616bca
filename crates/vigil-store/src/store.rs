//! The session store: append-only trail plus attempt lifecycle.
//!
//! The store exclusively owns the event sequence and the attempt identity
//! for the process lifetime.  The monitor and the gate only append through
//! `append()`; the sync engine only reads snapshots the store hands it.
//!
//! Write path per append: create event → push → persist the full blob
//! synchronously → schedule a fire-and-forget background sync.  The
//! persisted write is attempted before `append` returns, but a process
//! crash mid-write can still lose it; callers must not assume more.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use vigil_contracts::attempt::{AttemptId, AttemptSession, PersistedAttempt};
use vigil_contracts::error::{VigilError, VigilResult};
use vigil_contracts::event::{AuditEvent, EventMetadata, EventType};
use vigil_contracts::sync::{LogSnapshot, Submission};
use vigil_sync::{trail_digest, SyncEngine};

use crate::backend::StorageBackend;

struct StoreState {
    session: AttemptSession,
    events: Vec<AuditEvent>,
}

/// Durable, append-only record for one attempt.
///
/// Interior state sits behind a `Mutex` so the store can be shared between
/// the session controller, the monitor, and background sync tasks; `append`
/// is atomic with respect to readers; no caller can observe a partially
/// appended event.
pub struct SessionStore {
    backend: Box<dyn StorageBackend>,
    sync: Arc<SyncEngine>,
    state: Mutex<StoreState>,
}

impl SessionStore {
    /// Open the store, restoring `{attemptId, sealed, events}` from the
    /// backend.
    ///
    /// An absent blob starts a fresh attempt; a corrupt or unreadable blob
    /// degrades to a fresh attempt with a warning; construction never
    /// fails on bad storage.
    pub fn open(backend: Box<dyn StorageBackend>, sync: Arc<SyncEngine>) -> Self {
        let state = match backend.load() {
            Ok(Some(persisted)) => {
                info!(
                    attempt_id = %persisted.session.attempt_id,
                    event_count = persisted.events.len(),
                    sealed = persisted.session.sealed,
                    "restored attempt from durable storage"
                );
                StoreState {
                    session: persisted.session,
                    events: persisted.events,
                }
            }
            Ok(None) => StoreState {
                session: AttemptSession::fresh(),
                events: Vec::new(),
            },
            Err(e) => {
                warn!(error = %e, "discarding corrupt storage blob; starting fresh attempt");
                StoreState {
                    session: AttemptSession::fresh(),
                    events: Vec::new(),
                }
            }
        };

        Self {
            backend,
            sync,
            state: Mutex::new(state),
        }
    }

    /// The identity of the current attempt.
    pub fn attempt_id(&self) -> AttemptId {
        self.state.lock().expect("store lock poisoned").session.attempt_id
    }

    /// The current attempt's identity and lifecycle flag together.
    pub fn session(&self) -> AttemptSession {
        self.state.lock().expect("store lock poisoned").session
    }

    /// True once the final submission has succeeded.
    pub fn is_sealed(&self) -> bool {
        self.state.lock().expect("store lock poisoned").session.sealed
    }

    /// Append one trust event.
    ///
    /// Silently ignored (not an error) when the session is sealed.
    /// Otherwise the event is appended, the full snapshot is persisted
    /// before returning, and a background sync attempt is scheduled.
    /// Returns the new event's id, or `None` when sealed.
    pub fn append(
        &self,
        kind: EventType,
        metadata: EventMetadata,
        question_id: Option<String>,
    ) -> Option<String> {
        let snapshot = {
            let mut state = self.state.lock().expect("store lock poisoned");
            if state.session.sealed {
                debug!(kind = %kind, "append ignored: attempt is sealed");
                return None;
            }

            let event = AuditEvent::record(kind, state.session.attempt_id, metadata, question_id);
            state.events.push(event);

            let persisted = PersistedAttempt {
                session: state.session,
                events: state.events.clone(),
            };
            if let Err(e) = self.backend.save(&persisted) {
                // The in-memory trail stays authoritative; keep logging.
                warn!(error = %e, "failed to persist trail snapshot");
            }

            let attempt_id = persisted.session.attempt_id;
            LogSnapshot {
                attempt_id,
                digest: trail_digest(&attempt_id, &persisted.events),
                events: persisted.events,
            }
        };

        let event_id = snapshot.events.last().map(|e| e.id.clone());
        self.sync.schedule_sync(snapshot);
        event_id
    }

    /// A defensive copy of the trail in insertion order.
    pub fn read_all(&self) -> Vec<AuditEvent> {
        self.state.lock().expect("store lock poisoned").events.clone()
    }

    /// Explicitly mirror the current trail now.
    ///
    /// No-op for a sealed attempt (sealed trails travel only via
    /// `finalize`) and for an empty trail.
    pub fn sync_now(&self) {
        let snapshot = {
            let state = self.state.lock().expect("store lock poisoned");
            if state.session.sealed {
                return;
            }
            LogSnapshot {
                attempt_id: state.session.attempt_id,
                digest: trail_digest(&state.session.attempt_id, &state.events),
                events: state.events.clone(),
            }
        };
        self.sync.sync_now(&snapshot);
    }

    /// Transmit `{attemptId, answers, events}` to the remote authority and
    /// seal the attempt.
    ///
    /// On success the session is sealed (subsequent appends become no-ops)
    /// and the sealed blob is persisted.  On failure the session stays
    /// unsealed and the error is returned; this is the one failure that
    /// must reach the candidate, with a retry path.
    pub fn finalize(&self, answers: serde_json::Value) -> VigilResult<()> {
        let submission = {
            let state = self.state.lock().expect("store lock poisoned");
            if state.session.sealed {
                debug!(attempt_id = %state.session.attempt_id, "finalize ignored: already sealed");
                return Ok(());
            }
            Submission {
                attempt_id: state.session.attempt_id,
                answers,
                digest: trail_digest(&state.session.attempt_id, &state.events),
                events: state.events.clone(),
            }
        };

        // The lock is not held across the network call; an event appended
        // meanwhile is simply not part of the final record.
        self.sync.finalize(&submission)?;

        let mut state = self.state.lock().expect("store lock poisoned");
        state.session.sealed = true;

        let persisted = PersistedAttempt {
            session: state.session,
            events: state.events.clone(),
        };
        if let Err(e) = self.backend.save(&persisted) {
            warn!(error = %e, "failed to persist sealed trail");
        }

        info!(
            attempt_id = %state.session.attempt_id,
            event_count = state.events.len(),
            "attempt sealed"
        );
        Ok(())
    }

    /// Discard the current attempt and start a new one.
    ///
    /// Only valid as an explicit user action after completion or
    /// abandonment, never mid-assessment.  Mints a new attempt id, clears
    /// durable storage, and returns the sync engine to idle.
    pub fn reset(&self) -> VigilResult<()> {
        let mut state = self.state.lock().expect("store lock poisoned");
        let previous = state.session.attempt_id;

        state.session = AttemptSession::fresh();
        state.events.clear();

        self.backend.clear().map_err(|e| VigilError::StorageFailed {
            reason: format!("failed to clear storage on reset: {}", e),
        })?;
        self.backend.save(&PersistedAttempt {
            session: state.session,
            events: Vec::new(),
        })?;

        self.sync.reset();

        info!(
            previous_attempt = %previous,
            new_attempt = %state.session.attempt_id,
            "attempt reset"
        );
        Ok(())
    }

    /// Tamper-evidence commitment to the current trail.
    pub fn digest(&self) -> String {
        let state = self.state.lock().expect("store lock poisoned");
        trail_digest(&state.session.attempt_id, &state.events)
    }
}
