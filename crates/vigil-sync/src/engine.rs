//! The sync engine: best-effort mirroring plus sync-status broadcast.
//!
//! The engine is deliberately decoupled from the local write path: the
//! store persists locally first and then hands the engine a snapshot to
//! mirror in a detached background task.  A slow or failing authority never
//! delays an append.  In-flight attempts are never cancelled; a newer
//! snapshot simply supersedes an older one, and last-write-wins on
//! `SyncState` is intentional.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use vigil_contracts::error::{VigilError, VigilResult};
use vigil_contracts::sync::{LogSnapshot, Submission, SyncState};

use crate::authority::RemoteAuthority;

/// Opaque handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(SyncState) + Send + Sync>;

struct EngineState {
    state: SyncState,
    /// Subscription-order listener registry. Removal is O(n), which is
    /// acceptable for the handful of status badges that subscribe.
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

/// Broadcasts connectivity/sync status and performs the actual transport
/// calls against the remote authority.
///
/// # Listener constraints
///
/// Listeners are invoked while the engine's internal lock is held and must
/// not call back into the engine.
pub struct SyncEngine {
    authority: Arc<dyn RemoteAuthority>,
    inner: Mutex<EngineState>,
}

impl SyncEngine {
    pub fn new(authority: Arc<dyn RemoteAuthority>) -> Self {
        Self {
            authority,
            inner: Mutex::new(EngineState {
                state: SyncState::Idle,
                listeners: Vec::new(),
                next_id: 0,
            }),
        }
    }

    /// The outcome of the most recent attempt against current log contents.
    pub fn state(&self) -> SyncState {
        self.inner.lock().expect("sync engine lock poisoned").state
    }

    /// Register a listener for sync-status changes.
    ///
    /// The listener is invoked once immediately with the current state, then
    /// again on every state change, in subscription order.  Multiple
    /// independent subscribers are supported concurrently.
    pub fn subscribe(&self, listener: impl Fn(SyncState) + Send + Sync + 'static) -> SubscriptionId {
        let mut inner = self.inner.lock().expect("sync engine lock poisoned");
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;

        listener(inner.state);
        inner.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Idempotent: unsubscribing twice is a no-op.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut inner = self.inner.lock().expect("sync engine lock poisoned");
        inner.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    /// Mirror `snapshot` to the remote authority, synchronously.
    ///
    /// No-op when the snapshot holds zero events; `SyncState` is left
    /// untouched.  Otherwise transitions `Syncing` → `Synced` on success or
    /// `Syncing` → `Failed` on any failure.  Never returns an error and
    /// never retries: the durable local copy remains the system of record.
    pub fn sync_now(&self, snapshot: &LogSnapshot) {
        if snapshot.events.is_empty() {
            debug!("sync skipped: no events to mirror");
            return;
        }

        self.set_state(SyncState::Syncing);

        match self.authority.push_snapshot(snapshot) {
            Ok(()) => {
                debug!(
                    attempt_id = %snapshot.attempt_id,
                    event_count = snapshot.events.len(),
                    "trail mirrored to remote authority"
                );
                self.set_state(SyncState::Synced);
            }
            Err(e) => {
                warn!(
                    attempt_id = %snapshot.attempt_id,
                    error = %e,
                    "remote authority unreachable; trail safe in local storage"
                );
                self.set_state(SyncState::Failed);
            }
        }
    }

    /// Mirror `snapshot` in a detached background task and return
    /// immediately.
    ///
    /// Fire-and-forget: overlapping attempts may race, and whichever
    /// finishes last wins on `SyncState`.
    pub fn schedule_sync(self: &Arc<Self>, snapshot: LogSnapshot) {
        let engine = Arc::clone(self);
        std::thread::spawn(move || {
            engine.sync_now(&snapshot);
        });
    }

    /// Deliver the final submission.
    ///
    /// The one transport whose failure is surfaced to the caller: on success
    /// the state becomes `Synced` and the caller may seal the attempt; on
    /// failure the state becomes `Failed` and the error propagates so the
    /// candidate can retry.
    pub fn finalize(&self, submission: &Submission) -> VigilResult<()> {
        self.set_state(SyncState::Syncing);

        match self.authority.submit(submission) {
            Ok(()) => {
                info!(
                    attempt_id = %submission.attempt_id,
                    event_count = submission.events.len(),
                    digest = %submission.digest,
                    "final submission accepted"
                );
                self.set_state(SyncState::Synced);
                Ok(())
            }
            Err(e) => {
                warn!(
                    attempt_id = %submission.attempt_id,
                    error = %e,
                    "final submission rejected"
                );
                self.set_state(SyncState::Failed);
                Err(VigilError::SubmissionFailed {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Return the engine to `Idle`, notifying subscribers.
    ///
    /// Called when the owning attempt is reset.
    pub fn reset(&self) {
        self.set_state(SyncState::Idle);
    }

    fn set_state(&self, state: SyncState) {
        let mut inner = self.inner.lock().expect("sync engine lock poisoned");
        inner.state = state;
        for (_, listener) in &inner.listeners {
            listener(state);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
