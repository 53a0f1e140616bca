//! # vigil-sync
//!
//! Best-effort mirroring of the audit trail to a remote authority,
//! decoupled from the local write path.
//!
//! ## Overview
//!
//! Sync is advisory, not authoritative: the durable local copy owned by the
//! store is the system of record until the final submission succeeds.  The
//! engine mirrors snapshots outward in detached background tasks, broadcasts
//! `SyncState` to any number of subscribers, and never blocks or fails the
//! caller of an append.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vigil_sync::{SyncEngine, RemoteAuthority};
//!
//! let engine = Arc::new(SyncEngine::new(authority));
//! let sub = engine.subscribe(|state| badge.update(state));
//! engine.schedule_sync(snapshot);   // fire-and-forget
//! engine.unsubscribe(sub);
//! ```

pub mod authority;
pub mod digest;
pub mod engine;

pub use authority::RemoteAuthority;
pub use digest::trail_digest;
pub use engine::{SubscriptionId, SyncEngine};
