//! # vigil-store
//!
//! Durable, append-only, attempt-scoped audit log store.
//!
//! ## Overview
//!
//! One `SessionStore` owns one attempt: its identity, its sealed flag, and
//! its ordered trail of trust events.  Every append persists the full blob
//! to durable storage synchronously and schedules a best-effort background
//! sync; a successful final submission seals the attempt, after which
//! appends are silently ignored.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vigil_store::{FileStorage, SessionStore};
//!
//! let store = Arc::new(SessionStore::open(
//!     Box::new(FileStorage::new("vigil-session.json")),
//!     sync_engine,
//! ));
//! store.append(EventType::TestStart, EventMetadata::empty(), None);
//! let trail = store.read_all();
//! ```

pub mod backend;
pub mod store;

pub use backend::{FileStorage, MemoryStorage, StorageBackend};
pub use store::SessionStore;

// ── Tests ─────────────────────────────────────────────────────────────────────
