//! Durable storage backends.
//!
//! The store is the single writer to durable storage: one keyed blob
//! containing `{attemptId, sealed, events}`, read once at construction and
//! overwritten on every append and on reset.  Backends report failures
//! honestly; the degrade-to-fresh policy on corruption lives in the store,
//! not here.

use std::path::PathBuf;
use std::sync::Mutex;

use vigil_contracts::attempt::PersistedAttempt;
use vigil_contracts::error::{VigilError, VigilResult};

/// Where the session blob lives.
pub trait StorageBackend: Send + Sync {
    /// Read the blob. `Ok(None)` means no blob exists yet; `Err` means the
    /// blob exists but could not be read or parsed.
    fn load(&self) -> VigilResult<Option<PersistedAttempt>>;

    /// Overwrite the blob with the full current snapshot.
    fn save(&self, attempt: &PersistedAttempt) -> VigilResult<()>;

    /// Remove the blob entirely.
    fn clear(&self) -> VigilResult<()>;
}

// ── File-backed storage ───────────────────────────────────────────────────────

/// A single JSON file at a configured path.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StorageBackend for FileStorage {
    fn load(&self) -> VigilResult<Option<PersistedAttempt>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(VigilError::StorageFailed {
                    reason: format!("failed to read '{}': {}", self.path.display(), e),
                })
            }
        };

        let attempt: PersistedAttempt =
            serde_json::from_str(&contents).map_err(|e| VigilError::StorageFailed {
                reason: format!("malformed blob at '{}': {}", self.path.display(), e),
            })?;
        Ok(Some(attempt))
    }

    fn save(&self, attempt: &PersistedAttempt) -> VigilResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| VigilError::StorageFailed {
                reason: format!("failed to create '{}': {}", parent.display(), e),
            })?;
        }

        let json = serde_json::to_vec(attempt).map_err(|e| VigilError::StorageFailed {
            reason: format!("failed to encode blob: {}", e),
        })?;

        std::fs::write(&self.path, json).map_err(|e| VigilError::StorageFailed {
            reason: format!("failed to write '{}': {}", self.path.display(), e),
        })
    }

    fn clear(&self) -> VigilResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VigilError::StorageFailed {
                reason: format!("failed to remove '{}': {}", self.path.display(), e),
            }),
        }
    }
}

// ── In-memory storage ─────────────────────────────────────────────────────────

/// Serialized in-memory blob, for tests and the demo.
///
/// Stores the encoded JSON rather than the decoded struct so that the full
/// serialization path is exercised and corruption can be simulated.
#[derive(Default)]
pub struct MemoryStorage {
    blob: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the backend with a raw blob, valid or not.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
        }
    }

    /// The raw blob currently held, if any.
    pub fn raw(&self) -> Option<String> {
        self.blob.lock().expect("storage lock poisoned").clone()
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self) -> VigilResult<Option<PersistedAttempt>> {
        let blob = self.blob.lock().expect("storage lock poisoned");
        match blob.as_deref() {
            None => Ok(None),
            Some(contents) => {
                let attempt: PersistedAttempt =
                    serde_json::from_str(contents).map_err(|e| VigilError::StorageFailed {
                        reason: format!("malformed blob: {}", e),
                    })?;
                Ok(Some(attempt))
            }
        }
    }

    fn save(&self, attempt: &PersistedAttempt) -> VigilResult<()> {
        let json = serde_json::to_string(attempt).map_err(|e| VigilError::StorageFailed {
            reason: format!("failed to encode blob: {}", e),
        })?;
        *self.blob.lock().expect("storage lock poisoned") = Some(json);
        Ok(())
    }

    fn clear(&self) -> VigilResult<()> {
        *self.blob.lock().expect("storage lock poisoned") = None;
        Ok(())
    }
}
