//! In-memory remote authority for the demo scenarios.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use vigil_contracts::error::{VigilError, VigilResult};
use vigil_contracts::sync::{LogSnapshot, Submission};
use vigil_sync::RemoteAuthority;

/// Records everything it receives and can be scripted to reject the next
/// N submissions, to demonstrate the retryable-submission path.
pub struct DemoAuthority {
    reject_submissions: AtomicU32,
    snapshots: Mutex<Vec<LogSnapshot>>,
    submissions: Mutex<Vec<Submission>>,
}

impl DemoAuthority {
    pub fn new() -> Self {
        Self {
            reject_submissions: AtomicU32::new(0),
            snapshots: Mutex::new(vec![]),
            submissions: Mutex::new(vec![]),
        }
    }

    /// Reject the next `count` submissions with a transport error.
    pub fn reject_next_submissions(&self, count: u32) {
        self.reject_submissions.store(count, Ordering::SeqCst);
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.lock().expect("authority lock poisoned").len()
    }

    pub fn submission_count(&self) -> usize {
        self.submissions
            .lock()
            .expect("authority lock poisoned")
            .len()
    }
}

impl Default for DemoAuthority {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteAuthority for DemoAuthority {
    fn push_snapshot(&self, snapshot: &LogSnapshot) -> VigilResult<()> {
        self.snapshots
            .lock()
            .expect("authority lock poisoned")
            .push(snapshot.clone());
        Ok(())
    }

    fn submit(&self, submission: &Submission) -> VigilResult<()> {
        let pending = self.reject_submissions.load(Ordering::SeqCst);
        if pending > 0 {
            self.reject_submissions.store(pending - 1, Ordering::SeqCst);
            return Err(VigilError::SubmissionFailed {
                reason: "the secure server could not be reached".to_string(),
            });
        }
        self.submissions
            .lock()
            .expect("authority lock poisoned")
            .push(submission.clone());
        Ok(())
    }
}
