//! Assessment countdown timer.
//!
//! Decrements once per host tick from a fixed budget down to zero, never
//! below.  Below the low-time threshold the status flags urgency so the
//! host can escalate styling.

/// Snapshot of the timer after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerStatus {
    pub remaining_secs: u32,
    /// Remaining time is under the low-time threshold.
    pub urgent: bool,
    /// The budget is exhausted.
    pub expired: bool,
}

/// Fixed-budget countdown, one decrement per tick.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    remaining_secs: u32,
    low_threshold_secs: u32,
}

impl CountdownTimer {
    pub fn new(budget_secs: u32, low_threshold_secs: u32) -> Self {
        Self {
            remaining_secs: budget_secs,
            low_threshold_secs,
        }
    }

    /// Decrement by one second, saturating at zero.
    ///
    /// Returns the post-tick status; `expired` is true on the tick that
    /// reaches zero and on every tick after.
    pub fn tick(&mut self) -> TimerStatus {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.status()
    }

    pub fn status(&self) -> TimerStatus {
        TimerStatus {
            remaining_secs: self.remaining_secs,
            urgent: self.remaining_secs < self.low_threshold_secs,
            expired: self.remaining_secs == 0,
        }
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// `M:SS` display form used by the assessment header.
    pub fn display(&self) -> String {
        format!("{}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
