//! Raw environment signals and their handling outcomes.
//!
//! The hosting runtime pushes transition notifications; the monitor never
//! polls.  Every signal funnels into the store's append path; the monitor
//! holds no log state of its own.

/// A clipboard action the candidate attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardAction {
    Copy,
    Paste,
    Cut,
}

impl ClipboardAction {
    /// Lowercase verb for reason strings ("Attempted copy").
    pub fn verb(&self) -> &'static str {
        match self {
            ClipboardAction::Copy => "copy",
            ClipboardAction::Paste => "paste",
            ClipboardAction::Cut => "cut",
        }
    }

    /// Uppercase name for user-facing notices.
    pub fn notice_name(&self) -> &'static str {
        match self {
            ClipboardAction::Copy => "COPY",
            ClipboardAction::Paste => "PASTE",
            ClipboardAction::Cut => "CUT",
        }
    }
}

/// One transition notification from the hosting runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorSignal {
    /// Fullscreen state changed; `true` means fullscreen is now active.
    Fullscreen(bool),
    /// Document visibility changed; `true` means the tab is now visible.
    Visibility(bool),
    /// The candidate attempted a clipboard action.
    Clipboard(ClipboardAction),
    /// Network connectivity changed; `true` means online.
    Connectivity(bool),
}

/// What the host must do with the signal it just delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalOutcome {
    /// The signal was recorded; no further host action required.
    Logged {
        /// Id of the appended event, absent if the attempt was sealed.
        event_id: Option<String>,
    },
    /// The underlying action must not complete, and the candidate is shown
    /// a transient notice. Clipboard signals always land here.
    Suppressed {
        event_id: Option<String>,
        notice: String,
    },
    /// The monitor is detached; nothing was recorded.
    Ignored,
}
