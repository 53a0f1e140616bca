//! The integrity monitor: live sensors for one assessment run.
//!
//! Owns the lockdown overlay state and the countdown timer while the
//! assessment is in progress, and turns every raw signal into exactly one
//! structured trust event through the store's append path.
//!
//! Overlay invariant: the overlay is visible whenever the environment is
//! not fullscreen OR any unresolved warning exists.  The fullscreen and
//! visibility warnings are tracked independently so one being resolved
//! never dismisses the other.

use std::sync::Arc;

use tracing::{debug, warn};

use vigil_contracts::event::{EventMetadata, EventType, FocusState, FullscreenState};
use vigil_store::SessionStore;

use crate::signal::{ClipboardAction, SensorSignal, SignalOutcome};
use crate::timer::{CountdownTimer, TimerStatus};

const FULLSCREEN_WARNING: &str = "Full-screen mode is required to continue.";
const VISIBILITY_WARNING: &str = "Unauthorized window switch detected.";
const LOCKDOWN_PROMPT: &str = "This environment requires full-screen lockdown.";

/// Live sensor state for one assessment run.
///
/// Construct on entry to the testing phase and detach (or drop) on exit;
/// a detached monitor ignores every signal and tick, so nothing can be
/// logged after the session leaves the assessment.
pub struct IntegrityMonitor {
    store: Arc<SessionStore>,
    active: bool,
    fullscreen: bool,
    fullscreen_warning: Option<String>,
    visibility_warning: Option<String>,
    timer: CountdownTimer,
    expiry_logged: bool,
}

impl IntegrityMonitor {
    /// A new monitor, not yet in fullscreen (the overlay starts visible
    /// until the host confirms fullscreen entry).
    pub fn new(store: Arc<SessionStore>, timer: CountdownTimer) -> Self {
        Self {
            store,
            active: true,
            fullscreen: false,
            fullscreen_warning: None,
            visibility_warning: None,
            timer,
            expiry_logged: false,
        }
    }

    /// Translate one raw signal into a trust event and updated overlay
    /// state.
    pub fn handle_signal(&mut self, signal: SensorSignal) -> SignalOutcome {
        if !self.active {
            debug!(?signal, "signal ignored: monitor detached");
            return SignalOutcome::Ignored;
        }

        match signal {
            SensorSignal::Fullscreen(enabled) => self.on_fullscreen(enabled),
            SensorSignal::Visibility(visible) => self.on_visibility(visible),
            SensorSignal::Clipboard(action) => self.on_clipboard(action),
            SensorSignal::Connectivity(online) => self.on_connectivity(online),
        }
    }

    fn on_fullscreen(&mut self, enabled: bool) -> SignalOutcome {
        self.fullscreen = enabled;
        let (kind, state) = if enabled {
            // Dismiss only the fullscreen warning; a visibility warning
            // stays unresolved.
            self.fullscreen_warning = None;
            (EventType::FullscreenEnter, FullscreenState::Enabled)
        } else {
            self.fullscreen_warning = Some(FULLSCREEN_WARNING.to_string());
            warn!("fullscreen exited during assessment");
            (EventType::FullscreenExit, FullscreenState::Disabled)
        };

        let event_id = self
            .store
            .append(kind, EventMetadata::with_fullscreen(state), None);
        SignalOutcome::Logged { event_id }
    }

    fn on_visibility(&mut self, visible: bool) -> SignalOutcome {
        let (kind, focus) = if visible {
            self.visibility_warning = None;
            (EventType::TabFocus, FocusState::Focused)
        } else {
            self.visibility_warning = Some(VISIBILITY_WARNING.to_string());
            warn!("tab visibility lost during assessment");
            (EventType::TabBlur, FocusState::Blurred)
        };

        let event_id = self
            .store
            .append(kind, EventMetadata::with_focus(focus), None);
        SignalOutcome::Logged { event_id }
    }

    fn on_clipboard(&mut self, action: ClipboardAction) -> SignalOutcome {
        let kind = match action {
            ClipboardAction::Copy => EventType::CopyAttempt,
            ClipboardAction::Paste => EventType::PasteAttempt,
            ClipboardAction::Cut => EventType::CutAttempt,
        };

        warn!(action = action.verb(), "clipboard attempt suppressed");
        let event_id = self.store.append(
            kind,
            EventMetadata::with_reason(format!("Attempted {}", action.verb())),
            None,
        );

        // Hard block: the underlying action never completes.
        SignalOutcome::Suppressed {
            event_id,
            notice: format!(
                "Security policy: {} is restricted in this environment.",
                action.notice_name()
            ),
        }
    }

    fn on_connectivity(&mut self, online: bool) -> SignalOutcome {
        let (kind, reason) = if online {
            (EventType::Online, "Connectivity restored")
        } else {
            (EventType::Offline, "Connection lost")
        };

        let event_id = self
            .store
            .append(kind, EventMetadata::with_reason(reason), None);
        SignalOutcome::Logged { event_id }
    }

    /// Advance the countdown by one second.
    ///
    /// The tick that exhausts the budget logs a single `TIMER_EXPIRED`
    /// event; whether expiry auto-submits is the controller's decision.
    /// A detached monitor does not tick.
    pub fn tick(&mut self) -> TimerStatus {
        if !self.active {
            return self.timer.status();
        }

        let status = self.timer.tick();
        if status.expired && !self.expiry_logged {
            self.expiry_logged = true;
            self.store.append(
                EventType::TimerExpired,
                EventMetadata::with_reason("Time budget exhausted"),
                None,
            );
        }
        status
    }

    /// Whether the lockdown overlay must be shown.
    ///
    /// The union of two independently tracked conditions: not being in
    /// fullscreen, and any unresolved warning.
    pub fn overlay_visible(&self) -> bool {
        !self.fullscreen
            || self.fullscreen_warning.is_some()
            || self.visibility_warning.is_some()
    }

    /// The message the overlay should carry, when visible.
    pub fn overlay_message(&self) -> Option<String> {
        if let Some(warning) = &self.fullscreen_warning {
            return Some(warning.clone());
        }
        if let Some(warning) = &self.visibility_warning {
            return Some(warning.clone());
        }
        if !self.fullscreen {
            return Some(LOCKDOWN_PROMPT.to_string());
        }
        None
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Deterministically stop sensing: all subsequent signals and ticks are
    /// ignored and log nothing.
    pub fn detach(&mut self) {
        if self.active {
            self.active = false;
            debug!("integrity monitor detached");
        }
    }
}

impl Drop for IntegrityMonitor {
    fn drop(&mut self) {
        self.detach();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
