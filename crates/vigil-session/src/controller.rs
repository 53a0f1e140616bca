//! The session lifecycle state machine.
//!
//! Phases:
//!
//!   Detecting → Blocked (user retry loops back to Detecting)
//!             ↘ Setup → Testing → Completed
//!
//! No transition skips the gate check, and a reset always re-runs detection
//! rather than trusting a cached result.  The integrity monitor exists only
//! while the session is in `Testing` and is deterministically detached on
//! exit, so no sensor can log an event after the assessment ends.

use std::sync::Arc;

use tracing::{info, warn};

use vigil_contracts::error::{VigilError, VigilResult};
use vigil_contracts::event::{EventMetadata, EventType};
use vigil_gate::{classify, BrowserProfile};
use vigil_monitor::{CountdownTimer, IntegrityMonitor, SensorSignal, SignalOutcome, TimerStatus};
use vigil_store::SessionStore;
use vigil_sync::SyncEngine;

use crate::config::SessionConfig;

const UNSUPPORTED_BROWSER_REASON: &str = "Unsupported browser type";

/// Where the session currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Detecting,
    Blocked,
    Setup,
    Testing,
    Completed,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Detecting => "DETECTING",
            Phase::Blocked => "BLOCKED",
            Phase::Setup => "SETUP",
            Phase::Testing => "TESTING",
            Phase::Completed => "COMPLETED",
        };
        f.write_str(name)
    }
}

/// Top-level controller: sequences gate → consent → monitor → submission →
/// audit review, and owns the attempt identity via the store.
pub struct SessionController {
    config: SessionConfig,
    store: Arc<SessionStore>,
    sync: Arc<SyncEngine>,
    phase: Phase,
    browser: Option<BrowserProfile>,
    monitor: Option<IntegrityMonitor>,
}

impl SessionController {
    /// A new controller in `Detecting`; the gate has not yet run.
    pub fn new(config: SessionConfig, store: Arc<SessionStore>, sync: Arc<SyncEngine>) -> Self {
        Self {
            config,
            store,
            sync,
            phase: Phase::Detecting,
            browser: None,
            monitor: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The store, exposed for the audit-review collaborator.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn sync(&self) -> &Arc<SyncEngine> {
        &self.sync
    }

    /// The most recent gate classification, if detection has run.
    pub fn browser(&self) -> Option<&BrowserProfile> {
        self.browser.as_ref()
    }

    /// The live monitor, present only while `Testing`.
    pub fn monitor(&self) -> Option<&IntegrityMonitor> {
        self.monitor.as_ref()
    }

    /// Run the capability gate against the host environment.
    ///
    /// Valid only in `Detecting`.  Logs the classification result; an
    /// untrusted environment additionally logs an access denial and moves
    /// to `Blocked`, a trusted one moves to `Setup`.
    pub fn detect(&mut self, user_agent: &str) -> VigilResult<BrowserProfile> {
        self.require_phase(Phase::Detecting, "detect")?;

        let profile = classify(user_agent);
        self.store.append(
            EventType::BrowserCheck,
            EventMetadata::with_browser(profile.name.clone(), profile.version.clone()),
            None,
        );

        if profile.trusted {
            info!(browser = %profile.name, "environment trusted; entering setup");
            self.phase = Phase::Setup;
        } else {
            warn!(browser = %profile.name, "environment untrusted; access denied");
            self.store.append(
                EventType::AccessDenied,
                EventMetadata::with_reason(UNSUPPORTED_BROWSER_REASON),
                None,
            );
            self.phase = Phase::Blocked;
        }

        self.browser = Some(profile.clone());
        Ok(profile)
    }

    /// Explicit user retry out of `Blocked`: re-enters `Detecting` and runs
    /// the gate again, identically.
    pub fn retry_detection(&mut self, user_agent: &str) -> VigilResult<BrowserProfile> {
        self.require_phase(Phase::Blocked, "retry_detection")?;
        self.phase = Phase::Detecting;
        self.detect(user_agent)
    }

    /// Explicit consent on the briefing screen: logs the test start and
    /// activates the integrity monitor.
    pub fn confirm_start(&mut self) -> VigilResult<()> {
        self.require_phase(Phase::Setup, "confirm_start")?;

        self.store
            .append(EventType::TestStart, EventMetadata::empty(), None);

        self.monitor = Some(IntegrityMonitor::new(
            self.store.clone(),
            CountdownTimer::new(
                self.config.time_budget_secs,
                self.config.low_time_threshold_secs,
            ),
        ));
        self.phase = Phase::Testing;
        info!(attempt_id = %self.store.attempt_id(), "assessment started");
        Ok(())
    }

    /// Deliver one sensor signal to the live monitor.
    pub fn handle_signal(&mut self, signal: SensorSignal) -> VigilResult<SignalOutcome> {
        self.require_phase(Phase::Testing, "handle_signal")?;
        let monitor = self
            .monitor
            .as_mut()
            .ok_or_else(|| VigilError::StateMachine {
                reason: "testing phase without a live monitor".to_string(),
            })?;
        Ok(monitor.handle_signal(signal))
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> VigilResult<TimerStatus> {
        self.require_phase(Phase::Testing, "tick")?;
        let monitor = self
            .monitor
            .as_mut()
            .ok_or_else(|| VigilError::StateMachine {
                reason: "testing phase without a live monitor".to_string(),
            })?;
        Ok(monitor.tick())
    }

    /// Submit the candidate's answers (after explicit confirmation).
    ///
    /// Logs the submission event and finalizes the trail.  Success detaches
    /// the monitor and completes the session; failure leaves the session in
    /// `Testing` so the candidate can retry.
    pub fn submit(&mut self, answers: serde_json::Value) -> VigilResult<()> {
        self.require_phase(Phase::Testing, "submit")?;

        self.store.append(
            EventType::TestSubmit,
            EventMetadata::with_reason("finalizing"),
            None,
        );

        match self.store.finalize(answers) {
            Ok(()) => {
                // Tear down sensing before leaving Testing.
                self.monitor = None;
                self.phase = Phase::Completed;
                info!(attempt_id = %self.store.attempt_id(), "assessment completed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "submission failed; session remains live for retry");
                Err(e)
            }
        }
    }

    /// Explicit "start new attempt": discards the current attempt and
    /// returns to `Detecting`.
    ///
    /// Valid after completion, or from `Blocked` as abandonment.  Detection
    /// must then be re-run explicitly; no cached trust survives a reset.
    pub fn start_new_attempt(&mut self) -> VigilResult<()> {
        if self.phase != Phase::Completed && self.phase != Phase::Blocked {
            return Err(VigilError::StateMachine {
                reason: format!(
                    "start_new_attempt is not valid in phase {}",
                    self.phase
                ),
            });
        }

        self.monitor = None;
        self.browser = None;
        self.store.reset()?;
        self.phase = Phase::Detecting;
        Ok(())
    }

    fn require_phase(&self, expected: Phase, operation: &str) -> VigilResult<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(VigilError::StateMachine {
                reason: format!(
                    "{} is only valid in phase {}, current phase is {}",
                    operation, expected, self.phase
                ),
            })
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use vigil_contracts::sync::{LogSnapshot, Submission};
    use vigil_monitor::ClipboardAction;
    use vigil_store::MemoryStorage;
    use vigil_sync::RemoteAuthority;

    use super::*;

    const CHROME_UA: &str = "Mozilla/5.0 Chrome/120.0.0.0 Safari/537.36";
    const EDGE_UA: &str = "Mozilla/5.0 Chrome/120.0.0.0 Safari/537.36 Edg/120.0";

    struct ScriptedAuthority {
        fail_submit: AtomicBool,
        submissions: Mutex<Vec<Submission>>,
    }

    impl ScriptedAuthority {
        fn new() -> Self {
            Self {
                fail_submit: AtomicBool::new(false),
                submissions: Mutex::new(vec![]),
            }
        }
    }

    impl RemoteAuthority for ScriptedAuthority {
        fn push_snapshot(&self, _snapshot: &LogSnapshot) -> VigilResult<()> {
            Ok(())
        }
        fn submit(&self, submission: &Submission) -> VigilResult<()> {
            if self.fail_submit.load(Ordering::SeqCst) {
                return Err(VigilError::SubmissionFailed {
                    reason: "authority returned 503".to_string(),
                });
            }
            self.submissions.lock().unwrap().push(submission.clone());
            Ok(())
        }
    }

    fn make_controller() -> (SessionController, Arc<ScriptedAuthority>) {
        let authority = Arc::new(ScriptedAuthority::new());
        let sync = Arc::new(SyncEngine::new(authority.clone()));
        let store = Arc::new(SessionStore::open(
            Box::new(MemoryStorage::new()),
            sync.clone(),
        ));
        (
            SessionController::new(SessionConfig::default(), store, sync),
            authority,
        )
    }

    fn kinds(controller: &SessionController) -> Vec<EventType> {
        controller.store().read_all().iter().map(|e| e.kind).collect()
    }

    /// Trusted environment: Detecting → Setup, with one BROWSER_CHECK.
    #[test]
    fn trusted_detection_enters_setup() {
        let (mut controller, _) = make_controller();

        let profile = controller.detect(CHROME_UA).unwrap();

        assert!(profile.trusted);
        assert_eq!(profile.name, "Google Chrome");
        assert_eq!(controller.phase(), Phase::Setup);
        assert_eq!(kinds(&controller), vec![EventType::BrowserCheck]);
    }

    /// Untrusted environment: Detecting → Blocked, with a denial on record.
    #[test]
    fn untrusted_detection_blocks() {
        let (mut controller, _) = make_controller();

        let profile = controller.detect(EDGE_UA).unwrap();

        assert!(!profile.trusted);
        assert_eq!(controller.phase(), Phase::Blocked);
        assert_eq!(
            kinds(&controller),
            vec![EventType::BrowserCheck, EventType::AccessDenied]
        );

        let trail = controller.store().read_all();
        assert_eq!(trail[1].display_detail(), "Unsupported browser type");
    }

    /// Retry out of Blocked re-runs the gate; a now-trusted environment
    /// proceeds to Setup.
    #[test]
    fn retry_from_blocked_reruns_the_gate() {
        let (mut controller, _) = make_controller();
        controller.detect(EDGE_UA).unwrap();
        assert_eq!(controller.phase(), Phase::Blocked);

        let profile = controller.retry_detection(CHROME_UA).unwrap();

        assert!(profile.trusted);
        assert_eq!(controller.phase(), Phase::Setup);
    }

    /// The full happy path: detect → consent → signals → submit → sealed.
    #[test]
    fn full_lifecycle_seals_the_attempt() {
        let (mut controller, authority) = make_controller();

        controller.detect(CHROME_UA).unwrap();
        controller.confirm_start().unwrap();
        assert_eq!(controller.phase(), Phase::Testing);
        assert!(controller.monitor().is_some());

        controller
            .handle_signal(SensorSignal::Fullscreen(true))
            .unwrap();
        controller
            .handle_signal(SensorSignal::Clipboard(ClipboardAction::Copy))
            .unwrap();

        controller.submit(serde_json::json!({ "Q1": 1 })).unwrap();

        assert_eq!(controller.phase(), Phase::Completed);
        assert!(controller.monitor().is_none(), "monitor torn down on exit");
        assert!(controller.store().is_sealed());
        assert_eq!(authority.submissions.lock().unwrap().len(), 1);

        assert_eq!(
            kinds(&controller),
            vec![
                EventType::BrowserCheck,
                EventType::TestStart,
                EventType::FullscreenEnter,
                EventType::CopyAttempt,
                EventType::TestSubmit,
            ]
        );
    }

    /// Submission failure keeps the session in Testing and is retryable.
    #[test]
    fn failed_submission_is_retryable() {
        let (mut controller, authority) = make_controller();
        controller.detect(CHROME_UA).unwrap();
        controller.confirm_start().unwrap();
        authority.fail_submit.store(true, Ordering::SeqCst);

        let result = controller.submit(serde_json::json!({}));

        assert!(matches!(result, Err(VigilError::SubmissionFailed { .. })));
        assert_eq!(controller.phase(), Phase::Testing);
        assert!(!controller.store().is_sealed());

        authority.fail_submit.store(false, Ordering::SeqCst);
        controller.submit(serde_json::json!({})).unwrap();
        assert_eq!(controller.phase(), Phase::Completed);
    }

    /// A reset after completion mints a new attempt and re-enters
    /// Detecting, never trusting the previous gate result.
    #[test]
    fn start_new_attempt_returns_to_detection() {
        let (mut controller, _) = make_controller();
        controller.detect(CHROME_UA).unwrap();
        controller.confirm_start().unwrap();
        controller.submit(serde_json::json!({})).unwrap();

        let sealed_attempt = controller.store().attempt_id();
        controller.start_new_attempt().unwrap();

        assert_eq!(controller.phase(), Phase::Detecting);
        assert!(controller.browser().is_none());
        assert_ne!(controller.store().attempt_id(), sealed_attempt);
        assert!(controller.store().read_all().is_empty());
    }

    /// Operations invoked in the wrong phase surface state machine errors.
    #[test]
    fn wrong_phase_operations_are_rejected() {
        let (mut controller, _) = make_controller();

        assert!(matches!(
            controller.confirm_start(),
            Err(VigilError::StateMachine { .. })
        ));
        assert!(matches!(
            controller.submit(serde_json::json!({})),
            Err(VigilError::StateMachine { .. })
        ));
        assert!(matches!(
            controller.retry_detection(CHROME_UA),
            Err(VigilError::StateMachine { .. })
        ));

        controller.detect(CHROME_UA).unwrap();
        assert!(matches!(
            controller.detect(CHROME_UA),
            Err(VigilError::StateMachine { .. }),
        ), "detect is not valid once setup is reached");
        assert!(matches!(
            controller.start_new_attempt(),
            Err(VigilError::StateMachine { .. })
        ));
    }

    /// Timer ticks flow through the controller while testing.
    #[test]
    fn tick_requires_testing_phase() {
        let (mut controller, _) = make_controller();
        assert!(controller.tick().is_err());

        controller.detect(CHROME_UA).unwrap();
        controller.confirm_start().unwrap();

        let status = controller.tick().unwrap();
        assert_eq!(status.remaining_secs, 899);
        assert!(!status.urgent);
    }
}
