//! # vigil-contracts
//!
//! Shared types, wire formats, and error taxonomy for the VIGIL proctoring
//! runtime.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions and error types.

pub mod attempt;
pub mod error;
pub mod event;
pub mod question;
pub mod sync;

#[cfg(test)]
mod tests {
    use super::*;
    use attempt::{AttemptId, AttemptSession, PersistedAttempt};
    use error::VigilError;
    use event::{AuditEvent, EventMetadata, EventType, FocusState, FullscreenState};
    use sync::SyncState;

    // ── AttemptId ────────────────────────────────────────────────────────────

    #[test]
    fn attempt_id_new_produces_unique_values() {
        let ids: Vec<AttemptId> = (0..100).map(|_| AttemptId::new()).collect();

        let unique: std::collections::HashSet<String> =
            ids.iter().map(|id| id.to_string()).collect();
        assert_eq!(unique.len(), 100);
    }

    // ── Event ids ────────────────────────────────────────────────────────────

    #[test]
    fn event_ids_are_unique_within_an_attempt() {
        let attempt = AttemptId::new();
        let ids: std::collections::HashSet<String> = (0..200)
            .map(|_| {
                AuditEvent::record(EventType::TabBlur, attempt, EventMetadata::empty(), None).id
            })
            .collect();
        assert_eq!(ids.len(), 200, "event ids must never collide");
    }

    #[test]
    fn event_id_carries_log_prefix() {
        let event = AuditEvent::record(
            EventType::TestStart,
            AttemptId::new(),
            EventMetadata::empty(),
            None,
        );
        assert!(event.id.starts_with("LOG-"), "unexpected id: {}", event.id);
    }

    // ── EventType wire format ────────────────────────────────────────────────

    #[test]
    fn event_type_serializes_screaming_snake() {
        let json = serde_json::to_string(&EventType::FullscreenExit).unwrap();
        assert_eq!(json, "\"FULLSCREEN_EXIT\"");

        let decoded: EventType = serde_json::from_str("\"PASTE_ATTEMPT\"").unwrap();
        assert_eq!(decoded, EventType::PasteAttempt);
    }

    #[test]
    fn event_type_as_str_matches_serde_name() {
        for kind in [
            EventType::BrowserCheck,
            EventType::AccessDenied,
            EventType::TabFocus,
            EventType::CutAttempt,
            EventType::TimerExpired,
            EventType::Online,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    // ── Display-priority contract ────────────────────────────────────────────

    #[test]
    fn display_detail_prefers_reason() {
        let attempt = AttemptId::new();
        let mut metadata = EventMetadata::with_browser("Google Chrome", "120");
        metadata.reason = Some("Attempted paste".to_string());

        let event = AuditEvent::record(EventType::PasteAttempt, attempt, metadata, None);
        assert_eq!(event.display_detail(), "Attempted paste");
    }

    #[test]
    fn display_detail_falls_back_to_browser_name() {
        let event = AuditEvent::record(
            EventType::BrowserCheck,
            AttemptId::new(),
            EventMetadata::with_browser("Firefox", "0"),
            None,
        );
        assert_eq!(event.display_detail(), "Firefox");
    }

    #[test]
    fn display_detail_falls_back_to_focus_phrase() {
        let event = AuditEvent::record(
            EventType::TabBlur,
            AttemptId::new(),
            EventMetadata::with_focus(FocusState::Blurred),
            None,
        );
        assert_eq!(event.display_detail(), "Focus: blurred");
    }

    #[test]
    fn display_detail_falls_back_to_question_reference() {
        let event = AuditEvent::record(
            EventType::TestSubmit,
            AttemptId::new(),
            EventMetadata::empty(),
            Some("Q3".to_string()),
        );
        assert_eq!(event.display_detail(), "Question: Q3");
    }

    #[test]
    fn display_detail_generic_fallback() {
        let event = AuditEvent::record(
            EventType::TestStart,
            AttemptId::new(),
            EventMetadata::empty(),
            None,
        );
        assert_eq!(event.display_detail(), "System Event");
    }

    // ── Metadata round-trips ─────────────────────────────────────────────────

    #[test]
    fn metadata_unknown_keys_round_trip() {
        let json = r#"{"reason":"Attempted copy","sessionDepth":3,"vendor":"acme"}"#;
        let decoded: EventMetadata = serde_json::from_str(json).unwrap();

        assert_eq!(decoded.reason.as_deref(), Some("Attempted copy"));
        assert_eq!(decoded.extra.len(), 2);
        assert_eq!(decoded.extra["sessionDepth"], serde_json::json!(3));

        let re_encoded = serde_json::to_value(&decoded).unwrap();
        assert_eq!(re_encoded["vendor"], serde_json::json!("acme"));
    }

    #[test]
    fn metadata_fullscreen_state_uses_wire_names() {
        let metadata = EventMetadata::with_fullscreen(FullscreenState::Disabled);
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["fullscreenState"], serde_json::json!("disabled"));
    }

    // ── Persisted blob ───────────────────────────────────────────────────────

    #[test]
    fn persisted_attempt_uses_camel_case_keys() {
        let session = AttemptSession::fresh();
        let blob = PersistedAttempt {
            session,
            events: vec![AuditEvent::record(
                EventType::TestStart,
                session.attempt_id,
                EventMetadata::empty(),
                None,
            )],
        };

        let json = serde_json::to_value(&blob).unwrap();
        // The session flattens into the blob root.
        assert!(json.get("attemptId").is_some());
        assert_eq!(json["sealed"], serde_json::json!(false));
        assert!(json.get("session").is_none());
        assert!(json["events"][0].get("attemptId").is_some());
        assert_eq!(json["events"][0]["type"], serde_json::json!("TEST_START"));
    }

    #[test]
    fn persisted_attempt_sealed_defaults_false() {
        // Blobs written before the sealed flag existed must still restore.
        let attempt = AttemptId::new();
        let json = format!(r#"{{"attemptId":"{}"}}"#, attempt);
        let decoded: PersistedAttempt = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.session.attempt_id, attempt);
        assert!(!decoded.session.sealed);
        assert!(decoded.events.is_empty());
    }

    // ── SyncState ────────────────────────────────────────────────────────────

    #[test]
    fn sync_state_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SyncState::Syncing).unwrap(), "\"syncing\"");
        assert_eq!(serde_json::to_string(&SyncState::Failed).unwrap(), "\"failed\"");
    }

    // ── VigilError display messages ──────────────────────────────────────────

    #[test]
    fn error_submission_failed_display() {
        let err = VigilError::SubmissionFailed {
            reason: "authority returned 503".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("submission failed"));
        assert!(msg.contains("503"));
    }

    #[test]
    fn error_state_machine_display() {
        let err = VigilError::StateMachine {
            reason: "submit is only valid while testing".to_string(),
        };
        assert!(err.to_string().contains("session state error"));
    }

    #[test]
    fn error_config_display() {
        let err = VigilError::Config {
            reason: "missing storage path".to_string(),
        };
        assert!(err.to_string().contains("configuration error"));
    }
}
