//! Audit event types and the display-priority contract.
//!
//! An `AuditEvent` is one observed, trust-relevant fact: a browser check, a
//! focus change, a clipboard attempt, a submission.  Events are append-only
//! and insertion order is authoritative for display; timestamps are
//! captured best-effort and may go backwards if the wall clock is adjusted.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attempt::AttemptId;

/// The closed set of trust-relevant event kinds.
///
/// Serialized in SCREAMING_SNAKE_CASE to match the wire and storage format
/// consumed by the audit-review view and the remote authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    BrowserCheck,
    AccessDenied,
    FullscreenEnter,
    FullscreenExit,
    TabBlur,
    TabFocus,
    CopyAttempt,
    PasteAttempt,
    CutAttempt,
    TimerTick,
    TimerExpired,
    TestStart,
    TestSubmit,
    Offline,
    Online,
}

impl EventType {
    /// The canonical wire name of this event kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::BrowserCheck => "BROWSER_CHECK",
            EventType::AccessDenied => "ACCESS_DENIED",
            EventType::FullscreenEnter => "FULLSCREEN_ENTER",
            EventType::FullscreenExit => "FULLSCREEN_EXIT",
            EventType::TabBlur => "TAB_BLUR",
            EventType::TabFocus => "TAB_FOCUS",
            EventType::CopyAttempt => "COPY_ATTEMPT",
            EventType::PasteAttempt => "PASTE_ATTEMPT",
            EventType::CutAttempt => "CUT_ATTEMPT",
            EventType::TimerTick => "TIMER_TICK",
            EventType::TimerExpired => "TIMER_EXPIRED",
            EventType::TestStart => "TEST_START",
            EventType::TestSubmit => "TEST_SUBMIT",
            EventType::Offline => "OFFLINE",
            EventType::Online => "ONLINE",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document focus as observed by the visibility sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusState {
    Focused,
    Blurred,
}

impl FocusState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FocusState::Focused => "focused",
            FocusState::Blurred => "blurred",
        }
    }
}

/// Fullscreen lockdown as observed by the fullscreen sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FullscreenState {
    Enabled,
    Disabled,
}

/// The known metadata shapes plus an open fallback bag.
///
/// Consumers must treat unknown keys as opaque; they round-trip through
/// `extra` untouched.  The known fields exist so the display-priority rule
/// (`AuditEvent::display_detail`) stays type-safe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_state: Option<FocusState>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullscreen_state: Option<FullscreenState>,

    /// Unknown keys carried verbatim for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl EventMetadata {
    /// Metadata with no known fields set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Metadata carrying only a free-form reason string.
    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Metadata describing a browser classification result.
    pub fn with_browser(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            browser_name: Some(name.into()),
            browser_version: Some(version.into()),
            ..Self::default()
        }
    }

    /// Metadata describing a focus transition.
    pub fn with_focus(state: FocusState) -> Self {
        Self {
            focus_state: Some(state),
            ..Self::default()
        }
    }

    /// Metadata describing a fullscreen transition.
    pub fn with_fullscreen(state: FullscreenState) -> Self {
        Self {
            fullscreen_state: Some(state),
            ..Self::default()
        }
    }
}

/// One observed fact in an attempt's audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    /// Unique within the attempt: millis timestamp plus a random suffix.
    /// Uniqueness, not strict ordering, is the contract.
    pub id: String,

    #[serde(rename = "type")]
    pub kind: EventType,

    /// Capture-time instant. Insertion order, not this field, is
    /// authoritative for display.
    pub timestamp: DateTime<Utc>,

    pub attempt_id: AttemptId,

    /// Present only for events tied to a specific assessment item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,

    pub metadata: EventMetadata,
}

impl AuditEvent {
    /// Capture a new event now, minting a fresh unique id.
    pub fn record(
        kind: EventType,
        attempt_id: AttemptId,
        metadata: EventMetadata,
        question_id: Option<String>,
    ) -> Self {
        let now = Utc::now();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self {
            id: format!("LOG-{}-{}", now.timestamp_millis(), &suffix[..5]),
            kind,
            timestamp: now,
            attempt_id,
            question_id,
            metadata,
        }
    }

    /// Best-available human-readable detail for this event.
    ///
    /// Fixed ordered-preference contract the audit-review view depends on:
    /// `reason`, else `browser_name`, else a focus-state phrase, else a
    /// question-reference phrase, else a generic fallback.
    pub fn display_detail(&self) -> String {
        if let Some(reason) = &self.metadata.reason {
            return reason.clone();
        }
        if let Some(name) = &self.metadata.browser_name {
            return name.clone();
        }
        if let Some(focus) = &self.metadata.focus_state {
            return format!("Focus: {}", focus.as_str());
        }
        if let Some(question_id) = &self.question_id {
            return format!("Question: {}", question_id);
        }
        "System Event".to_string()
    }
}
