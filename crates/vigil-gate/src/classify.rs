//! User-agent classification.
//!
//! Trust rule: the environment is trusted iff the approved engine marker
//! (`Chrome`) is present AND no impostor marker is present.  Chromium
//! derivatives embed the same `Chrome` token, so `Edg` (Microsoft Edge) and
//! `OPR` (Opera) are checked explicitly and win over the marker.
//!
//! Classification never fails: an unrecognizable string degrades to the
//! `Unknown` sentinel name with `trusted = false`.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Marker token of the approved browser engine.
const APPROVED_MARKER: &str = "Chrome";

/// Tokens of Chromium derivatives that embed the approved marker but are
/// not the approved browser.
const IMPOSTOR_MARKERS: &[&str] = &["Edg", "OPR"];

/// Sentinel name when no recognizable signature is present.
const UNKNOWN_NAME: &str = "Unknown";

/// Sentinel version for every non-approved branch.
const UNKNOWN_VERSION: &str = "0";

/// Classification result for one user-agent string.
///
/// `name` and `version` are best-effort display values and are produced even
/// when `trusted` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserProfile {
    pub name: String,
    pub version: String,
    pub trusted: bool,
}

/// Classify a raw environment-identifier string.
///
/// Pure function of the input: no side effects, no network, idempotent.
/// Called once at session start and again, identically, on every explicit
/// retry-detection action.
pub fn classify(user_agent: &str) -> BrowserProfile {
    let has_marker = user_agent.contains(APPROVED_MARKER);
    let impostor = IMPOSTOR_MARKERS.iter().any(|m| user_agent.contains(m));
    let trusted = has_marker && !impostor;

    let profile = if trusted {
        BrowserProfile {
            name: "Google Chrome".to_string(),
            version: approved_major_version(user_agent)
                .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            trusted: true,
        }
    } else {
        let name = if user_agent.contains("Safari") && !has_marker {
            "Safari"
        } else if user_agent.contains("Firefox") {
            "Firefox"
        } else if user_agent.contains("Edg") {
            "Microsoft Edge"
        } else if user_agent.contains("OPR") {
            "Opera"
        } else {
            UNKNOWN_NAME
        };

        BrowserProfile {
            name: name.to_string(),
            version: UNKNOWN_VERSION.to_string(),
            trusted: false,
        }
    };

    debug!(
        name = %profile.name,
        version = %profile.version,
        trusted = profile.trusted,
        "classified user agent"
    );

    profile
}

/// Extract the major version digits following `Chrome/`.
fn approved_major_version(user_agent: &str) -> Option<String> {
    let start = user_agent.find("Chrome/")? + "Chrome/".len();
    let digits: String = user_agent[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
