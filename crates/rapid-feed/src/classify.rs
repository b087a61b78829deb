//! Structural classification of inbound feed frames.
//!
//! The backend sends loosely-shaped JSON over the live socket: lifecycle
//! markers (`call_started` / `call_ended`) and incident snapshots. This
//! module extracts structure only; it never validates `type` or
//! `severity` against their closed sets. That is the state store's job
//! at fold time, which keeps this parser tolerant of schema drift while
//! the display logic stays strict.

use serde::Deserialize;

/// Raw shape of a frame as sent by the backend. Every field is optional;
/// the classification rules decide what an absence means.
#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(default)]
    event: Option<String>,
    #[serde(default)]
    transcript: Option<String>,
    #[serde(default)]
    risks: Option<Vec<String>>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

/// An incident snapshot extracted from an update frame.
///
/// `kind` and `severity` are carried as raw wire strings; semantic
/// validation happens when the update is folded into call state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentUpdate {
    pub transcript: String,
    /// Order-preserving, duplicates permitted. Empty when absent.
    pub risks: Vec<String>,
    pub kind: Option<String>,
    pub severity: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
}

/// A classified call event. The closed set of things the feed can say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallEvent {
    /// A new call has been picked up.
    Started,
    /// The current call has ended.
    Ended,
    /// A full incident snapshot for the call in progress.
    Update(IncidentUpdate),
}

/// Classify one text frame. `None` means the frame is dropped:
/// either malformed JSON or a partial packet without a transcript.
/// Both are normal occurrences on a live stream, not errors.
///
/// Rules, in order:
/// 1. `event == "call_started"` → [`CallEvent::Started`]
/// 2. `event == "call_ended"` → [`CallEvent::Ended`]
/// 3. no `transcript` field → drop (partial packet)
/// 4. otherwise → [`CallEvent::Update`], `risks` defaulting to empty
pub fn classify(raw: &str) -> Option<CallEvent> {
    let frame: RawFrame = match serde_json::from_str(raw) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!(error = %e, "dropping malformed feed frame");
            return None;
        }
    };

    match frame.event.as_deref() {
        Some("call_started") => return Some(CallEvent::Started),
        Some("call_ended") => return Some(CallEvent::Ended),
        _ => {}
    }

    let Some(transcript) = frame.transcript else {
        tracing::trace!("dropping partial packet without transcript");
        return None;
    };

    Some(CallEvent::Update(IncidentUpdate {
        transcript,
        risks: frame.risks.unwrap_or_default(),
        kind: frame.kind,
        severity: frame.severity,
        department: frame.department,
        location: frame.location,
    }))
}

// ── Tests ────────────────────────────────────────────────────────────
