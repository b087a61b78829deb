// ── Call and incident domain types ──
//
// The canonical representation of everything the dashboard displays.
// Wire strings from the feed are converted into these closed sets here;
// nothing downstream ever handles a raw `type` or `severity` string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Phase of the (single) call channel.
///
/// `Idle` is the initial and post-teardown phase. `Ended` follows a
/// `call_ended` event and is display-equivalent to `Idle` -- there is
/// no persisted history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallPhase {
    #[default]
    Idle,
    Active,
    Ended,
}

/// Classified incident category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IncidentKind {
    Fire,
    Medical,
    Crime,
    Accident,
    /// The classifier has not settled on a category yet.
    Analyzing,
    #[default]
    Unknown,
}

impl IncidentKind {
    /// Parse a wire value. Any unrecognized value maps to `Unknown` --
    /// category is best-effort, never a reason to reject an update.
    pub fn from_wire(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::Unknown)
    }
}

/// Closed-set urgency classification. Ordered: `Low < Critical`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Parse a wire value. Unlike [`IncidentKind`], there is no
    /// fallback: an unrecognized severity is a validation failure and
    /// the caller must reject the whole update.
    pub fn from_wire(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

/// The derived, display-ready snapshot of the call in progress.
///
/// Exists only while the phase is `Active` and at least one valid
/// update has been folded since the last `call_started`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub transcript: String,
    pub kind: IncidentKind,
    pub severity: Severity,
    pub department: Option<String>,
    pub location: Option<String>,
    /// Free-text hazard flags, order-preserving, duplicates permitted.
    pub risks: Vec<String>,
}

impl IncidentRecord {
    /// Derive a record from a structurally valid update.
    ///
    /// Returns `None` when the severity is absent or unrecognized --
    /// the update is then dropped in its entirety and the previous
    /// record stays on display.
    pub fn from_update(update: &rapid_feed::IncidentUpdate) -> Option<Self> {
        let severity = Severity::from_wire(update.severity.as_deref()?)?;
        let kind = update
            .kind
            .as_deref()
            .map_or(IncidentKind::Unknown, IncidentKind::from_wire);

        Some(Self {
            transcript: update.transcript.clone(),
            kind,
            severity,
            department: update.department.clone(),
            location: update.location.clone(),
            risks: update.risks.clone(),
        })
    }
}

/// Timestamp alias used for staleness metadata.
pub type EventTime = DateTime<Utc>;

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn kind_parses_known_values() {
        assert_eq!(IncidentKind::from_wire("fire"), IncidentKind::Fire);
        assert_eq!(IncidentKind::from_wire("medical"), IncidentKind::Medical);
        assert_eq!(IncidentKind::from_wire("crime"), IncidentKind::Crime);
        assert_eq!(IncidentKind::from_wire("accident"), IncidentKind::Accident);
        assert_eq!(IncidentKind::from_wire("analyzing"), IncidentKind::Analyzing);
    }

    #[test]
    fn kind_falls_back_to_unknown() {
        assert_eq!(IncidentKind::from_wire("disaster"), IncidentKind::Unknown);
        assert_eq!(IncidentKind::from_wire(""), IncidentKind::Unknown);
        assert_eq!(IncidentKind::from_wire("FIRE"), IncidentKind::Unknown);
    }

    #[test]
    fn severity_is_strict() {
        assert_eq!(Severity::from_wire("low"), Some(Severity::Low));
        assert_eq!(Severity::from_wire("critical"), Some(Severity::Critical));
        assert_eq!(Severity::from_wire("catastrophic"), None);
        assert_eq!(Severity::from_wire(""), None);
    }

    #[test]
    fn severity_orders_by_urgency() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn wire_display_round_trips_lowercase() {
        assert_eq!(Severity::High.to_string(), "high");
        assert_eq!(IncidentKind::Fire.to_string(), "fire");
        assert_eq!(IncidentKind::Unknown.to_string(), "unknown");
    }
}
