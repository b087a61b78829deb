//! Color palette and semantic styling for the dashboard.
//!
//! Severity and incident-type colors follow the web dashboard the
//! operators already know: exhaustive matches replace its duck-typed
//! style maps, so an unmapped value is a compile error here rather
//! than a blank badge at 3am.

use ratatui::style::{Color, Modifier, Style};

use rapid_core::{IncidentKind, Severity};

// ── Core palette ─────────────────────────────────────────────────────

pub const TEAL: Color = Color::Rgb(47, 111, 106); // #2f6f6a, header
pub const PANEL_TEAL: Color = Color::Rgb(94, 143, 146); // #5e8f92, panels
pub const SUCCESS_GREEN: Color = Color::Rgb(5, 150, 105); // call ongoing
pub const IDLE_GRAY: Color = Color::Rgb(148, 163, 184); // no ongoing call
pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207);

// ── Severity badge colors ────────────────────────────────────────────

const SEVERITY_LOW: Color = Color::Rgb(250, 204, 21); // yellow
const SEVERITY_MEDIUM: Color = Color::Rgb(251, 146, 60); // orange
const SEVERITY_HIGH: Color = Color::Rgb(239, 68, 68); // red
const SEVERITY_CRITICAL: Color = Color::Rgb(185, 28, 28); // dark red

// ── Incident type badge colors ───────────────────────────────────────

const KIND_FIRE: Color = Color::Rgb(220, 38, 38);
const KIND_MEDICAL: Color = Color::Rgb(37, 99, 235);
const KIND_CRIME: Color = Color::Rgb(147, 51, 234);
const KIND_ACCIDENT: Color = Color::Rgb(234, 88, 12);
const KIND_ANALYZING: Color = Color::Rgb(16, 185, 129);
const KIND_UNKNOWN: Color = Color::Rgb(107, 114, 128);

/// Badge style for a severity.
pub fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Low => Style::default().bg(SEVERITY_LOW).fg(Color::Black),
        Severity::Medium => Style::default().bg(SEVERITY_MEDIUM).fg(Color::White),
        Severity::High => Style::default().bg(SEVERITY_HIGH).fg(Color::White),
        // The web UI pulses this one; bold is the terminal equivalent.
        Severity::Critical => Style::default()
            .bg(SEVERITY_CRITICAL)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    }
}

/// Badge background for an incident type.
pub fn kind_color(kind: IncidentKind) -> Color {
    match kind {
        IncidentKind::Fire => KIND_FIRE,
        IncidentKind::Medical => KIND_MEDICAL,
        IncidentKind::Crime => KIND_CRIME,
        IncidentKind::Accident => KIND_ACCIDENT,
        IncidentKind::Analyzing => KIND_ANALYZING,
        IncidentKind::Unknown => KIND_UNKNOWN,
    }
}

/// Style for a badge with no data behind it.
pub fn placeholder_badge() -> Style {
    Style::default().bg(IDLE_GRAY).fg(Color::Black)
}

/// Status pill style: green while a call is ongoing, gray otherwise.
pub fn status_style(connected: bool) -> Style {
    if connected {
        Style::default()
            .bg(SUCCESS_GREEN)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(IDLE_GRAY).fg(Color::Black)
    }
}

/// Panel title style.
pub fn title_style() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

// ── Tests ────────────────────────────────────────────────────────────
