//! Dashboard layout and rendering.
//!
//! Pure presentation: everything here reads a [`CallState`] snapshot
//! and draws. The text helpers are split out so the placeholder rules
//! stay unit-testable without a terminal.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
};

use rapid_core::{CallState, IncidentRecord};

use crate::theme;

pub fn draw(frame: &mut Frame, state: &CallState) {
    let [header, status, body, footer] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(3),
        Constraint::Min(10),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    // ── Header ───────────────────────────────────────────────────
    let header_text = vec![
        Line::from(Span::styled("RAPID-100", theme::title_style())),
        Line::from("emergency dispatch — live operations view"),
    ];
    frame.render_widget(
        Paragraph::new(header_text)
            .style(Style::default().bg(theme::TEAL).fg(ratatui::style::Color::White))
            .block(Block::bordered()),
        header,
    );

    // ── Call status pill ─────────────────────────────────────────
    frame.render_widget(
        Paragraph::new(status_text(state))
            .alignment(Alignment::Center)
            .style(theme::status_style(state.connected))
            .block(Block::bordered()),
        status,
    );

    // ── Body: transcription + badges | summary ───────────────────
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(body);

    let [transcription, badges] =
        Layout::vertical([Constraint::Min(6), Constraint::Length(4)]).areas(left);

    frame.render_widget(
        Paragraph::new(transcript_text(state))
            .wrap(Wrap { trim: false })
            .style(Style::default().bg(theme::PANEL_TEAL).fg(ratatui::style::Color::White))
            .block(Block::bordered().title(Span::styled("Transcription", theme::title_style()))),
        transcription,
    );

    render_badges(frame, badges, state);
    render_summary(frame, right, state);

    // ── Footer ───────────────────────────────────────────────────
    frame.render_widget(
        Paragraph::new(format!(" q quit · {}", staleness_text(state)))
            .style(Style::default().fg(theme::DIM_WHITE)),
        footer,
    );
}

fn render_badges(frame: &mut Frame, area: ratatui::layout::Rect, state: &CallState) {
    let record = state.record.as_ref();

    let kind_style = record.map_or_else(theme::placeholder_badge, |r| {
        Style::default()
            .bg(theme::kind_color(r.kind))
            .fg(ratatui::style::Color::White)
    });
    let severity_style = record.map_or_else(theme::placeholder_badge, |r| {
        theme::severity_style(r.severity)
    });

    let [kind_area, severity_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {} ", kind_label(record)),
            kind_style,
        )))
        .block(Block::bordered().title("Type")),
        kind_area,
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {} ", severity_label(record)),
            severity_style,
        )))
        .block(Block::bordered().title("Severity")),
        severity_area,
    );
}

fn render_summary(frame: &mut Frame, area: ratatui::layout::Rect, state: &CallState) {
    let block = Block::bordered()
        .title(Span::styled("Summary", theme::title_style()))
        .style(Style::default().bg(theme::PANEL_TEAL).fg(ratatui::style::Color::White));

    let paragraph = match state.record.as_ref() {
        Some(record) => {
            let lines = vec![
                Line::from(vec![
                    Span::styled("Department: ", theme::title_style()),
                    Span::raw(record.department.as_deref().unwrap_or("Unknown").to_string()),
                ]),
                Line::from(vec![
                    Span::styled("Risks: ", theme::title_style()),
                    Span::raw(risks_text(record)),
                ]),
                Line::from(vec![
                    Span::styled("Location: ", theme::title_style()),
                    Span::raw(record.location.as_deref().unwrap_or("Unknown").to_string()),
                ]),
                Line::from(""),
                Line::from(Span::styled("Full Transcript:", theme::title_style())),
                Line::from(record.transcript.clone()),
            ];
            Paragraph::new(lines).wrap(Wrap { trim: false })
        }
        None => Paragraph::new("Waiting for incident data..."),
    };

    frame.render_widget(paragraph.block(block), area);
}

// ── Text helpers ─────────────────────────────────────────────────────

pub fn status_text(state: &CallState) -> &'static str {
    if state.connected {
        "Call Ongoing"
    } else {
        "No Ongoing Call"
    }
}

pub fn transcript_text(state: &CallState) -> &str {
    state
        .record
        .as_ref()
        .map_or("Waiting for caller...", |r| r.transcript.as_str())
}

pub fn kind_label(record: Option<&IncidentRecord>) -> String {
    record.map_or_else(|| "UNKNOWN".into(), |r| r.kind.to_string().to_uppercase())
}

pub fn severity_label(record: Option<&IncidentRecord>) -> String {
    record.map_or_else(|| "—".into(), |r| r.severity.to_string().to_uppercase())
}

pub fn risks_text(record: &IncidentRecord) -> String {
    if record.risks.is_empty() {
        "None".into()
    } else {
        record.risks.join(", ")
    }
}

fn staleness_text(state: &CallState) -> String {
    match state.last_event_at {
        Some(at) => {
            let age = (chrono::Utc::now() - at).num_seconds().max(0);
            format!("last event {age}s ago")
        }
        None => "no events yet".into(),
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rapid_core::{CallPhase, IncidentKind, Severity};

    fn record() -> IncidentRecord {
        IncidentRecord {
            transcript: "hello".into(),
            kind: IncidentKind::Fire,
            severity: Severity::High,
            department: Some("fire_station".into()),
            location: None,
            risks: vec!["gas leak".into()],
        }
    }

    fn active_state() -> CallState {
        CallState {
            connected: true,
            phase: CallPhase::Active,
            record: Some(record()),
            last_event_at: None,
        }
    }

    #[test]
    fn status_follows_connected_flag() {
        assert_eq!(status_text(&CallState::default()), "No Ongoing Call");
        assert_eq!(status_text(&active_state()), "Call Ongoing");
    }

    #[test]
    fn placeholders_shown_without_a_record() {
        let idle = CallState::default();
        assert_eq!(transcript_text(&idle), "Waiting for caller...");
        assert_eq!(kind_label(None), "UNKNOWN");
        assert_eq!(severity_label(None), "—");
    }

    #[test]
    fn labels_uppercase_the_wire_values() {
        let state = active_state();
        assert_eq!(transcript_text(&state), "hello");
        assert_eq!(kind_label(state.record.as_ref()), "FIRE");
        assert_eq!(severity_label(state.record.as_ref()), "HIGH");
    }

    #[test]
    fn risks_join_or_none() {
        let mut r = record();
        assert_eq!(risks_text(&r), "gas leak");
        r.risks = vec!["gas leak".into(), "smoke".into()];
        assert_eq!(risks_text(&r), "gas leak, smoke");
        r.risks.clear();
        assert_eq!(risks_text(&r), "None");
    }
}
