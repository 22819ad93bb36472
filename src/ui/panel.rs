//! Status panel: plant state, ESD, valves and the current readings.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::telemetry::{Severity, TelemetryFrame};

/// Build the panel lines, in display order.
pub fn panel_lines(app: &App, now: Instant) -> Vec<Line<'static>> {
    let label = app.theme.label;
    let field = |name: &str, value: &str| {
        Line::from(vec![
            Span::styled(format!(" {}: ", name), label),
            Span::styled(value.to_string(), label.add_modifier(Modifier::BOLD)),
        ])
    };

    let mut lines = Vec::new();
    match &app.latest {
        None => {
            lines.push(Line::from(Span::styled(" System state: Starting... ", label)));
            lines.push(Line::from(""));
            lines.push(field("ESD", "--"));
            lines.push(field("Mode", "--"));
            lines.push(field("Flow", "--"));
            lines.push(field("Relief valve", "--"));
            lines.push(field("Purge valve", "--"));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                " P: -- kPa | T: -- °C | MV: --% | SH: --%",
                label,
            )));
        }
        Some(frame) => {
            let state_severity = app.limits.keywords.classify_state(&frame.state);
            lines.push(Line::from(Span::styled(
                format!(" System state: {} ", frame.state),
                app.theme.badge_style(state_severity),
            )));
            lines.push(Line::from(""));

            let esd_severity = if app.esd_active() {
                Severity::Alarm
            } else {
                Severity::Normal
            };
            lines.push(Line::from(Span::styled(
                format!(" ESD: {} ", frame.esd),
                app.theme.badge_style(esd_severity),
            )));
            lines.push(field("Mode", &frame.mode));
            lines.push(field("Flow", &frame.flow));
            lines.push(field("Relief valve", &frame.relief));
            lines.push(field("Purge valve", &frame.purge));
            lines.push(Line::from(""));
            lines.push(readings_line(app, frame));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(" {}", app.elapsed_label(now)),
        label,
    )));
    lines
}

/// The readings line with P and T coloured by their limits.
fn readings_line(app: &App, frame: &TelemetryFrame) -> Line<'static> {
    let label = app.theme.label;
    let pressure_style = app.theme.severity_style(app.limits.pressure.classify(frame.pressure));
    let temperature_style =
        app.theme.severity_style(app.limits.temperature.classify(frame.temperature));

    Line::from(vec![
        Span::styled(" P: ", label),
        Span::styled(format!("{:.1} kPa", frame.pressure), pressure_style),
        Span::styled(" | T: ", label),
        Span::styled(format!("{:.1} °C", frame.temperature), temperature_style),
        Span::styled(
            format!(
                " | MV: {:.1}% | SH: {:.1}%",
                frame.modulating_valve, frame.superheater
            ),
            label,
        ),
    ])
}

/// Render the status panel.
pub fn render(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    let block = Block::default()
        .title(Span::styled(" Plant Status ", app.theme.header))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let paragraph = Paragraph::new(panel_lines(app, now))
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}
