//! Common UI components.
//!
//! This module contains the header bar, status bar, help overlay and the
//! undersized-terminal notice.

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::telemetry::duration::format_duration;

/// Render the header bar.
///
/// Displays: overall status indicator, source description, live/paused badge.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (indicator, status_style) = match app.state_severity() {
        Some(severity) => (
            format!(" ● {} ", severity.symbol()),
            app.theme.severity_style(severity),
        ),
        None => (" ● ".to_string(), Style::default().add_modifier(Modifier::DIM)),
    };

    let badge = if app.is_paused() {
        Span::styled(
            " PAUSED ",
            Style::default().fg(app.theme.caution).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            " LIVE ",
            Style::default().fg(app.theme.normal).add_modifier(Modifier::BOLD),
        )
    };

    let line = Line::from(vec![
        Span::styled(indicator, status_style),
        Span::styled("VAPORWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::raw(app.source_description().to_string()),
        Span::raw(" │"),
        badge,
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the status bar at the bottom.
///
/// Shows a temporary message if one is active, otherwise the source error
/// or the window fill and time since the last reading, followed by key hints.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = "p:pause c:clear e:export ?:help q:quit";

    let (status, style) = if let Some(ref err) = app.load_error {
        (
            format!(" Error: {} | {}", err, controls),
            Style::default().fg(app.theme.alarm),
        )
    } else if let Some(last) = app.last_reading_at {
        let window = app.recorder().window();
        (
            format!(
                " {}/{} samples | Last reading {} ago | {}",
                window.len(),
                window.capacity(),
                format_duration(now.saturating_duration_since(last)),
                controls,
            ),
            Style::default().add_modifier(Modifier::DIM),
        )
    } else {
        (
            format!(" Waiting for telemetry... | {}", controls),
            Style::default().add_modifier(Modifier::DIM),
        )
    };

    frame.render_widget(Paragraph::new(status).style(style), area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the dashboard.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from("  p / Space   Pause or resume charts"),
        Line::from("  c           Clear chart history"),
        Line::from("  e           Export to JSON"),
        Line::from("  ?           Toggle this help"),
        Line::from("  q / Esc     Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 11u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// Render the notice shown when the terminal is below the minimum size.
pub fn render_too_small(frame: &mut Frame, area: Rect, min_width: u16, min_height: u16) {
    let msg = format!(
        "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
        area.width, area.height, min_width, min_height
    );
    let paragraph = Paragraph::new(msg)
        .alignment(Alignment::Center)
        .style(Style::default().fg(ratatui::style::Color::Yellow));
    let top = (area.height / 2).saturating_sub(2);
    let centered = Rect::new(area.x, area.y + top, area.width, 5u16.min(area.height - top));
    frame.render_widget(paragraph, centered);
}
