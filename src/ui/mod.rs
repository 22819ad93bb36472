//! Terminal rendering.
//!
//! ```text
//! ┌ header ─────────────────────────────────────────────────┐
//! │ ┌ Pressure ─────────────────────────┐ ┌ Plant Status ──┐ │
//! │ └───────────────────────────────────┘ │                │ │
//! │ ┌ Temperature ──────────────────────┐ │                │ │
//! │ └───────────────────────────────────┘ └────────────────┘ │
//! └ status bar ─────────────────────────────────────────────┘
//! ```

pub mod charts;
pub mod common;
pub mod panel;
pub mod theme;

pub use theme::Theme;

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Layout},
    Frame,
};

use crate::app::App;

/// Minimum terminal width for a usable display.
pub const MIN_WIDTH: u16 = 60;
/// Minimum terminal height for a usable display.
pub const MIN_HEIGHT: u16 = 16;

/// Narrowest the status panel may get before the charts give up width.
pub const PANEL_MIN_WIDTH: u16 = 34;

/// Draw the whole dashboard.
pub fn render(frame: &mut Frame, app: &App, now: Instant) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        common::render_too_small(frame, area, MIN_WIDTH, MIN_HEIGHT);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Min(12),   // Charts and panel
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);

    // Charts take 80% unless that squeezes the panel below its minimum
    let body = Layout::horizontal([Constraint::Percentage(80), Constraint::Min(PANEL_MIN_WIDTH)])
        .split(chunks[1]);

    let charts = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(body[0]);
    charts::render_pressure(frame, app, charts[0]);
    charts::render_temperature(frame, app, charts[1]);

    panel::render(frame, app, body[1], now);

    common::render_status_bar(frame, app, chunks[2], now);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::source::{ChannelSource, Reading};
    use crate::telemetry::{PlantLimits, TelemetryFrame};
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn draw(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame, app, Instant::now())).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn test_app() -> (tokio::sync::mpsc::UnboundedSender<Reading>, App) {
        let (tx, source) = ChannelSource::create("bench");
        let timing = Settings::default().timing().unwrap();
        (tx, App::new(Box::new(source), &timing, PlantLimits::default()))
    }

    #[test]
    fn test_render_waiting() {
        let (_tx, app) = test_app();
        let screen = draw(&app, 120, 40);

        assert!(screen.contains("VAPORWATCH"));
        assert!(screen.contains("channel: bench"));
        assert!(screen.contains("Pressure (kPa) vs Time"));
        assert!(screen.contains("Temperature (°C) vs Time"));
        assert!(screen.contains("System state: Starting..."));
        assert!(screen.contains("Waiting for telemetry"));
    }

    #[test]
    fn test_render_with_data() {
        let (tx, mut app) = test_app();
        let frame = TelemetryFrame::parse(crate::telemetry::frame::sample_line()).unwrap();
        tx.send(Reading::now(frame)).unwrap();
        app.ingest(Instant::now());

        let screen = draw(&app, 120, 40);
        assert!(screen.contains("● OK"));
        assert!(screen.contains("System state: Normal"));
        assert!(screen.contains("ESD: Desactivado"));
        assert!(screen.contains("1/200 samples"));
        assert!(screen.contains("LIVE"));
    }

    #[test]
    fn test_render_paused_and_help() {
        let (_tx, mut app) = test_app();
        app.toggle_pause();
        app.toggle_help();

        let screen = draw(&app, 120, 40);
        assert!(screen.contains("PAUSED"));
        assert!(screen.contains("Keyboard Shortcuts"));
    }

    #[test]
    fn test_charts_take_most_of_the_width() {
        let (_tx, app) = test_app();

        let mut terminal = Terminal::new(TestBackend::new(200, 40)).unwrap();
        terminal.draw(|frame| render(frame, &app, Instant::now())).unwrap();
        let buffer = terminal.backend().buffer();
        // Chart block ends at column 159, panel starts at 160
        assert_eq!(buffer[(159, 1)].symbol(), "╮");
        assert_eq!(buffer[(160, 1)].symbol(), "╭");

        // A narrower terminal keeps the panel readable
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(frame, &app, Instant::now())).unwrap();
        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(120 - PANEL_MIN_WIDTH, 1)].symbol(), "╭");
    }

    #[test]
    fn test_render_too_small() {
        let (_tx, app) = test_app();
        let screen = draw(&app, 40, 10);
        assert!(screen.contains("Terminal too small: 40x10"));
    }
}
