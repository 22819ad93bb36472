//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::telemetry::Severity;

const ORANGE: Color = Color::Rgb(0xFF, 0xA5, 0x00);

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for normal status.
    pub normal: Color,
    /// Color for caution-level status and the warning reference line.
    pub caution: Color,
    /// Color for alarm-level status and the emergency reference line.
    pub alarm: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Live pressure trace.
    pub pressure_line: Color,
    /// Live temperature trace.
    pub temperature_line: Color,
    /// Flow A operating band.
    pub flow_a: Color,
    /// Flow B operating band.
    pub flow_b: Color,
    /// Recovery / preheat reference line.
    pub low_reference: Color,
    /// Style for panel and chart titles.
    pub header: Style,
    /// Style for plain labels in the status panel.
    pub label: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            normal: Color::Green,
            caution: ORANGE,
            alarm: Color::Red,
            border: Color::Gray,
            pressure_line: Color::Rgb(0x2E, 0x86, 0xAB),
            temperature_line: Color::Rgb(0xF2, 0x42, 0x36),
            flow_a: Color::Rgb(0x4A, 0x90, 0xE2),
            flow_b: Color::Rgb(0x90, 0x13, 0xFE),
            low_reference: Color::LightBlue,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            normal: Color::Green,
            caution: ORANGE,
            alarm: Color::Red,
            border: Color::DarkGray,
            pressure_line: Color::Rgb(0x2E, 0x86, 0xAB),
            temperature_line: Color::Rgb(0xF2, 0x42, 0x36),
            flow_a: Color::Rgb(0x4A, 0x90, 0xE2),
            flow_b: Color::Rgb(0x90, 0x13, 0xFE),
            low_reference: Color::Blue,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Rgb(0x33, 0x33, 0x33)),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Foreground style for a severity.
    pub fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Normal => Style::default().fg(self.normal),
            Severity::Caution => Style::default().fg(self.caution),
            Severity::Alarm => Style::default().fg(self.alarm).add_modifier(Modifier::BOLD),
        }
    }

    /// Filled badge style for a severity (used by the state and ESD labels).
    pub fn badge_style(&self, severity: Severity) -> Style {
        let (bg, fg) = match severity {
            Severity::Normal => (self.normal, Color::Black),
            Severity::Caution => (self.caution, Color::Black),
            Severity::Alarm => (self.alarm, Color::White),
        };
        Style::default().bg(bg).fg(fg).add_modifier(Modifier::BOLD)
    }
}
