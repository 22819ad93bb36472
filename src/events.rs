use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;

/// Where the `e` key writes its snapshot unless [`App::export_path`] is changed.
pub const EXPORT_PATH: &str = "vaporwatch_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Windows reports releases too
    if key.kind == KeyEventKind::Release {
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // Freeze/unfreeze the charts
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            app.toggle_pause();
            let msg = if app.is_paused() {
                "Charts paused"
            } else {
                "Charts resumed"
            };
            app.set_status_message(msg.to_string());
        }

        // Clear the plotted history
        KeyCode::Char('c') => {
            app.clear_chart();
            app.set_status_message("Chart cleared".to_string());
        }

        // Export
        KeyCode::Char('e') => {
            let export_path = app.export_path.clone();
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::source::{ChannelSource, Reading};
    use crate::telemetry::frame::sample_line;
    use crate::telemetry::PlantLimits;
    use std::time::Instant;

    fn new_app() -> App {
        let (_tx, source) = ChannelSource::create("test");
        let timing = Settings::default().timing().unwrap();
        App::new(Box::new(source), &timing, PlantLimits::default())
    }

    /// App that has already ingested one reading.
    fn app_with_data() -> App {
        let (tx, source) = ChannelSource::create("test");
        let timing = Settings::default().timing().unwrap();
        let mut app = App::new(Box::new(source), &timing, PlantLimits::default());
        tx.send(Reading::now(sample_line().parse().unwrap())).unwrap();
        app.ingest(Instant::now());
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        let mut app = new_app();
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.running);

        let mut app = new_app();
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = new_app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);

        // Closes help instead of quitting
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn test_pause_toggle() {
        let mut app = new_app();
        handle_key_event(&mut app, key(KeyCode::Char('p')));
        assert!(app.is_paused());
        assert_eq!(app.get_status_message(), Some("Charts paused"));

        handle_key_event(&mut app, key(KeyCode::Char(' ')));
        assert!(!app.is_paused());
    }

    #[test]
    fn test_export_without_data_reports_failure() {
        let mut app = new_app();
        handle_key_event(&mut app, key(KeyCode::Char('e')));
        let msg = app.get_status_message().unwrap();
        assert!(msg.starts_with("Export failed"));
    }

    #[test]
    fn test_clear_key_empties_chart() {
        let mut app = app_with_data();
        assert!(!app.chart_window().is_empty());

        handle_key_event(&mut app, key(KeyCode::Char('c')));
        assert!(app.chart_window().is_empty());
        assert!(app.running);
        assert_eq!(app.get_status_message(), Some("Chart cleared"));
    }

    #[test]
    fn test_export_key_writes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_data();
        app.export_path = dir.path().join(EXPORT_PATH);

        handle_key_event(&mut app, key(KeyCode::Char('e')));

        let msg = app.get_status_message().unwrap();
        assert!(msg.starts_with("Exported to"), "got {msg}");
        assert!(msg.ends_with(EXPORT_PATH));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&app.export_path).unwrap()).unwrap();
        assert_eq!(json["latest"]["pressure"], 312.4);
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut app = new_app();
        let mut release = key(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        handle_key_event(&mut app, release);
        assert!(app.running);
    }
}
