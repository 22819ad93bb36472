//! Application state.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use tracing::{info, warn};

use crate::config::Timing;
use crate::events::EXPORT_PATH;
use crate::source::DataSource;
use crate::telemetry::duration::format_clock;
use crate::telemetry::{PlantLimits, Recorder, RollingWindow, Severity, TelemetryFrame};
use crate::ui::Theme;

/// How long a status message stays on screen.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    // Data source
    source: Box<dyn DataSource>,
    recorder: Recorder,
    pub latest: Option<TelemetryFrame>,
    pub last_reading_at: Option<Instant>,
    pub load_error: Option<String>,
    pub limits: PlantLimits,
    started_at: Instant,

    // Charts frozen by the user; ingestion continues underneath
    frozen: Option<RollingWindow>,

    // UI
    pub theme: Theme,
    pub export_path: PathBuf,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from `source`.
    pub fn new(source: Box<dyn DataSource>, timing: &Timing, limits: PlantLimits) -> Self {
        Self {
            running: true,
            show_help: false,
            source,
            recorder: Recorder::new(timing.capacity, timing.sample_interval),
            latest: None,
            last_reading_at: None,
            load_error: None,
            limits,
            started_at: Instant::now(),
            frozen: None,
            theme: Theme::dark(),
            export_path: PathBuf::from(EXPORT_PATH),
            status_message: None,
        }
    }

    /// Replace the colour theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// Window the charts should draw: the frozen copy while paused.
    pub fn chart_window(&self) -> &RollingWindow {
        self.frozen.as_ref().unwrap_or_else(|| self.recorder.window())
    }

    /// X-axis bounds for the charts.
    pub fn chart_bounds(&self) -> [f64; 2] {
        match &self.frozen {
            Some(window) => window.time_bounds(self.recorder.margin()),
            None => self.recorder.time_bounds(),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.frozen.is_some()
    }

    /// Drain the source and advance the chart to `now`.
    ///
    /// Returns the number of real readings received.
    pub fn ingest(&mut self, now: Instant) -> usize {
        let mut received = 0;
        while let Some(reading) = self.source.poll() {
            self.recorder.record(reading.received_at, &reading.frame);
            self.latest = Some(reading.frame);
            self.last_reading_at = Some(reading.received_at);
            received += 1;
        }

        if received > 0 {
            self.load_error = None;
        } else if let Some(err) = self.source.error() {
            if self.load_error.as_deref() != Some(err.as_str()) {
                warn!(source = self.source.description(), error = %err, "telemetry source error");
            }
            self.load_error = Some(err);
        }

        self.recorder.fill_gaps(now);
        received
    }

    /// Time since the application started.
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    pub fn elapsed_label(&self, now: Instant) -> String {
        format!("Elapsed: {}", format_clock(self.elapsed(now).as_secs_f64()))
    }

    /// ESD engaged according to the latest frame.
    pub fn esd_active(&self) -> bool {
        self.latest
            .as_ref()
            .is_some_and(|f| self.limits.keywords.esd_active(&f.esd))
    }

    /// Severity of the reported system state, if any frame arrived yet.
    pub fn state_severity(&self) -> Option<Severity> {
        self.latest
            .as_ref()
            .map(|f| self.limits.keywords.classify_state(&f.state))
    }

    /// Freeze or unfreeze the charts.
    pub fn toggle_pause(&mut self) {
        self.frozen = match self.frozen.take() {
            Some(_) => None,
            None => Some(self.recorder.window().clone()),
        };
    }

    /// Drop the plotted history.
    pub fn clear_chart(&mut self) {
        self.recorder.clear();
        if self.frozen.is_some() {
            self.frozen = Some(self.recorder.window().clone());
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Export the latest frame and the live window to a JSON file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(ref latest) = self.latest else {
            bail!("No data to export");
        };

        let now = Instant::now();
        let export = serde_json::json!({
            "source": self.source.description(),
            "elapsed_secs": self.elapsed(now).as_secs_f64(),
            "latest": latest,
            "esd_active": self.esd_active(),
            "state_severity": self.state_severity(),
            "pressure_severity": self.limits.pressure.classify(latest.pressure),
            "temperature_severity": self.limits.temperature.classify(latest.temperature),
            "samples": self.recorder.window().iter().collect::<Vec<_>>(),
        });

        let json = serde_json::to_string_pretty(&export)?;
        std::fs::write(path, json)?;

        info!(path = %path.display(), samples = self.recorder.window().len(), "exported state");
        Ok(())
    }
}
