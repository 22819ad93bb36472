//! Layered configuration.
//!
//! Settings are assembled from built-in defaults, an optional TOML file and
//! `VAPORWATCH__*` environment variables (later sources win). Command-line
//! flags are applied on top by the binary.
//!
//! ```toml
//! [serial]
//! port = "/dev/ttyUSB0"
//! baud_rate = 115200
//!
//! [display]
//! sample_interval = "100ms"
//! window = "20s"
//! refresh = "50ms"
//!
//! [logging]
//! file = "vaporwatch.log"
//! level = "info"
//!
//! [limits.pressure]
//! warn_high = 390.0
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::telemetry::duration::parse_duration;
use crate::telemetry::PlantLimits;

/// Baud rate the controller firmware uses.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Largest rolling window accepted, in samples (an hour at 10 ms).
pub const MAX_WINDOW_SAMPLES: usize = 360_000;

/// Serial connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    /// Port to open. When unset, the first port that opens is used.
    pub port: Option<String>,
    pub baud_rate: u32,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

/// Chart timing, as duration strings ("100ms", "20s").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Expected controller cadence; also the hold-sample spacing.
    pub sample_interval: String,
    /// Time span kept on the charts.
    pub window: String,
    /// Redraw period.
    pub refresh: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            sample_interval: "100ms".to_string(),
            window: "20s".to_string(),
            refresh: "50ms".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log file. The terminal belongs to the UI, so without a file nothing is logged.
    pub file: Option<PathBuf>,
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

/// Complete application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub serial: SerialSettings,
    pub display: DisplaySettings,
    pub logging: LoggingSettings,
    pub limits: PlantLimits,
}

/// Parsed display timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub sample_interval: Duration,
    pub window: Duration,
    pub refresh: Duration,
    /// Number of samples covering `window` at `sample_interval`.
    pub capacity: usize,
}

impl Settings {
    /// Load settings.
    ///
    /// An explicit `path` must exist. Without one, `vaporwatch.toml` in the
    /// working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Config::try_from(&Settings::default())?;

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("vaporwatch").required(false),
        };

        let config = Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                Environment::with_prefix("VAPORWATCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read configuration")?;

        config.try_deserialize().context("invalid configuration")
    }

    /// Parse the display durations and derive the window capacity.
    pub fn timing(&self) -> Result<Timing> {
        let display = &self.display;
        let sample_interval = parse_duration(&display.sample_interval)
            .with_context(|| format!("invalid sample interval {:?}", display.sample_interval))?;
        let window = parse_duration(&display.window)
            .with_context(|| format!("invalid window {:?}", display.window))?;
        let refresh = parse_duration(&display.refresh)
            .with_context(|| format!("invalid refresh interval {:?}", display.refresh))?;

        if sample_interval.is_zero() {
            bail!("sample interval must be greater than zero");
        }
        if refresh.is_zero() {
            bail!("refresh interval must be greater than zero");
        }

        let samples = (window.as_nanos() / sample_interval.as_nanos()).max(1);
        if samples > MAX_WINDOW_SAMPLES as u128 {
            bail!(
                "window/sample_interval yields {} samples, max {}",
                samples,
                MAX_WINDOW_SAMPLES
            );
        }
        let capacity = samples as usize;

        Ok(Timing {
            sample_interval,
            window,
            refresh,
            capacity,
        })
    }
}
