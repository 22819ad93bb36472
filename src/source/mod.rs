//! Data source abstraction for receiving telemetry readings.
//!
//! This module provides a trait-based abstraction for receiving telemetry
//! from various sources (serial ports, capture files, async streams and
//! in-memory channels).

mod channel;
mod file;
mod serial;
mod stream;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use serial::{describe_port, discover_port, list_ports, SerialSource};
pub use stream::StreamSource;

use std::fmt::Debug;
use std::time::Instant;

use crate::telemetry::TelemetryFrame;

/// A parsed frame stamped with the moment it was received.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub received_at: Instant,
    pub frame: TelemetryFrame,
}

impl Reading {
    /// Stamp a frame with the current time.
    pub fn now(frame: TelemetryFrame) -> Self {
        Self {
            received_at: Instant::now(),
            frame,
        }
    }
}

/// Trait for receiving telemetry from various sources.
///
/// Implementations hand out readings one at a time; the application drains
/// everything available on each refresh tick.
///
/// # Example
///
/// ```
/// use vaporwatch::{DataSource, FileSource};
/// use std::time::Duration;
///
/// let mut source = FileSource::new("capture.log", Duration::ZERO);
/// while let Some(reading) = source.poll() {
///     println!("P = {}", reading.frame.pressure);
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the next reading.
    ///
    /// Returns `Some(reading)` if one is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<Reading>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI header.
    fn description(&self) -> &str;

    /// Returns the most recent error reported by the source, if any.
    fn error(&self) -> Option<String>;
}
