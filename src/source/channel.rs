//! Channel-based data source.
//!
//! Receives readings pushed through a tokio channel. Useful when the
//! telemetry arrives through some other transport (or a simulator) that
//! already produces parsed frames.

use tokio::sync::mpsc;

use super::{DataSource, Reading};

/// A data source fed by an unbounded channel of readings.
///
/// # Example
///
/// ```
/// use vaporwatch::ChannelSource;
///
/// // Create a channel pair
/// let (tx, source) = ChannelSource::create("simulator");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::UnboundedReceiver<Reading>,
    description: String,
    closed: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of an unbounded channel
    /// * `source_description` - Where the readings come from (e.g. "simulator")
    pub fn new(receiver: mpsc::UnboundedReceiver<Reading>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
            closed: false,
        }
    }

    /// Create a channel pair for sending readings to a ChannelSource.
    ///
    /// Returns (sender, source).
    pub fn create(source_description: &str) -> (mpsc::UnboundedSender<Reading>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::new(rx, source_description))
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<Reading> {
        match self.receiver.try_recv() {
            Ok(reading) => Some(reading),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                self.closed = true;
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.closed.then(|| "Channel closed".to_string())
    }
}
