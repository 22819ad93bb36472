//! File-based data source.
//!
//! Tails a capture file of telemetry lines, e.g. one written by
//! `cat /dev/ttyUSB0 > capture.log` or a previous session's serial log.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::debug;

use super::{DataSource, Reading};
use crate::telemetry::{ParseError, TelemetryFrame};

/// A data source that reads telemetry lines appended to a file.
///
/// Only complete (newline-terminated) lines are consumed; a partially
/// written last line is picked up once it is finished. Readings are handed
/// out at most once per `pace`, so a finished capture replays at the
/// controller's cadence while a growing file is followed live.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    offset: u64,
    pending: VecDeque<TelemetryFrame>,
    pace: Duration,
    last_emit: Option<Instant>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P, pace: Duration) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            offset: 0,
            pending: VecDeque::new(),
            pace,
            last_emit: None,
        }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read complete lines appended since the last call.
    fn read_new_lines(&mut self) {
        let bytes = match self.read_tail() {
            Ok(bytes) => bytes,
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                return;
            }
        };
        if self
            .last_error
            .as_deref()
            .is_some_and(|err| err.starts_with("Read error"))
        {
            self.last_error = None;
        }

        // Leave an unterminated last line for the next read
        let Some(end) = bytes.iter().rposition(|&b| b == b'\n') else {
            return;
        };
        self.offset += (end + 1) as u64;

        let mut parsed = 0;
        let mut last_failure = None;
        for raw in bytes[..end].split(|&b| b == b'\n') {
            match TelemetryFrame::parse(&String::from_utf8_lossy(raw)) {
                Ok(frame) => {
                    self.pending.push_back(frame);
                    parsed += 1;
                }
                Err(ParseError::Empty) => {}
                Err(e) => {
                    debug!(error = %e, "skipping capture line");
                    last_failure = Some(e);
                }
            }
        }

        self.last_error = match (parsed, last_failure) {
            (0, Some(e)) => Some(format!("Parse error: {}", e)),
            _ => None,
        };
    }

    fn read_tail(&mut self) -> std::io::Result<Vec<u8>> {
        let mut file = File::open(&self.path)?;
        let len = file.metadata()?.len();
        if len < self.offset {
            debug!(path = %self.path.display(), "capture file truncated, restarting");
            self.offset = 0;
        }

        file.seek(SeekFrom::Start(self.offset))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<Reading> {
        if self.pending.is_empty() {
            self.read_new_lines();
        }

        if let Some(last) = self.last_emit {
            if last.elapsed() < self.pace {
                return None;
            }
        }

        let frame = self.pending.pop_front()?;
        let reading = Reading::now(frame);
        self.last_emit = Some(reading.received_at);
        Some(reading)
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }
}
