//! Stream-based data source.
//!
//! Reads newline-terminated telemetry records from an async byte stream.
//! The serial port source is built on top of this; it also works for TCP
//! bridges or anything else implementing `AsyncRead`.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{DataSource, Reading};
use crate::telemetry::{ParseError, TelemetryFrame};

/// Longest line accepted; anything longer is dropped up to its newline.
pub const MAX_LINE_LEN: usize = 1024;

type ErrorSlot = Arc<Mutex<Option<String>>>;

fn set_error(slot: &ErrorSlot, error: Option<String>) {
    if let Ok(mut guard) = slot.lock() {
        *guard = error;
    }
}

/// A data source that receives telemetry from an async stream.
///
/// This source spawns a background task that frames the stream into lines,
/// parses each one and makes the readings available via `poll()`.
/// Invalid UTF-8 is decoded lossily and lines that are not telemetry
/// records are skipped.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use vaporwatch::StreamSource;
///
/// # tokio_test::block_on(async {
/// let data = b"P:300,T:150,MV:40,SH:10,F:A,M:Auto,ESD:Desactivado,ESTADO:Normal,RELIEF:Cerrada,PURGE:Cerrada\n";
/// let stream = Cursor::new(data.to_vec());
/// let source = StreamSource::spawn(stream, "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    receiver: mpsc::Receiver<Reading>,
    description: String,
    last_error: ErrorSlot,
}

impl StreamSource {
    /// Spawn a background task that reads from the given async reader.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        Self::with_description(reader, format!("stream: {}", description))
    }

    pub(crate) fn with_description<R>(reader: R, description: String) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(64);
        let last_error: ErrorSlot = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut buf = Vec::new();
            let mut discarding = false;

            loop {
                buf.clear();
                let mut limited = (&mut reader).take(MAX_LINE_LEN as u64 + 1);
                match limited.read_until(b'\n', &mut buf).await {
                    Ok(0) => {
                        // EOF
                        set_error(&error_handle, Some("Connection closed".to_string()));
                        break;
                    }
                    Ok(_) => {
                        let complete = buf.last() == Some(&b'\n');
                        if discarding {
                            discarding = !complete;
                            continue;
                        }
                        if !complete && buf.len() > MAX_LINE_LEN {
                            debug!(limit = MAX_LINE_LEN, "dropping oversized telemetry line");
                            set_error(
                                &error_handle,
                                Some(format!("Parse error: line longer than {} bytes", MAX_LINE_LEN)),
                            );
                            discarding = true;
                            continue;
                        }

                        let line = String::from_utf8_lossy(&buf);
                        match TelemetryFrame::parse(&line) {
                            Ok(frame) => {
                                let reading = Reading {
                                    received_at: Instant::now(),
                                    frame,
                                };
                                set_error(&error_handle, None);
                                if tx.send(reading).await.is_err() {
                                    // Receiver dropped
                                    break;
                                }
                            }
                            Err(ParseError::Empty) => {}
                            Err(e) => {
                                debug!(error = %e, "skipping telemetry line");
                                set_error(&error_handle, Some(format!("Parse error: {}", e)));
                            }
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "telemetry stream read failed");
                        set_error(&error_handle, Some(format!("Read error: {}", e)));
                        break;
                    }
                }
            }
        });

        Self {
            receiver: rx,
            description,
            last_error,
        }
    }
}

impl DataSource for StreamSource {
    fn poll(&mut self) -> Option<Reading> {
        match self.receiver.try_recv() {
            Ok(reading) => Some(reading),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                if self.error().is_none() {
                    set_error(&self.last_error, Some("Stream disconnected".to_string()));
                }
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|guard| guard.clone())
    }
}
