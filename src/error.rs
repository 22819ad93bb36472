//! Error types for data sources.

use thiserror::Error;

/// Errors that can occur while locating or opening a telemetry source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No serial port on the system could be opened.
    #[error("no serial port found")]
    NoPortFound,

    /// Listing the system's serial ports failed.
    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(#[source] tokio_serial::Error),

    /// The requested serial port could not be opened.
    #[error("failed to open serial port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: tokio_serial::Error,
    },
}
