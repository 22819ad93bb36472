//! # vaporwatch
//!
//! A terminal dashboard for live telemetry from the VaporSur steam-plant
//! simulator.
//!
//! The controller streams one text record per line over a serial port
//! (pressure, temperature, MV and SH positions, flow profile, mode, ESD,
//! system state, relief and purge valves). This crate reads those records
//! in the background, keeps the last 20 seconds of pressure and temperature
//! in a rolling window and redraws two charts plus a status panel.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌───────────┐    ┌─────────┐   ┌──────────┐ │
//! │  │  app    │───▶│ telemetry │───▶│   ui    │──▶│ Terminal │ │
//! │  │ (state) │    │ (window)  │    │(charts) │   │          │ │
//! │  └────┬────┘    └───────────┘    └─────────┘   └──────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── SerialSource | FileSource | StreamSource   │
//! │  │ (input) │                    | ChannelSource             │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, pause/export and ingestion of readings
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) with
//!   implementations for serial ports, capture files, async streams and channels
//! - **[`telemetry`]**: Record parsing, the rolling window, gap filling and
//!   plant limits
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]** / **[`logging`]**: Layered settings and tracing setup
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Find the controller automatically
//! vaporwatch
//!
//! # Use a specific port
//! vaporwatch --port /dev/ttyUSB0
//!
//! # Replay a captured session
//! vaporwatch --file capture.log
//! ```
//!
//! ### As a library with a channel source
//!
//! ```
//! use vaporwatch::{App, ChannelSource, Reading, Settings, TelemetryFrame};
//! use std::time::Instant;
//!
//! let (tx, source) = ChannelSource::create("simulator");
//! let settings = Settings::default();
//! let mut app = App::new(Box::new(source), &settings.timing().unwrap(), settings.limits);
//!
//! let frame: TelemetryFrame =
//!     "P:320,T:150,MV:40,SH:10,F:A,M:Auto,ESD:Desactivado,ESTADO:Normal,RELIEF:Cerrada,PURGE:Cerrada"
//!         .parse()
//!         .unwrap();
//! tx.send(Reading::now(frame)).unwrap();
//!
//! assert_eq!(app.ingest(Instant::now()), 1);
//! ```
//!
//! ### As a library with a stream source
//!
//! ```no_run
//! use std::io::Cursor;
//! use vaporwatch::StreamSource;
//!
//! # tokio_test::block_on(async {
//! // In practice, a TcpStream bridged from the controller
//! let stream = Cursor::new(b"P:320,T:150,MV:40,SH:10,F:A,M:Auto,ESD:Desactivado,ESTADO:Normal,RELIEF:Cerrada,PURGE:Cerrada\n".to_vec());
//! let source = StreamSource::spawn(stream, "bridge");
//! # });
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod source;
pub mod telemetry;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::{Settings, Timing};
pub use error::SourceError;
pub use source::{ChannelSource, DataSource, FileSource, Reading, SerialSource, StreamSource};
pub use telemetry::{
    ChannelLimits, ParseError, PlantLimits, Recorder, RollingWindow, Sample, Severity,
    TelemetryFrame,
};
