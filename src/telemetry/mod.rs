//! Telemetry models and processing.
//!
//! This module turns raw controller lines into typed frames and keeps the
//! rolling window that the charts draw from.
//!
//! ## Submodules
//!
//! - [`frame`]: Record parsing ([`TelemetryFrame`], [`ParseError`])
//! - [`window`]: Fixed-size chronological sample buffer ([`RollingWindow`])
//! - [`recorder`]: Time axis anchoring and hold-sample gap filling ([`Recorder`])
//! - [`limits`]: Operating limits and severity classification ([`PlantLimits`])
//! - [`duration`]: Parsing and formatting of durations and `mm:ss` clocks
//!
//! ## Data Flow
//!
//! ```text
//! "P:..,T:..,MV:..,..." (serial line)
//!        │
//!        ▼
//! TelemetryFrame::parse()
//!        │
//!        ├──▶ latest frame (status panel, classified by PlantLimits)
//!        │
//!        └──▶ Recorder::record() / fill_gaps() ──▶ RollingWindow (charts)
//! ```

pub mod duration;
pub mod frame;
pub mod limits;
pub mod recorder;
pub mod window;

pub use frame::{ParseError, TelemetryFrame};
pub use limits::{ChannelLimits, PlantLimits, Severity, StateKeywords};
pub use recorder::Recorder;
pub use window::{RollingWindow, Sample};
