//! Telemetry record parsing.
//!
//! The controller emits one record per line:
//!
//! ```text
//! P:312.4,T:150.0,MV:45.0,SH:12.0,F:A,M:Auto,ESD:Desactivado,ESTADO:Normal,RELIEF:Cerrada,PURGE:Cerrada
//! ```
//!
//! The record is searched anywhere in the line, so boot chatter or a
//! timestamp prefix in front of it is ignored.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

static RECORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"P:([\d.-]+),T:([\d.-]+),MV:([\d.-]+),SH:([\d.-]+),F:(\w+),M:(\w+),ESD:(\w+),ESTADO:([\w\s:]+),RELIEF:(\w+),PURGE:(\w+)",
    )
    .expect("telemetry record pattern is valid")
});

/// Errors produced while parsing a telemetry line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The line was blank after trimming.
    #[error("empty line")]
    Empty,

    /// The line does not contain a telemetry record.
    #[error("no telemetry record in line: {0:?}")]
    Malformed(String),

    /// A numeric field matched the pattern but is not a number (e.g. `1.2.3`).
    #[error("invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// One decoded telemetry record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryFrame {
    /// Boiler pressure in kPa.
    pub pressure: f64,
    /// Steam temperature in °C.
    pub temperature: f64,
    /// Modulating valve (MV) position, percent.
    pub modulating_valve: f64,
    /// Superheater (SH) output, percent.
    pub superheater: f64,
    /// Selected flow profile (`A`, `B`, ...).
    pub flow: String,
    /// Operating mode reported by the controller.
    pub mode: String,
    /// Emergency shutdown (ESD) indicator, as sent by the controller.
    pub esd: String,
    /// Free-text system state, may contain spaces and colons.
    pub state: String,
    /// Relief valve state.
    pub relief: String,
    /// Purge valve state.
    pub purge: String,
}

impl TelemetryFrame {
    /// Parse a single line of controller output.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Empty);
        }

        let caps = RECORD
            .captures(line)
            .ok_or_else(|| ParseError::Malformed(line.to_string()))?;

        let number = |idx: usize, field: &'static str| -> Result<f64, ParseError> {
            let raw = &caps[idx];
            raw.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
                field,
                value: raw.to_string(),
            })
        };

        Ok(Self {
            pressure: number(1, "P")?,
            temperature: number(2, "T")?,
            modulating_valve: number(3, "MV")?,
            superheater: number(4, "SH")?,
            flow: caps[5].to_string(),
            mode: caps[6].to_string(),
            esd: caps[7].to_string(),
            state: caps[8].trim().to_string(),
            relief: caps[9].to_string(),
            purge: caps[10].to_string(),
        })
    }

    /// The one-line readings summary shown in the status panel.
    pub fn summary(&self) -> String {
        format!(
            "P: {:.1} kPa | T: {:.1} °C | MV: {:.1}% | SH: {:.1}%",
            self.pressure, self.temperature, self.modulating_valve, self.superheater
        )
    }
}

impl FromStr for TelemetryFrame {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
pub(crate) fn sample_line() -> &'static str {
    "P:312.4,T:150.0,MV:45.0,SH:12.0,F:A,M:Auto,ESD:Desactivado,ESTADO:Normal,RELIEF:Cerrada,PURGE:Cerrada"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_record() {
        let frame = TelemetryFrame::parse(sample_line()).unwrap();
        assert_eq!(frame.pressure, 312.4);
        assert_eq!(frame.temperature, 150.0);
        assert_eq!(frame.modulating_valve, 45.0);
        assert_eq!(frame.superheater, 12.0);
        assert_eq!(frame.flow, "A");
        assert_eq!(frame.mode, "Auto");
        assert_eq!(frame.esd, "Desactivado");
        assert_eq!(frame.state, "Normal");
        assert_eq!(frame.relief, "Cerrada");
        assert_eq!(frame.purge, "Cerrada");
    }

    #[test]
    fn test_state_with_spaces_and_colons() {
        let line = "P:470,T:195,MV:0,SH:0,F:B,M:Manual,ESD:Activado,ESTADO:Emergencia: Alivio abierto,RELIEF:Abierta,PURGE:Cerrada";
        let frame: TelemetryFrame = line.parse().unwrap();
        assert_eq!(frame.state, "Emergencia: Alivio abierto");
        assert_eq!(frame.esd, "Activado");
        assert_eq!(frame.relief, "Abierta");
    }

    #[test]
    fn test_unicode_words() {
        let line = "P:215,T:105,MV:10,SH:5,F:A,M:Arranque,ESD:Desactivado,ESTADO:Recuperación,RELIEF:Cerrada,PURGE:Cerrada";
        let frame = TelemetryFrame::parse(line).unwrap();
        assert_eq!(frame.state, "Recuperación");
    }

    #[test]
    fn test_record_with_prefix_and_crlf() {
        let line = format!("[boot] {}\r\n", sample_line());
        let frame = TelemetryFrame::parse(&line).unwrap();
        assert_eq!(frame.pressure, 312.4);
    }

    #[test]
    fn test_negative_values() {
        let line = "P:-1.5,T:-20,MV:0,SH:0,F:A,M:Auto,ESD:Desactivado,ESTADO:Normal,RELIEF:Cerrada,PURGE:Cerrada";
        let frame = TelemetryFrame::parse(line).unwrap();
        assert_eq!(frame.pressure, -1.5);
        assert_eq!(frame.temperature, -20.0);
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(TelemetryFrame::parse("   \r\n"), Err(ParseError::Empty));
    }

    #[test]
    fn test_malformed_line() {
        let err = TelemetryFrame::parse("hello controller").unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));

        // Missing the trailing PURGE field
        let err = TelemetryFrame::parse(
            "P:1,T:2,MV:3,SH:4,F:A,M:Auto,ESD:No,ESTADO:Normal,RELIEF:Cerrada",
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
    }

    #[test]
    fn test_invalid_number() {
        let line = "P:1.2.3,T:2,MV:3,SH:4,F:A,M:Auto,ESD:No,ESTADO:Normal,RELIEF:Cerrada,PURGE:Cerrada";
        let err = TelemetryFrame::parse(line).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                field: "P",
                value: "1.2.3".to_string()
            }
        );
    }

    #[test]
    fn test_summary() {
        let frame = TelemetryFrame::parse(sample_line()).unwrap();
        assert_eq!(
            frame.summary(),
            "P: 312.4 kPa | T: 150.0 °C | MV: 45.0% | SH: 12.0%"
        );
    }
}
