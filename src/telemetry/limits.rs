//! Plant operating limits and status classification.
//!
//! These drive both the reference lines drawn on the charts and the colour
//! of the status panel.

use serde::{Deserialize, Serialize};

/// Severity of a reading or reported plant state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Normal,
    Caution,
    Alarm,
}

impl Severity {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Normal => "OK",
            Severity::Caution => "WARN",
            Severity::Alarm => "ALARM",
        }
    }
}

/// Limits for one charted channel (pressure or temperature).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelLimits {
    /// Upper warning threshold.
    pub warn_high: f64,
    /// Upper emergency threshold.
    pub emergency_high: f64,
    /// Lower warning threshold.
    pub warn_low: f64,
    /// Lower reference line (recovery for pressure, preheat for temperature).
    pub low_reference: f64,
    /// Legend label for `low_reference`.
    pub low_reference_label: String,
    /// Fixed y-axis range.
    pub axis: [f64; 2],
    /// Operating band for flow profile A.
    pub flow_a: [f64; 2],
    /// Operating band for flow profile B.
    pub flow_b: [f64; 2],
}

impl ChannelLimits {
    /// Default pressure limits in kPa.
    pub fn pressure() -> Self {
        Self {
            warn_high: 380.0,
            emergency_high: 460.0,
            warn_low: 250.0,
            low_reference: 220.0,
            low_reference_label: "Recovery".to_string(),
            axis: [150.0, 500.0],
            flow_a: [310.0, 350.0],
            flow_b: [260.0, 300.0],
        }
    }

    /// Default temperature limits in °C.
    pub fn temperature() -> Self {
        Self {
            warn_high: 170.0,
            emergency_high: 190.0,
            warn_low: 120.0,
            low_reference: 110.0,
            low_reference_label: "Preheat".to_string(),
            axis: [80.0, 220.0],
            flow_a: [140.0, 160.0],
            flow_b: [160.0, 170.0],
        }
    }

    /// Classify a reading against the thresholds.
    pub fn classify(&self, value: f64) -> Severity {
        if value >= self.emergency_high {
            Severity::Alarm
        } else if value >= self.warn_high || value <= self.warn_low {
            Severity::Caution
        } else {
            Severity::Normal
        }
    }
}

/// Words the controller uses in its state and ESD fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateKeywords {
    /// Any of these in the state text means the plant is in alarm.
    pub alarm: Vec<String>,
    /// Any of these in the state text means the plant needs attention.
    pub caution: Vec<String>,
    /// Value of the ESD field when emergency shutdown is engaged.
    pub esd_active: String,
}

impl Default for StateKeywords {
    fn default() -> Self {
        let words = |list: &[&str]| list.iter().map(|w| w.to_string()).collect();
        Self {
            alarm: words(&["Alivio", "Purga", "Emergencia"]),
            caution: words(&["Advertencia", "Recuperación", "Precalentamiento"]),
            esd_active: "Activado".to_string(),
        }
    }
}

impl StateKeywords {
    /// Classify the free-text system state. Alarm words win over caution words.
    pub fn classify_state(&self, state: &str) -> Severity {
        if self.alarm.iter().any(|w| state.contains(w.as_str())) {
            Severity::Alarm
        } else if self.caution.iter().any(|w| state.contains(w.as_str())) {
            Severity::Caution
        } else {
            Severity::Normal
        }
    }

    pub fn esd_active(&self, esd: &str) -> bool {
        esd == self.esd_active
    }
}

/// All limits used by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantLimits {
    pub pressure: ChannelLimits,
    pub temperature: ChannelLimits,
    pub keywords: StateKeywords,
}

impl Default for PlantLimits {
    fn default() -> Self {
        Self {
            pressure: ChannelLimits::pressure(),
            temperature: ChannelLimits::temperature(),
            keywords: StateKeywords::default(),
        }
    }
}
