//! Target and threshold policy records.
//!
//! These are plain data. Consistency rules (monotonic cut points, bound
//! ordering) are enforced by `indicator-engine` at policy-load time.

use serde::{Deserialize, Serialize};

/// Which side of the scale is "better" for an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementDirection {
    #[default]
    HigherIsBetter,
    LowerIsBetter,
}

impl MeasurementDirection {
    pub fn higher_is_better(self) -> bool {
        matches!(self, MeasurementDirection::HigherIsBetter)
    }

    pub fn from_higher_is_better(higher_is_better: bool) -> Self {
        if higher_is_better {
            MeasurementDirection::HigherIsBetter
        } else {
            MeasurementDirection::LowerIsBetter
        }
    }
}

/// Three cut points that split the value axis into red, yellow and green.
///
/// For higher-is-better bands the cuts are expected to satisfy
/// `red <= yellow <= green`; for lower-is-better bands the order is reversed.
/// Any unset cut makes the band unusable and evaluation reports `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBand {
    #[serde(default)]
    pub red: Option<f64>,
    #[serde(default)]
    pub yellow: Option<f64>,
    #[serde(default)]
    pub green: Option<f64>,
    pub higher_is_better: bool,
}

impl ThresholdBand {
    /// A fully configured band.
    pub fn new(red: f64, yellow: f64, green: f64, higher_is_better: bool) -> Self {
        Self {
            red: Some(red),
            yellow: Some(yellow),
            green: Some(green),
            higher_is_better,
        }
    }

    /// A band with no cut points; always evaluates to `Unknown`.
    pub fn unset(higher_is_better: bool) -> Self {
        Self {
            red: None,
            yellow: None,
            green: None,
            higher_is_better,
        }
    }

    /// All three cut points, if every one is configured.
    pub fn cuts(&self) -> Option<(f64, f64, f64)> {
        Some((self.red?, self.yellow?, self.green?))
    }

    pub fn direction(&self) -> MeasurementDirection {
        MeasurementDirection::from_higher_is_better(self.higher_is_better)
    }
}

impl Default for ThresholdBand {
    fn default() -> Self {
        Self::unset(true)
    }
}

/// Target value, acceptable bounds and alert thresholds for an indicator.
///
/// Every field is optional and independently checked: an indicator may carry
/// a low alert, a high alert, both or neither.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TargetPolicy {
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
    #[serde(default)]
    pub alert_low: Option<f64>,
    #[serde(default)]
    pub alert_high: Option<f64>,
}

impl TargetPolicy {
    pub fn with_target(target: f64) -> Self {
        Self {
            target: Some(target),
            ..Default::default()
        }
    }
}
