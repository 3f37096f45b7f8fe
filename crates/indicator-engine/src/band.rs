//! Threshold band evaluation.

use indicator_types::ThresholdBand;
use serde::Serialize;

use crate::error::ConfigurationError;

/// Red/Yellow/Green health of a value against a threshold band.
///
/// `Unknown` means the band could not be applied. It is not a severity and
/// must not be treated as `Red`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BandStatus {
    Green,
    Yellow,
    Red,
    Unknown,
}

impl BandStatus {
    /// Severity rank (Green 0, Yellow 1, Red 2); `None` for `Unknown`.
    pub fn severity(self) -> Option<u8> {
        match self {
            BandStatus::Green => Some(0),
            BandStatus::Yellow => Some(1),
            BandStatus::Red => Some(2),
            BandStatus::Unknown => None,
        }
    }

    /// The most severe known status, or `Unknown` when none is known.
    pub fn worst(statuses: impl IntoIterator<Item = BandStatus>) -> BandStatus {
        statuses
            .into_iter()
            .filter(|s| s.is_known())
            .max_by_key(|s| s.severity())
            .unwrap_or(BandStatus::Unknown)
    }

    pub fn is_known(self) -> bool {
        self != BandStatus::Unknown
    }
}

/// Classify `value` against `band`.
///
/// Higher-is-better: `>= green` is Green, `>= yellow` is Yellow, else Red.
/// Lower-is-better mirrors this with `<=`. Any unset cut point, or a NaN
/// value, yields `Unknown`. Cut ordering is not checked here; use
/// [`validate_band`] (or [`ValidatedBand`]) when loading a policy.
pub fn evaluate_band(value: f64, band: &ThresholdBand) -> BandStatus {
    let Some((_, yellow, green)) = band.cuts() else {
        return BandStatus::Unknown;
    };
    if value.is_nan() {
        return BandStatus::Unknown;
    }

    if band.higher_is_better {
        if value >= green {
            BandStatus::Green
        } else if value >= yellow {
            BandStatus::Yellow
        } else {
            BandStatus::Red
        }
    } else if value <= green {
        BandStatus::Green
    } else if value <= yellow {
        BandStatus::Yellow
    } else {
        BandStatus::Red
    }
}

/// Check that configured cut points are finite and ordered for the band's
/// direction. A band with unset cuts is valid (it evaluates to `Unknown`).
pub fn validate_band(band: &ThresholdBand) -> Result<(), ConfigurationError> {
    for (field, cut) in [
        ("band.red", band.red),
        ("band.yellow", band.yellow),
        ("band.green", band.green),
    ] {
        if let Some(value) = cut {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFinite { field, value });
            }
        }
    }

    let Some((red, yellow, green)) = band.cuts() else {
        return Ok(());
    };

    let ordered = if band.higher_is_better {
        red <= yellow && yellow <= green
    } else {
        red >= yellow && yellow >= green
    };

    if !ordered {
        return Err(ConfigurationError::NonMonotonicBand {
            direction: direction_label(band.higher_is_better),
            red,
            yellow,
            green,
        });
    }
    Ok(())
}

pub(crate) fn direction_label(higher_is_better: bool) -> &'static str {
    if higher_is_better {
        "higher-is-better"
    } else {
        "lower-is-better"
    }
}

/// A band whose cut points passed [`validate_band`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedBand(ThresholdBand);

impl ValidatedBand {
    pub fn new(band: ThresholdBand) -> Result<Self, ConfigurationError> {
        validate_band(&band)?;
        Ok(Self(band))
    }

    pub fn evaluate(&self, value: f64) -> BandStatus {
        evaluate_band(value, &self.0)
    }

    pub fn band(&self) -> &ThresholdBand {
        &self.0
    }
}
