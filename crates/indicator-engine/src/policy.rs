//! Load-time validation of an indicator's policy.
//!
//! Everything that can make evaluation mis-rank a value is rejected here so
//! the evaluator itself never has to guess.

use indicator_types::{Indicator, IndicatorKind, TargetPolicy};

use crate::band::{direction_label, validate_band};
use crate::error::ConfigurationError;

/// Validate an indicator's shape, target policy and threshold band.
pub fn validate_indicator(indicator: &Indicator) -> Result<(), ConfigurationError> {
    if indicator.code.trim().is_empty() {
        return Err(ConfigurationError::EmptyCode);
    }

    if indicator.is_key != indicator.kind.is_key() {
        return Err(ConfigurationError::KindKeyMismatch {
            kind: indicator.kind,
            expected: indicator.kind.is_key(),
        });
    }

    if let Some(parent) = indicator.parent_id {
        if indicator.kind == IndicatorKind::Kri {
            return Err(ConfigurationError::UnexpectedParent {
                kind: indicator.kind,
            });
        }
        if parent == indicator.id {
            return Err(ConfigurationError::SelfParent(indicator.id));
        }
    }

    validate_target_policy(&indicator.target)?;
    validate_band(&indicator.band)?;

    // An empty band carries no ordering, so its direction flag is ignored.
    let band = &indicator.band;
    let band_configured = band.red.is_some() || band.yellow.is_some() || band.green.is_some();
    let band_direction = band.direction();
    if band_configured && band_direction != indicator.direction {
        return Err(ConfigurationError::BandDirectionMismatch {
            band: direction_label(band_direction.higher_is_better()),
            indicator: direction_label(indicator.direction.higher_is_better()),
        });
    }

    Ok(())
}

/// Validate target, acceptable bounds and alert thresholds.
pub fn validate_target_policy(policy: &TargetPolicy) -> Result<(), ConfigurationError> {
    for (field, value) in [
        ("target", policy.target),
        ("minimum", policy.minimum),
        ("maximum", policy.maximum),
        ("alert_low", policy.alert_low),
        ("alert_high", policy.alert_high),
    ] {
        if let Some(value) = value {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFinite { field, value });
            }
        }
    }

    if let (Some(low), Some(high)) = (policy.minimum, policy.maximum) {
        if low > high {
            return Err(ConfigurationError::InvertedBounds {
                low_field: "minimum",
                low,
                high_field: "maximum",
                high,
            });
        }
    }

    if let (Some(low), Some(high)) = (policy.alert_low, policy.alert_high) {
        if low > high {
            return Err(ConfigurationError::InvertedBounds {
                low_field: "alert_low",
                low,
                high_field: "alert_high",
                high,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicator_types::{IndicatorId, MeasurementDirection, SuccessFactorId, ThresholdBand};

    fn kpi() -> Indicator {
        Indicator::new("KPI-001", "On-time delivery", IndicatorKind::Kpi, SuccessFactorId::generate())
            .with_target(TargetPolicy::with_target(95.0))
            .with_band(ThresholdBand::new(80.0, 90.0, 95.0, true))
    }

    #[test]
    fn valid_indicator_passes() {
        assert!(validate_indicator(&kpi()).is_ok());
    }

    #[test]
    fn empty_code_rejected() {
        let mut ind = kpi();
        ind.code = "  ".into();
        assert_eq!(validate_indicator(&ind), Err(ConfigurationError::EmptyCode));
    }

    #[test]
    fn kind_and_key_flag_must_agree() {
        let mut ind = kpi();
        ind.is_key = false;
        assert!(matches!(
            validate_indicator(&ind),
            Err(ConfigurationError::KindKeyMismatch { kind: IndicatorKind::Kpi, expected: true })
        ));
    }

    #[test]
    fn kri_with_parent_rejected() {
        let ind = Indicator::new("KRI-001", "Revenue growth", IndicatorKind::Kri, SuccessFactorId::generate())
            .with_parent(IndicatorId::generate());
        assert!(matches!(
            validate_indicator(&ind),
            Err(ConfigurationError::UnexpectedParent { .. })
        ));
    }

    #[test]
    fn self_parent_rejected() {
        let mut ind = kpi();
        ind.parent_id = Some(ind.id);
        assert_eq!(validate_indicator(&ind), Err(ConfigurationError::SelfParent(ind.id)));
    }

    #[test]
    fn non_monotonic_band_rejected() {
        let mut ind = kpi();
        ind.band = ThresholdBand::new(80.0, 95.0, 90.0, true);
        assert!(matches!(
            validate_indicator(&ind),
            Err(ConfigurationError::NonMonotonicBand { .. })
        ));
    }

    #[test]
    fn band_direction_must_match_indicator() {
        let mut ind = kpi();
        ind.direction = MeasurementDirection::LowerIsBetter;
        assert!(matches!(
            validate_indicator(&ind),
            Err(ConfigurationError::BandDirectionMismatch { .. })
        ));
    }

    #[test]
    fn empty_band_direction_is_ignored() {
        let mut ind = kpi();
        ind.band = ThresholdBand::unset(true);
        ind.direction = MeasurementDirection::LowerIsBetter;
        assert!(validate_indicator(&ind).is_ok());
    }

    #[test]
    fn inverted_bounds_rejected() {
        let policy = TargetPolicy {
            minimum: Some(10.0),
            maximum: Some(5.0),
            ..Default::default()
        };
        assert!(matches!(
            validate_target_policy(&policy),
            Err(ConfigurationError::InvertedBounds { low_field: "minimum", .. })
        ));

        let policy = TargetPolicy {
            alert_low: Some(50.0),
            alert_high: Some(20.0),
            ..Default::default()
        };
        assert!(matches!(
            validate_target_policy(&policy),
            Err(ConfigurationError::InvertedBounds { low_field: "alert_low", .. })
        ));
    }

    #[test]
    fn one_sided_alerts_are_fine() {
        let policy = TargetPolicy {
            alert_low: Some(50.0),
            ..Default::default()
        };
        assert!(validate_target_policy(&policy).is_ok());
    }

    #[test]
    fn non_finite_target_rejected() {
        let policy = TargetPolicy::with_target(f64::NAN);
        assert!(matches!(
            validate_target_policy(&policy),
            Err(ConfigurationError::NonFinite { field: "target", .. })
        ));
    }
}
