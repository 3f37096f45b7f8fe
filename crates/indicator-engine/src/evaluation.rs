//! Per-indicator evaluation.
//!
//! Turns an indicator's policy plus its measurement history into the derived
//! signals shown on dashboards and reports. Evaluation is a pure function of
//! its inputs: evaluating the same indicator and history twice yields the same
//! result.

use chrono::NaiveDate;
use indicator_types::{
    Indicator, IndicatorId, IndicatorKind, Measurement, SuccessFactorId, TargetPolicy,
};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::band::{evaluate_band, BandStatus};
use crate::config::{CoarseStatusThresholds, EvaluationConfig};
use crate::derived::{Derived, InsufficientData};
use crate::error::{ConfigurationError, EngineError, EngineResult};
use crate::policy::validate_indicator;
use crate::trend::{classify_trend, Trend};

/// Coarse attainment of target, independent of the Red/Yellow/Green band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoarseStatus {
    Achieved,
    OnTarget,
    BelowTarget,
    AtRisk,
}

impl CoarseStatus {
    pub fn from_achievement(pct: f64, thresholds: &CoarseStatusThresholds) -> Self {
        if pct >= thresholds.achieved_pct {
            CoarseStatus::Achieved
        } else if pct >= thresholds.on_target_pct {
            CoarseStatus::OnTarget
        } else if pct >= thresholds.below_target_pct {
            CoarseStatus::BelowTarget
        } else {
            CoarseStatus::AtRisk
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CoarseStatus::Achieved => "Achieved",
            CoarseStatus::OnTarget => "On Target",
            CoarseStatus::BelowTarget => "Below Target",
            CoarseStatus::AtRisk => "At Risk",
        }
    }
}

/// Which alert threshold a value breached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "side", rename_all = "snake_case")]
pub enum AlertBreach {
    BelowLow { threshold: f64 },
    AboveHigh { threshold: f64 },
}

/// Alert outcome for the current value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlertState {
    pub triggered: bool,
    pub breach: Option<AlertBreach>,
}

impl AlertState {
    fn clear() -> Self {
        Self {
            triggered: false,
            breach: None,
        }
    }

    fn breached(breach: AlertBreach) -> Self {
        Self {
            triggered: true,
            breach: Some(breach),
        }
    }
}

/// All derived signals for one indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorEvaluation {
    pub indicator_id: IndicatorId,
    pub code: String,
    pub kind: IndicatorKind,
    pub success_factor_id: SuccessFactorId,

    /// Active measurements considered
    pub measurement_count: usize,

    /// Value of the latest measurement by date (ties: latest recorded)
    pub current_value: Derived<f64>,

    /// Date of the measurement behind `current_value`
    pub as_of: Option<NaiveDate>,

    /// `current / target * 100`
    pub achievement_pct: Derived<f64>,

    /// `current - target`. Positive means above target, which is
    /// unfavourable for lower-is-better indicators; the sign is never flipped.
    pub variance: Derived<f64>,

    pub trend: Derived<Trend>,

    pub band: BandStatus,

    pub coarse_status: Derived<CoarseStatus>,

    pub alert: Derived<AlertState>,

    /// Whether the current value lies inside the acceptable min/max bounds
    pub within_bounds: Derived<bool>,
}

impl IndicatorEvaluation {
    /// `true` only when a current value exists and breaches an alert threshold.
    pub fn alert_triggered(&self) -> bool {
        self.alert.value().is_some_and(|a| a.triggered)
    }

    pub fn has_data(&self) -> bool {
        self.current_value.is_available()
    }
}

/// Evaluate one indicator against its measurement history.
///
/// `measurements` may be in any order; superseded records are ignored.
/// Missing data never fails: it shows up as [`Derived::Insufficient`].
/// An inconsistent policy or engine config, or a measurement belonging to
/// another indicator, is an error.
#[instrument(skip_all, fields(code = %indicator.code))]
pub fn evaluate_indicator(
    indicator: &Indicator,
    measurements: &[Measurement],
    config: &EvaluationConfig,
) -> EngineResult<IndicatorEvaluation> {
    config.validate()?;
    validate_indicator(indicator)?;

    if config.strict_targets && indicator.target.target.is_none() {
        return Err(ConfigurationError::MissingTarget {
            code: indicator.code.clone(),
        }
        .into());
    }

    if let Some(foreign) = measurements
        .iter()
        .find(|m| m.indicator_id != indicator.id)
    {
        return Err(EngineError::ForeignMeasurement {
            measurement_id: foreign.id,
            expected: indicator.id,
            actual: foreign.indicator_id,
        });
    }

    let history = chronological(measurements);
    let values: Vec<f64> = history.iter().map(|m| m.value).collect();
    let latest = history.last();

    let current_value = match latest {
        Some(m) => Derived::Available(m.value),
        None => Derived::Insufficient(InsufficientData::NoMeasurements),
    };

    let achievement_pct = current_value.and_then(|v| achievement(v, &indicator.target));
    let variance = current_value.and_then(|v| match indicator.target.target {
        Some(target) => Derived::Available(v - target),
        None => Derived::Insufficient(InsufficientData::NoTarget),
    });

    let band = match current_value.get() {
        Some(v) => evaluate_band(v, &indicator.band),
        None => BandStatus::Unknown,
    };

    let coarse_status =
        achievement_pct.map(|pct| CoarseStatus::from_achievement(pct, &config.coarse_status));

    let alert = current_value.map(|v| alert_state(v, &indicator.target));
    let within_bounds = current_value.and_then(|v| bounds_check(v, &indicator.target));
    let trend = classify_trend(&values, indicator.direction, &config.trend)?;

    debug!(
        measurements = history.len(),
        band = ?band,
        alert = alert.value().is_some_and(|a| a.triggered),
        "Indicator evaluated"
    );

    Ok(IndicatorEvaluation {
        indicator_id: indicator.id,
        code: indicator.code.clone(),
        kind: indicator.kind,
        success_factor_id: indicator.success_factor_id,
        measurement_count: history.len(),
        current_value,
        as_of: latest.map(|m| m.measured_on),
        achievement_pct,
        variance,
        trend,
        band,
        coarse_status,
        alert,
        within_bounds,
    })
}

/// Active measurements ordered by date, then by recording time.
pub fn chronological(measurements: &[Measurement]) -> Vec<&Measurement> {
    let mut history: Vec<&Measurement> = measurements.iter().filter(|m| m.is_active()).collect();
    history.sort_by(|a, b| {
        a.measured_on
            .cmp(&b.measured_on)
            .then(a.recorded_at.cmp(&b.recorded_at))
    });
    history
}

/// `value / target * 100`; unavailable for a missing, zero or negative target.
pub fn achievement(value: f64, policy: &TargetPolicy) -> Derived<f64> {
    match policy.target {
        None => Derived::Insufficient(InsufficientData::NoTarget),
        Some(t) if t == 0.0 => Derived::Insufficient(InsufficientData::ZeroTarget),
        Some(t) if t < 0.0 => Derived::Insufficient(InsufficientData::NegativeTarget),
        Some(t) => Derived::Available(value / t * 100.0),
    }
}

fn alert_state(value: f64, policy: &TargetPolicy) -> AlertState {
    if let Some(low) = policy.alert_low {
        if value < low {
            return AlertState::breached(AlertBreach::BelowLow { threshold: low });
        }
    }
    if let Some(high) = policy.alert_high {
        if value > high {
            return AlertState::breached(AlertBreach::AboveHigh { threshold: high });
        }
    }
    AlertState::clear()
}

fn bounds_check(value: f64, policy: &TargetPolicy) -> Derived<bool> {
    if policy.minimum.is_none() && policy.maximum.is_none() {
        return Derived::Insufficient(InsufficientData::NotConfigured);
    }
    let above_min = policy.minimum.map_or(true, |min| value >= min);
    let below_max = policy.maximum.map_or(true, |max| value <= max);
    Derived::Available(above_min && below_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use indicator_types::{MeasurementId, ThresholdBand};

    fn indicator() -> Indicator {
        Indicator::new("KPI-001", "On-time delivery", IndicatorKind::Kpi, SuccessFactorId::generate())
            .with_target(TargetPolicy {
                target: Some(100.0),
                minimum: Some(0.0),
                maximum: Some(120.0),
                alert_low: Some(40.0),
                alert_high: Some(110.0),
            })
            .with_band(ThresholdBand::new(50.0, 70.0, 90.0, true))
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn measurement(ind: &Indicator, value: f64, date: NaiveDate, recorded_secs: i64) -> Measurement {
        Measurement {
            id: MeasurementId::generate(),
            indicator_id: ind.id,
            value,
            measured_on: date,
            period: date.format("%Y-%m-%d").to_string(),
            status: Default::default(),
            notes: None,
            recorded_by: "analyst".into(),
            recorded_at: Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()
                + Duration::seconds(recorded_secs),
            superseded_by: None,
        }
    }

    #[test]
    fn empty_history_is_insufficient_everywhere() {
        let ind = indicator();
        let eval = evaluate_indicator(&ind, &[], &EvaluationConfig::default()).unwrap();
        assert_eq!(eval.current_value, Derived::Insufficient(InsufficientData::NoMeasurements));
        assert_eq!(eval.achievement_pct, Derived::Insufficient(InsufficientData::NoMeasurements));
        assert_eq!(eval.variance, Derived::Insufficient(InsufficientData::NoMeasurements));
        assert_eq!(eval.trend, Derived::Insufficient(InsufficientData::NoMeasurements));
        assert_eq!(eval.band, BandStatus::Unknown);
        assert!(!eval.alert.is_available());
        assert!(!eval.alert_triggered());
        assert!(!eval.has_data());
    }

    #[test]
    fn current_value_is_latest_by_date_regardless_of_input_order() {
        let ind = indicator();
        let ms = vec![
            measurement(&ind, 95.0, day(3), 0),
            measurement(&ind, 60.0, day(1), 1),
            measurement(&ind, 80.0, day(2), 2),
        ];
        let eval = evaluate_indicator(&ind, &ms, &EvaluationConfig::default()).unwrap();
        assert_eq!(eval.current_value.get(), Some(95.0));
        assert_eq!(eval.as_of, Some(day(3)));
        assert_eq!(eval.measurement_count, 3);
        assert_eq!(eval.trend.get(), Some(Trend::Improving));
    }

    #[test]
    fn same_day_tie_broken_by_latest_recording() {
        let ind = indicator();
        let ms = vec![
            measurement(&ind, 75.0, day(5), 100),
            measurement(&ind, 65.0, day(5), 10),
        ];
        let eval = evaluate_indicator(&ind, &ms, &EvaluationConfig::default()).unwrap();
        assert_eq!(eval.current_value.get(), Some(75.0));
    }

    #[test]
    fn achievement_variance_band_and_coarse_status() {
        let ind = indicator();
        let ms = vec![measurement(&ind, 80.0, day(1), 0)];
        let eval = evaluate_indicator(&ind, &ms, &EvaluationConfig::default()).unwrap();
        assert_eq!(eval.achievement_pct.get(), Some(80.0));
        assert_eq!(eval.variance.get(), Some(-20.0));
        assert_eq!(eval.band, BandStatus::Yellow);
        assert_eq!(eval.coarse_status.get(), Some(CoarseStatus::OnTarget));
        assert_eq!(eval.within_bounds.get(), Some(true));
        assert!(!eval.alert_triggered());
    }

    #[test]
    fn coarse_status_and_band_may_disagree() {
        let mut ind = indicator();
        ind.band = ThresholdBand::new(96.0, 98.0, 99.0, true);
        let ms = vec![measurement(&ind, 80.0, day(1), 0)];
        let eval = evaluate_indicator(&ind, &ms, &EvaluationConfig::default()).unwrap();
        assert_eq!(eval.band, BandStatus::Red);
        assert_eq!(eval.coarse_status.get(), Some(CoarseStatus::OnTarget));
    }

    #[test]
    fn coarse_status_steps() {
        let t = CoarseStatusThresholds::default();
        assert_eq!(CoarseStatus::from_achievement(120.0, &t), CoarseStatus::Achieved);
        assert_eq!(CoarseStatus::from_achievement(100.0, &t), CoarseStatus::Achieved);
        assert_eq!(CoarseStatus::from_achievement(75.0, &t), CoarseStatus::OnTarget);
        assert_eq!(CoarseStatus::from_achievement(50.0, &t), CoarseStatus::BelowTarget);
        assert_eq!(CoarseStatus::from_achievement(49.9, &t), CoarseStatus::AtRisk);
    }

    #[test]
    fn missing_or_zero_target_gives_no_achievement() {
        let mut ind = indicator();
        ind.target.target = None;
        let ms = vec![measurement(&ind, 0.0, day(1), 0)];
        let eval = evaluate_indicator(&ind, &ms, &EvaluationConfig::default()).unwrap();
        assert_eq!(eval.achievement_pct, Derived::Insufficient(InsufficientData::NoTarget));
        assert_eq!(eval.variance, Derived::Insufficient(InsufficientData::NoTarget));
        assert_eq!(eval.coarse_status, Derived::Insufficient(InsufficientData::NoTarget));

        ind.target.target = Some(0.0);
        let eval = evaluate_indicator(&ind, &ms, &EvaluationConfig::default()).unwrap();
        assert_eq!(eval.achievement_pct, Derived::Insufficient(InsufficientData::ZeroTarget));
        // Variance against a zero target is still well defined
        assert_eq!(eval.variance.get(), Some(0.0));
    }

    #[test]
    fn negative_target_gives_no_achievement() {
        let mut ind = indicator();
        ind.target = TargetPolicy::with_target(-10.0);
        let ms = vec![measurement(&ind, -12.0, day(1), 0)];
        let eval = evaluate_indicator(&ind, &ms, &EvaluationConfig::default()).unwrap();
        assert_eq!(eval.achievement_pct, Derived::Insufficient(InsufficientData::NegativeTarget));
        assert_eq!(eval.variance.get(), Some(-2.0));
    }

    #[test]
    fn strict_targets_reject_missing_target() {
        let mut ind = indicator();
        ind.target.target = None;
        let config = EvaluationConfig {
            strict_targets: true,
            ..Default::default()
        };
        assert!(matches!(
            evaluate_indicator(&ind, &[], &config),
            Err(EngineError::Configuration(ConfigurationError::MissingTarget { .. }))
        ));
    }

    #[test]
    fn alerts_checked_independently() {
        let ind = indicator();
        let low = vec![measurement(&ind, 30.0, day(1), 0)];
        let eval = evaluate_indicator(&ind, &low, &EvaluationConfig::default()).unwrap();
        assert!(eval.alert_triggered());
        assert_eq!(
            eval.alert.get().and_then(|a| a.breach),
            Some(AlertBreach::BelowLow { threshold: 40.0 })
        );

        let high = vec![measurement(&ind, 115.0, day(1), 0)];
        let eval = evaluate_indicator(&ind, &high, &EvaluationConfig::default()).unwrap();
        assert_eq!(
            eval.alert.get().and_then(|a| a.breach),
            Some(AlertBreach::AboveHigh { threshold: 110.0 })
        );

        let mut only_high = indicator();
        only_high.target.alert_low = None;
        let low = vec![measurement(&only_high, 1.0, day(1), 0)];
        let eval = evaluate_indicator(&only_high, &low, &EvaluationConfig::default()).unwrap();
        assert_eq!(eval.alert.get(), Some(AlertState::clear()));
    }

    #[test]
    fn bounds_not_configured() {
        let mut ind = indicator();
        ind.target.minimum = None;
        ind.target.maximum = None;
        let ms = vec![measurement(&ind, 130.0, day(1), 0)];
        let eval = evaluate_indicator(&ind, &ms, &EvaluationConfig::default()).unwrap();
        assert_eq!(eval.within_bounds, Derived::Insufficient(InsufficientData::NotConfigured));
    }

    #[test]
    fn superseded_measurements_are_ignored() {
        let ind = indicator();
        let mut old = measurement(&ind, 10.0, day(4), 0);
        let replacement = measurement(&ind, 85.0, day(4), 5);
        old.superseded_by = Some(replacement.id);
        let eval = evaluate_indicator(&ind, &[old, replacement], &EvaluationConfig::default()).unwrap();
        assert_eq!(eval.measurement_count, 1);
        assert_eq!(eval.current_value.get(), Some(85.0));
    }

    #[test]
    fn foreign_measurement_rejected() {
        let ind = indicator();
        let other = indicator();
        let ms = vec![measurement(&other, 50.0, day(1), 0)];
        assert!(matches!(
            evaluate_indicator(&ind, &ms, &EvaluationConfig::default()),
            Err(EngineError::ForeignMeasurement { .. })
        ));
    }

    #[test]
    fn inconsistent_policy_is_an_error() {
        let mut ind = indicator();
        ind.band = ThresholdBand::new(90.0, 70.0, 50.0, true);
        assert!(matches!(
            evaluate_indicator(&ind, &[], &EvaluationConfig::default()),
            Err(EngineError::Configuration(ConfigurationError::NonMonotonicBand { .. }))
        ));
    }

    #[test]
    fn invalid_engine_config_is_an_error() {
        let ind = indicator();
        let ms = vec![measurement(&ind, 50.0, day(1), 0), measurement(&ind, 60.0, day(2), 0)];
        let mut config = EvaluationConfig::default();
        config.trend.fluctuation_min_alternations = 0;
        assert!(matches!(
            evaluate_indicator(&ind, &ms, &config),
            Err(EngineError::Configuration(ConfigurationError::InvalidSetting {
                setting: "trend.fluctuation_min_alternations",
                ..
            }))
        ));

        let mut config = EvaluationConfig::default();
        config.coarse_status.below_target_pct = 120.0;
        assert!(evaluate_indicator(&ind, &[], &config).is_err());
    }
}
