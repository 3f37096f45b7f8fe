//! Measurement recording rules.
//!
//! A measurement is unique per (indicator, date, period). A second value for
//! the same slot is refused unless the caller explicitly asks to supersede
//! the existing record.

use indicator_types::{
    AuditStamp, Indicator, Measurement, MeasurementId, MeasurementStatus, NewMeasurement,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::RecordError;
use crate::period::resolve_period;
use crate::policy::validate_indicator;

/// How to treat an existing record in the same (date, period) slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordMode {
    /// Refuse with [`RecordError::DuplicatePeriod`]
    #[default]
    Reject,
    /// Store the new record and mark the existing one superseded
    Supersede,
}

/// Outcome of a successful recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedMeasurement {
    /// The record to store
    pub measurement: Measurement,

    /// Id of the record that must be marked `superseded_by` the new one
    pub superseded: Option<MeasurementId>,
}

/// Build the measurement to store for `indicator`.
///
/// `history` is the indicator's existing measurements. Nothing is mutated:
/// the caller persists the returned record and, when `superseded` is set,
/// points the old record at the new one.
pub fn record_measurement(
    indicator: &Indicator,
    history: &[Measurement],
    new: NewMeasurement,
    mode: RecordMode,
    stamp: &AuditStamp,
) -> Result<RecordedMeasurement, RecordError> {
    if indicator.status.is_terminal() {
        return Err(RecordError::TerminalState {
            indicator_id: indicator.id,
            status: indicator.status,
        });
    }

    validate_indicator(indicator)?;

    if !new.value.is_finite() {
        return Err(RecordError::InvalidValue(new.value));
    }

    let period = resolve_period(new.period.as_deref(), new.measured_on, indicator.frequency);

    let existing = history
        .iter()
        .filter(|m| m.indicator_id == indicator.id && m.is_active())
        .find(|m| m.occupies(new.measured_on, &period));

    let superseded = match (existing, mode) {
        (Some(prior), RecordMode::Reject) => {
            debug!(code = %indicator.code, %period, existing = %prior.id, "Duplicate measurement refused");
            return Err(RecordError::DuplicatePeriod {
                indicator_id: indicator.id,
                measured_on: new.measured_on,
                period,
                existing: prior.id,
            });
        }
        (Some(prior), RecordMode::Supersede) => Some(prior.id),
        (None, _) => None,
    };

    let default_status = if superseded.is_some() {
        MeasurementStatus::Restated
    } else {
        MeasurementStatus::Actual
    };

    let measurement = Measurement {
        id: MeasurementId::generate(),
        indicator_id: indicator.id,
        value: new.value,
        measured_on: new.measured_on,
        period,
        status: new.status.unwrap_or(default_status),
        notes: new.notes,
        recorded_by: stamp.actor.clone(),
        recorded_at: stamp.at,
        superseded_by: None,
    };

    if let Some(prior) = superseded {
        info!(
            code = %indicator.code,
            period = %measurement.period,
            replaced = %prior,
            "Measurement superseded"
        );
    }

    Ok(RecordedMeasurement {
        measurement,
        superseded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use indicator_types::{IndicatorKind, IndicatorStatus, MeasurementFrequency, SuccessFactorId};

    fn indicator() -> Indicator {
        Indicator::new("KPI-010", "First contact resolution", IndicatorKind::Kpi, SuccessFactorId::generate())
            .with_frequency(MeasurementFrequency::Monthly)
            .with_status(IndicatorStatus::Active)
    }

    fn stamp() -> AuditStamp {
        AuditStamp::new("analyst", Utc::now())
    }

    fn march_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn derives_period_and_stamps_audit() {
        let ind = indicator();
        let recorded = record_measurement(
            &ind,
            &[],
            NewMeasurement::new(72.0, march_first()),
            RecordMode::Reject,
            &stamp(),
        )
        .unwrap();
        assert_eq!(recorded.measurement.period, "Mar 2024");
        assert_eq!(recorded.measurement.recorded_by, "analyst");
        assert_eq!(recorded.measurement.status, MeasurementStatus::Actual);
        assert_eq!(recorded.superseded, None);
    }

    #[test]
    fn duplicate_slot_rejected() {
        let ind = indicator();
        let first = record_measurement(
            &ind,
            &[],
            NewMeasurement::new(72.0, march_first()).with_period("Mar 2024"),
            RecordMode::Reject,
            &stamp(),
        )
        .unwrap()
        .measurement;

        let err = record_measurement(
            &ind,
            std::slice::from_ref(&first),
            NewMeasurement::new(75.0, march_first()).with_period("Mar 2024"),
            RecordMode::Reject,
            &stamp(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            RecordError::DuplicatePeriod {
                indicator_id: ind.id,
                measured_on: march_first(),
                period: "Mar 2024".into(),
                existing: first.id,
            }
        );
    }

    #[test]
    fn different_period_label_is_a_different_slot() {
        let ind = indicator();
        let first = record_measurement(
            &ind,
            &[],
            NewMeasurement::new(72.0, march_first()),
            RecordMode::Reject,
            &stamp(),
        )
        .unwrap()
        .measurement;

        let second = record_measurement(
            &ind,
            &[first],
            NewMeasurement::new(75.0, march_first()).with_period("Q1 2024"),
            RecordMode::Reject,
            &stamp(),
        );
        assert!(second.is_ok());
    }

    #[test]
    fn supersede_replaces_active_record() {
        let ind = indicator();
        let first = record_measurement(
            &ind,
            &[],
            NewMeasurement::new(72.0, march_first()),
            RecordMode::Reject,
            &stamp(),
        )
        .unwrap()
        .measurement;

        let recorded = record_measurement(
            &ind,
            std::slice::from_ref(&first),
            NewMeasurement::new(75.0, march_first()),
            RecordMode::Supersede,
            &stamp(),
        )
        .unwrap();
        assert_eq!(recorded.superseded, Some(first.id));
        assert_eq!(recorded.measurement.status, MeasurementStatus::Restated);
    }

    #[test]
    fn supersede_without_existing_is_plain_insert() {
        let ind = indicator();
        let recorded = record_measurement(
            &ind,
            &[],
            NewMeasurement::new(75.0, march_first()).with_status(MeasurementStatus::Preliminary),
            RecordMode::Supersede,
            &stamp(),
        )
        .unwrap();
        assert_eq!(recorded.superseded, None);
        assert_eq!(recorded.measurement.status, MeasurementStatus::Preliminary);
    }

    #[test]
    fn superseded_records_do_not_block() {
        let ind = indicator();
        let mut old = record_measurement(
            &ind,
            &[],
            NewMeasurement::new(72.0, march_first()),
            RecordMode::Reject,
            &stamp(),
        )
        .unwrap()
        .measurement;
        old.superseded_by = Some(MeasurementId::generate());

        assert!(record_measurement(
            &ind,
            &[old],
            NewMeasurement::new(80.0, march_first()),
            RecordMode::Reject,
            &stamp(),
        )
        .is_ok());
    }

    #[test]
    fn terminal_indicator_rejects() {
        for status in [IndicatorStatus::Archived, IndicatorStatus::Deprecated] {
            let ind = indicator().with_status(status);
            let err = record_measurement(
                &ind,
                &[],
                NewMeasurement::new(1.0, march_first()),
                RecordMode::Reject,
                &stamp(),
            )
            .unwrap_err();
            assert_eq!(
                err,
                RecordError::TerminalState {
                    indicator_id: ind.id,
                    status
                }
            );
        }
    }

    #[test]
    fn draft_indicator_accepts() {
        let ind = indicator().with_status(IndicatorStatus::Draft);
        assert!(record_measurement(
            &ind,
            &[],
            NewMeasurement::new(1.0, march_first()),
            RecordMode::Reject,
            &stamp(),
        )
        .is_ok());
    }

    #[test]
    fn non_finite_value_rejected() {
        let err = record_measurement(
            &indicator(),
            &[],
            NewMeasurement::new(f64::INFINITY, march_first()),
            RecordMode::Reject,
            &stamp(),
        )
        .unwrap_err();
        assert!(matches!(err, RecordError::InvalidValue(_)));
    }

    #[test]
    fn invalid_policy_rejected() {
        let mut ind = indicator();
        ind.is_key = false;
        let err = record_measurement(
            &ind,
            &[],
            NewMeasurement::new(1.0, march_first()),
            RecordMode::Reject,
            &stamp(),
        )
        .unwrap_err();
        assert!(matches!(err, RecordError::InvalidPolicy(_)));
    }
}
