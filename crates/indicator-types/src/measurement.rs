//! Measurement records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{IndicatorId, MeasurementId};

/// Provenance tag of a measured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementStatus {
    #[default]
    Actual,
    Estimated,
    Preliminary,
    Restated,
}

/// One observed value for one indicator at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: MeasurementId,

    /// Owning indicator (required)
    pub indicator_id: IndicatorId,

    pub value: f64,

    pub measured_on: NaiveDate,

    /// Period label such as `Q1 2024` or `Mar 2024`
    pub period: String,

    #[serde(default)]
    pub status: MeasurementStatus,

    #[serde(default)]
    pub notes: Option<String>,

    pub recorded_by: String,
    pub recorded_at: DateTime<Utc>,

    /// Set when an explicit supersede replaced this record
    #[serde(default)]
    pub superseded_by: Option<MeasurementId>,
}

impl Measurement {
    /// Active records count toward evaluation and the period uniqueness rule.
    pub fn is_active(&self) -> bool {
        self.superseded_by.is_none()
    }

    /// Whether this record occupies the given (date, period) slot.
    pub fn occupies(&self, measured_on: NaiveDate, period: &str) -> bool {
        self.measured_on == measured_on && self.period == period
    }
}

/// Caller-supplied input for recording a measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMeasurement {
    pub value: f64,
    pub measured_on: NaiveDate,
    /// Derived from the date and indicator frequency when absent or blank
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub status: Option<MeasurementStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewMeasurement {
    pub fn new(value: f64, measured_on: NaiveDate) -> Self {
        Self {
            value,
            measured_on,
            period: None,
            status: None,
            notes: None,
        }
    }

    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    pub fn with_status(mut self, status: MeasurementStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Who recorded something and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    pub actor: String,
    pub at: DateTime<Utc>,
}

impl AuditStamp {
    pub fn new(actor: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            actor: actor.into(),
            at,
        }
    }
}
