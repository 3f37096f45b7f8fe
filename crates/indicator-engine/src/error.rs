use chrono::NaiveDate;
use indicator_types::{
    IndicatorId, IndicatorKind, IndicatorStatus, LinkId, MeasurementId, SuccessFactorId,
};
use thiserror::Error;

/// An indicator policy, band or engine setting that is internally inconsistent.
///
/// Raised when the policy is loaded or validated; never "fixed up" silently.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error(
        "band cut points are not monotonic for {direction}: red {red}, yellow {yellow}, green {green}"
    )]
    NonMonotonicBand {
        direction: &'static str,
        red: f64,
        yellow: f64,
        green: f64,
    },

    #[error("band direction ({band}) disagrees with indicator direction ({indicator})")]
    BandDirectionMismatch {
        band: &'static str,
        indicator: &'static str,
    },

    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{low_field} {low} exceeds {high_field} {high}")]
    InvertedBounds {
        low_field: &'static str,
        low: f64,
        high_field: &'static str,
        high: f64,
    },

    #[error("indicator kind {kind} requires is_key = {expected}")]
    KindKeyMismatch { kind: IndicatorKind, expected: bool },

    #[error("{kind} indicators cannot have a parent indicator")]
    UnexpectedParent { kind: IndicatorKind },

    #[error("indicator {0} references itself as parent")]
    SelfParent(IndicatorId),

    #[error("indicator code must not be empty")]
    EmptyCode,

    #[error("indicator {code} has no target value but one is required")]
    MissingTarget { code: String },

    #[error("link weight {weight} for indicator {indicator_id} is outside 0-100")]
    InvalidWeight {
        indicator_id: IndicatorId,
        weight: f64,
    },

    #[error("invalid setting {setting}: {reason}")]
    InvalidSetting {
        setting: &'static str,
        reason: String,
    },
}

/// Errors from evaluation, roll-up and lifecycle operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("measurement {measurement_id} belongs to {actual}, not {expected}")]
    ForeignMeasurement {
        measurement_id: MeasurementId,
        expected: IndicatorId,
        actual: IndicatorId,
    },

    #[error("link {link_id} belongs to {actual}, not {expected}")]
    ForeignLink {
        link_id: LinkId,
        expected: SuccessFactorId,
        actual: SuccessFactorId,
    },

    #[error("link {link_id} points at {linked} but was paired with the evaluation of {evaluated}")]
    LinkEvaluationMismatch {
        link_id: LinkId,
        linked: IndicatorId,
        evaluated: IndicatorId,
    },

    #[error("indicator {indicator_id} is owned by {actual}, not {expected}")]
    ForeignIndicator {
        indicator_id: IndicatorId,
        expected: SuccessFactorId,
        actual: SuccessFactorId,
    },

    #[error("success factor {0} is not critical; CSF roll-up does not apply")]
    NotCritical(SuccessFactorId),

    #[error("invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition {
        from: IndicatorStatus,
        to: IndicatorStatus,
    },
}

/// Errors from recording a measurement.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("indicator {indicator_id} already has measurement {existing} for {measured_on} ({period})")]
    DuplicatePeriod {
        indicator_id: IndicatorId,
        measured_on: NaiveDate,
        period: String,
        existing: MeasurementId,
    },

    #[error("indicator {indicator_id} is {status}; terminal indicators accept no measurements")]
    TerminalState {
        indicator_id: IndicatorId,
        status: IndicatorStatus,
    },

    #[error("invalid policy: {0}")]
    InvalidPolicy(#[from] ConfigurationError),

    #[error("measurement value {0} is not a finite number")]
    InvalidValue(f64),
}

/// Result type for engine operations
pub type EngineResult<T> = std::result::Result<T, EngineError>;
