//! Store and service error types

use chrono::NaiveDate;
use indicator_engine::{ConfigurationError, EngineError, RecordError};
use indicator_types::{IndicatorId, IndicatorKind, LinkId, MeasurementId, SuccessFactorId};
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Indicator code already in use: {code} (held by {existing})")]
    DuplicateCode { code: String, existing: IndicatorId },

    #[error("Duplicate measurement for {indicator_id} on {measured_on} ({period}): {existing} already recorded")]
    DuplicateMeasurement {
        indicator_id: IndicatorId,
        measured_on: NaiveDate,
        period: String,
        existing: MeasurementId,
    },

    #[error("Success factor name already in use: {0}")]
    DuplicateFactorName(String),

    #[error("Indicator {indicator_id} is already linked to {csf_id}")]
    DuplicateLink {
        csf_id: SuccessFactorId,
        indicator_id: IndicatorId,
    },

    #[error("Indicator not found: {0}")]
    IndicatorNotFound(IndicatorId),

    #[error("Measurement not found: {0}")]
    MeasurementNotFound(MeasurementId),

    #[error("Success factor not found: {0}")]
    SuccessFactorNotFound(SuccessFactorId),

    #[error("Link not found: {0}")]
    LinkNotFound(LinkId),

    #[error("Measurement {0} is already superseded")]
    AlreadySuperseded(MeasurementId),

    #[error("Measurement {replacement} does not occupy the indicator and slot of {previous}")]
    SlotMismatch {
        previous: MeasurementId,
        replacement: MeasurementId,
    },

    #[error("Success factor {factor_id} still owns {indicators} indicator(s)")]
    FactorInUse {
        factor_id: SuccessFactorId,
        indicators: usize,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by [`crate::IndicatorService`]
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Recording refused: {0}")]
    Record(#[from] RecordError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("No indicator with code {0}")]
    UnknownCode(String),

    #[error("No success factor named {0}")]
    UnknownFactor(String),

    #[error("{kind} parent must be a {expected}, found {actual}")]
    ParentKind {
        kind: IndicatorKind,
        expected: IndicatorKind,
        actual: IndicatorKind,
    },
}

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;
