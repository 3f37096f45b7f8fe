//! Indicator Types - Core records for the indicator hierarchy
//!
//! The hierarchy has four indicator flavours on two orthogonal axes:
//!
//! - **Tier**: Result (outcome measures) vs Performance (activity measures)
//! - **Key flag**: the strategically significant subset of each tier
//!
//! which gives KRI / RI (Result) and KPI / PI (Performance). Indicators hang
//! off a Success Factor, and Critical Success Factors (CSFs) additionally
//! collect weighted links to the indicators that evidence them.
//!
//! ## Key Concepts
//!
//! - **Indicator**: one tagged record for all four kinds, relations held as ids
//! - **Measurement**: one observed value on one date for one indicator
//! - **ThresholdBand / TargetPolicy**: what "good" looks like for an indicator
//! - **SuccessFactor / CsfIndicatorLink**: strategic factors and their weights

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod ids;
pub mod indicator;
pub mod measurement;
pub mod policy;
pub mod success_factor;

pub use ids::{IndicatorId, LinkId, MeasurementId, SuccessFactorId};
pub use indicator::{
    Indicator, IndicatorKind, IndicatorStatus, IndicatorTier, MeasurementFrequency,
};
pub use measurement::{AuditStamp, Measurement, MeasurementStatus, NewMeasurement};
pub use policy::{MeasurementDirection, TargetPolicy, ThresholdBand};
pub use success_factor::{
    CsfIndicatorLink, FactorStatus, ImpactLevel, Priority, RelationshipStrength, RiskLevel,
    SuccessFactor,
};
