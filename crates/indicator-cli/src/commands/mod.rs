//! CLI command implementations

pub mod evaluate;
pub mod lifecycle;
pub mod record;
pub mod rollup;

use clap::ValueEnum;
use indicator_store::{IndicatorService, InMemoryStore};
use indicator_types::{IndicatorStatus, ImpactLevel, MeasurementStatus, RelationshipStrength};

/// Service over the dataset loaded for this invocation
pub type Service = IndicatorService<InMemoryStore>;

/// Indicator lifecycle states accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Draft,
    Active,
    UnderReview,
    Approved,
    Archived,
    Deprecated,
}

impl From<StatusArg> for IndicatorStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Draft => IndicatorStatus::Draft,
            StatusArg::Active => IndicatorStatus::Active,
            StatusArg::UnderReview => IndicatorStatus::UnderReview,
            StatusArg::Approved => IndicatorStatus::Approved,
            StatusArg::Archived => IndicatorStatus::Archived,
            StatusArg::Deprecated => IndicatorStatus::Deprecated,
        }
    }
}

/// Measurement provenance tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MeasurementStatusArg {
    Actual,
    Estimated,
    Preliminary,
    Restated,
}

impl From<MeasurementStatusArg> for MeasurementStatus {
    fn from(arg: MeasurementStatusArg) -> Self {
        match arg {
            MeasurementStatusArg::Actual => MeasurementStatus::Actual,
            MeasurementStatusArg::Estimated => MeasurementStatus::Estimated,
            MeasurementStatusArg::Preliminary => MeasurementStatus::Preliminary,
            MeasurementStatusArg::Restated => MeasurementStatus::Restated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrengthArg {
    Strong,
    Moderate,
    Weak,
}

impl From<StrengthArg> for RelationshipStrength {
    fn from(arg: StrengthArg) -> Self {
        match arg {
            StrengthArg::Strong => RelationshipStrength::Strong,
            StrengthArg::Moderate => RelationshipStrength::Moderate,
            StrengthArg::Weak => RelationshipStrength::Weak,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImpactArg {
    Low,
    Medium,
    High,
    Critical,
}

impl From<ImpactArg> for ImpactLevel {
    fn from(arg: ImpactArg) -> Self {
        match arg {
            ImpactArg::Low => ImpactLevel::Low,
            ImpactArg::Medium => ImpactLevel::Medium,
            ImpactArg::High => ImpactLevel::High,
            ImpactArg::Critical => ImpactLevel::Critical,
        }
    }
}
