//! Indicator records.
//!
//! The four indicator flavours share one shape. `kind` says which tier the
//! indicator lives in and `is_key` marks the strategically significant subset,
//! so KRI = Result + key, RI = Result, KPI = Performance + key, PI = Performance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{IndicatorId, SuccessFactorId};
use crate::policy::{MeasurementDirection, TargetPolicy, ThresholdBand};

/// Tier of the measurement hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorTier {
    /// Outcome measures (KRI / RI)
    Result,
    /// Activity measures (KPI / PI)
    Performance,
}

/// Concrete indicator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndicatorKind {
    /// Key Result Indicator
    Kri,
    /// Result Indicator
    Ri,
    /// Performance Indicator
    Pi,
    /// Key Performance Indicator
    Kpi,
}

impl IndicatorKind {
    pub fn tier(self) -> IndicatorTier {
        match self {
            IndicatorKind::Kri | IndicatorKind::Ri => IndicatorTier::Result,
            IndicatorKind::Pi | IndicatorKind::Kpi => IndicatorTier::Performance,
        }
    }

    /// Whether this kind belongs to the key subset.
    pub fn is_key(self) -> bool {
        matches!(self, IndicatorKind::Kri | IndicatorKind::Kpi)
    }

    pub fn from_parts(tier: IndicatorTier, is_key: bool) -> Self {
        match (tier, is_key) {
            (IndicatorTier::Result, true) => IndicatorKind::Kri,
            (IndicatorTier::Result, false) => IndicatorKind::Ri,
            (IndicatorTier::Performance, true) => IndicatorKind::Kpi,
            (IndicatorTier::Performance, false) => IndicatorKind::Pi,
        }
    }

    /// Kind an indicator of this kind may name as its parent, if any.
    pub fn parent_kind(self) -> Option<IndicatorKind> {
        match self {
            IndicatorKind::Kri => None,
            IndicatorKind::Ri => Some(IndicatorKind::Kri),
            IndicatorKind::Pi | IndicatorKind::Kpi => Some(IndicatorKind::Ri),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IndicatorKind::Kri => "KRI",
            IndicatorKind::Ri => "RI",
            IndicatorKind::Pi => "PI",
            IndicatorKind::Kpi => "KPI",
        }
    }
}

impl std::fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How often an indicator is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementFrequency {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Annual,
}

/// Indicator lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorStatus {
    #[default]
    Draft,
    Active,
    UnderReview,
    Approved,
    Archived,
    Deprecated,
}

impl IndicatorStatus {
    /// Terminal states accept no further transitions or measurements.
    pub fn is_terminal(self) -> bool {
        matches!(self, IndicatorStatus::Archived | IndicatorStatus::Deprecated)
    }
}

impl std::fmt::Display for IndicatorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            IndicatorStatus::Draft => "draft",
            IndicatorStatus::Active => "active",
            IndicatorStatus::UnderReview => "under_review",
            IndicatorStatus::Approved => "approved",
            IndicatorStatus::Archived => "archived",
            IndicatorStatus::Deprecated => "deprecated",
        };
        f.write_str(s)
    }
}

/// An indicator of any tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    /// Unique indicator identifier
    pub id: IndicatorId,

    /// Short human code, unique within the system (e.g. `KPI-001`)
    pub code: String,

    /// Display name
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub kind: IndicatorKind,

    /// Mirrors `kind.is_key()`; stored explicitly and cross-checked on load
    pub is_key: bool,

    /// Unit of measure (e.g. `%`, `USD`, `tickets`)
    #[serde(default)]
    pub unit: String,

    #[serde(default)]
    pub frequency: MeasurementFrequency,

    #[serde(default)]
    pub direction: MeasurementDirection,

    #[serde(default)]
    pub target: TargetPolicy,

    #[serde(default)]
    pub band: ThresholdBand,

    /// RI → parent KRI, PI/KPI → parent RI. KRIs have no parent.
    #[serde(default)]
    pub parent_id: Option<IndicatorId>,

    /// Owning success factor (required)
    pub success_factor_id: SuccessFactorId,

    #[serde(default)]
    pub status: IndicatorStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub created_by: Option<String>,
}

impl Indicator {
    /// Create a draft indicator with default policy.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        kind: IndicatorKind,
        success_factor_id: SuccessFactorId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: IndicatorId::generate(),
            code: code.into(),
            name: name.into(),
            description: None,
            kind,
            is_key: kind.is_key(),
            unit: String::new(),
            frequency: MeasurementFrequency::default(),
            direction: MeasurementDirection::default(),
            target: TargetPolicy::default(),
            band: ThresholdBand::default(),
            parent_id: None,
            success_factor_id,
            status: IndicatorStatus::Draft,
            created_at: now,
            updated_at: now,
            created_by: None,
        }
    }

    pub fn with_parent(mut self, parent_id: IndicatorId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_target(mut self, target: TargetPolicy) -> Self {
        self.target = target;
        self
    }

    /// Set the band and align the indicator direction with it.
    pub fn with_band(mut self, band: ThresholdBand) -> Self {
        self.direction = band.direction();
        self.band = band;
        self
    }

    pub fn with_frequency(mut self, frequency: MeasurementFrequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_status(mut self, status: IndicatorStatus) -> Self {
        self.status = status;
        self
    }

    pub fn tier(&self) -> IndicatorTier {
        self.kind.tier()
    }
}
