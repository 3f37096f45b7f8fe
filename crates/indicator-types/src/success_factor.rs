//! Success factors and weighted CSF-to-indicator links.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{IndicatorId, LinkId, SuccessFactorId};

/// Delivery status of a success factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorStatus {
    #[default]
    NotStarted,
    InProgress,
    OnHold,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

/// A contributing condition for a business objective.
///
/// `is_critical` distinguishes a Critical Success Factor (CSF) from a plain
/// success factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessFactor {
    pub id: SuccessFactorId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_critical: bool,
    /// Manually reported progress (0-100)
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub status: FactorStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl SuccessFactor {
    pub fn new(name: impl Into<String>, is_critical: bool) -> Self {
        Self {
            id: SuccessFactorId::generate(),
            name: name.into(),
            description: None,
            is_critical,
            progress: 0.0,
            status: FactorStatus::default(),
            priority: Priority::default(),
            risk_level: RiskLevel::default(),
            start_date: None,
            target_date: None,
            created_at: Utc::now(),
        }
    }

    /// Shorthand for a Critical Success Factor.
    pub fn critical(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStrength {
    Strong,
    #[default]
    Moderate,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Weighted contribution of one indicator to one CSF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsfIndicatorLink {
    pub id: LinkId,
    pub csf_id: SuccessFactorId,
    pub indicator_id: IndicatorId,
    /// Contribution weight, 0-100
    pub weight: f64,
    #[serde(default)]
    pub relationship_strength: RelationshipStrength,
    #[serde(default)]
    pub impact_level: ImpactLevel,
}

impl CsfIndicatorLink {
    pub fn new(csf_id: SuccessFactorId, indicator_id: IndicatorId, weight: f64) -> Self {
        Self {
            id: LinkId::generate(),
            csf_id,
            indicator_id,
            weight,
            relationship_strength: RelationshipStrength::default(),
            impact_level: ImpactLevel::default(),
        }
    }

    pub fn with_strength(mut self, strength: RelationshipStrength) -> Self {
        self.relationship_strength = strength;
        self
    }

    pub fn with_impact(mut self, impact: ImpactLevel) -> Self {
        self.impact_level = impact;
        self
    }
}
