//! Indicator Service - storage-backed entry point for engine operations
//!
//! The engine crate is pure; this facade loads records from a [`Store`],
//! runs the engine rules and persists the outcome, stamping audit fields
//! from an [`AuditContext`].

use crate::audit::AuditContext;
use crate::error::{Result, ServiceError, StoreError};
use crate::traits::Store;
use indicator_engine::{
    evaluate_indicator, hierarchy_from_indicators, record_measurement, roll_up_csf,
    roll_up_success_factor, summarize, transition, validate_indicator, ConfigurationError,
    EngineError, EvaluationConfig, IndicatorEvaluation, IndicatorHierarchy, PortfolioSummary,
    RecordError, RecordMode, RecordedMeasurement, RollUp,
};
use indicator_types::{
    CsfIndicatorLink, ImpactLevel, Indicator, IndicatorStatus, NewMeasurement,
    RelationshipStrength, SuccessFactor,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// What [`IndicatorService::retire_or_delete`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Removal {
    /// No measurements existed; the indicator and its links were deleted
    Deleted,
    /// Measurements exist; the indicator was archived instead
    Retired { from: IndicatorStatus },
}

/// A policy problem found by [`IndicatorService::validate`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyIssue {
    pub code: String,
    pub message: String,
}

/// Roll-up of one success factor, with its name for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorRollUp {
    pub name: String,
    pub is_critical: bool,
    #[serde(flatten)]
    pub roll_up: RollUp,
}

/// Storage-backed indicator operations
pub struct IndicatorService<S: Store> {
    store: S,
    audit: Arc<dyn AuditContext>,
    config: EvaluationConfig,
}

impl<S: Store> IndicatorService<S> {
    /// Create a service; the evaluation config is validated up front
    pub fn new(store: S, audit: Arc<dyn AuditContext>, config: EvaluationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            audit,
            config,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Look up an indicator by code
    pub async fn indicator(&self, code: &str) -> Result<Indicator> {
        self.store
            .find_by_code(code)
            .await?
            .ok_or_else(|| ServiceError::UnknownCode(code.to_string()))
    }

    /// Look up a success factor by name
    pub async fn factor(&self, name: &str) -> Result<SuccessFactor> {
        self.store
            .find_factor_by_name(name)
            .await?
            .ok_or_else(|| ServiceError::UnknownFactor(name.to_string()))
    }

    /// Register a success factor
    #[instrument(skip(self, factor), fields(name = %factor.name))]
    pub async fn create_success_factor(&self, mut factor: SuccessFactor) -> Result<SuccessFactor> {
        factor.created_at = self.audit.now();
        self.store.save_factor(factor.clone()).await?;
        info!(critical = factor.is_critical, "Success factor created");
        Ok(factor)
    }

    /// Register a new indicator in Draft.
    ///
    /// The policy is validated, the owning factor must exist and a parent,
    /// when given, must exist and be of the kind the hierarchy expects.
    #[instrument(skip(self, indicator), fields(code = %indicator.code))]
    pub async fn create_indicator(&self, mut indicator: Indicator) -> Result<Indicator> {
        validate_indicator(&indicator)?;

        if let Some(parent_id) = indicator.parent_id {
            let parent = self
                .store
                .get_indicator(&parent_id)
                .await?
                .ok_or(StoreError::IndicatorNotFound(parent_id))?;
            if let Some(expected) = indicator.kind.parent_kind() {
                if parent.kind != expected {
                    return Err(ServiceError::ParentKind {
                        kind: indicator.kind,
                        expected,
                        actual: parent.kind,
                    });
                }
            }
        }

        let stamp = self.audit.stamp();
        indicator.status = IndicatorStatus::Draft;
        indicator.created_at = stamp.at;
        indicator.updated_at = stamp.at;
        indicator.created_by = Some(stamp.actor);

        self.store.save_indicator(indicator.clone()).await?;
        info!(kind = %indicator.kind, "Indicator created");
        Ok(indicator)
    }

    /// Move an indicator through its lifecycle
    #[instrument(skip(self))]
    pub async fn transition(&self, code: &str, to: IndicatorStatus) -> Result<Indicator> {
        let mut indicator = self.indicator(code).await?;
        let from = transition(&mut indicator, to, self.audit.now())?;
        self.store.save_indicator(indicator.clone()).await?;
        info!(%from, %to, "Indicator transitioned");
        Ok(indicator)
    }

    /// Record a measurement for the indicator with `code`.
    ///
    /// With [`RecordMode::Reject`] an occupied (date, period) slot is an
    /// error and nothing is written. With [`RecordMode::Supersede`] the
    /// previous record is kept but marked superseded.
    #[instrument(skip(self, new), fields(value = new.value, date = %new.measured_on))]
    pub async fn record_measurement(
        &self,
        code: &str,
        new: NewMeasurement,
        mode: RecordMode,
    ) -> Result<RecordedMeasurement> {
        let indicator = self.indicator(code).await?;
        let history = self.store.list_measurements(&indicator.id).await?;

        let recorded = match record_measurement(&indicator, &history, new, mode, &self.audit.stamp())
        {
            Ok(recorded) => recorded,
            Err(err) => {
                warn!(error = %err, "Measurement refused");
                return Err(err.into());
            }
        };

        let stored = match recorded.superseded {
            Some(previous) => {
                self.store
                    .supersede_measurement(&previous, recorded.measurement.clone())
                    .await
            }
            None => self.store.insert_measurement(recorded.measurement.clone()).await,
        };
        stored.map_err(slot_taken)?;

        info!(
            period = %recorded.measurement.period,
            superseded = recorded.superseded.is_some(),
            "Measurement recorded"
        );
        Ok(recorded)
    }

    /// Evaluate one indicator
    #[instrument(skip(self))]
    pub async fn evaluate(&self, code: &str) -> Result<IndicatorEvaluation> {
        let indicator = self.indicator(code).await?;
        self.evaluate_indicator(&indicator).await
    }

    /// Evaluate every indicator, ordered by code.
    ///
    /// An indicator whose policy cannot be evaluated is logged and left out;
    /// [`IndicatorService::validate`] reports it. Storage errors still fail.
    #[instrument(skip(self))]
    pub async fn evaluate_all(&self) -> Result<Vec<IndicatorEvaluation>> {
        let indicators = self.store.list_indicators().await?;
        let mut evaluations = Vec::with_capacity(indicators.len());
        for indicator in &indicators {
            match self.evaluate_indicator(indicator).await {
                Ok(evaluation) => evaluations.push(evaluation),
                Err(ServiceError::Engine(err)) => {
                    warn!(code = %indicator.code, error = %err, "Indicator skipped")
                }
                Err(err) => return Err(err),
            }
        }
        Ok(evaluations)
    }

    async fn evaluate_indicator(&self, indicator: &Indicator) -> Result<IndicatorEvaluation> {
        let measurements = self.store.list_measurements(&indicator.id).await?;
        Ok(evaluate_indicator(indicator, &measurements, &self.config)?)
    }

    /// Assemble the KRI → RI → PI/KPI tree
    pub async fn hierarchy(&self) -> Result<IndicatorHierarchy> {
        let indicators = self.store.list_indicators().await?;
        Ok(hierarchy_from_indicators(&indicators))
    }

    /// Weighted roll-up of the CSF named `name`
    #[instrument(skip(self))]
    pub async fn roll_up_csf(&self, name: &str) -> Result<FactorRollUp> {
        let csf = self.factor(name).await?;
        self.roll_up_critical(&csf).await
    }

    async fn roll_up_critical(&self, csf: &SuccessFactor) -> Result<FactorRollUp> {
        if !csf.is_critical {
            return Err(EngineError::NotCritical(csf.id).into());
        }

        let links = self.store.links_for_factor(&csf.id).await?;
        let mut evaluations = Vec::with_capacity(links.len());
        for link in &links {
            let indicator = self
                .store
                .get_indicator(&link.indicator_id)
                .await?
                .ok_or(StoreError::IndicatorNotFound(link.indicator_id))?;
            evaluations.push(self.evaluate_indicator(&indicator).await?);
        }

        let pairs: Vec<_> = links.iter().zip(evaluations.iter()).collect();
        let roll_up = roll_up_csf(csf, &pairs, &self.config.roll_up)?;
        Ok(FactorRollUp {
            name: csf.name.clone(),
            is_critical: true,
            roll_up,
        })
    }

    /// Equal-weight roll-up of the indicators owned by the factor `name`
    #[instrument(skip(self))]
    pub async fn roll_up_success_factor(&self, name: &str) -> Result<FactorRollUp> {
        let factor = self.factor(name).await?;
        self.roll_up_owned(&factor).await
    }

    async fn roll_up_owned(&self, factor: &SuccessFactor) -> Result<FactorRollUp> {
        let indicators = self.store.list_indicators_for_factor(&factor.id).await?;
        let mut evaluations = Vec::with_capacity(indicators.len());
        for indicator in &indicators {
            evaluations.push(self.evaluate_indicator(indicator).await?);
        }
        let roll_up = roll_up_success_factor(factor, &evaluations, &self.config.roll_up)?;
        Ok(FactorRollUp {
            name: factor.name.clone(),
            is_critical: factor.is_critical,
            roll_up,
        })
    }

    /// Roll up every factor: CSFs by link weight, the rest by owned indicators.
    ///
    /// A factor that cannot be rolled up because one of its indicators fails
    /// evaluation is logged and left out.
    pub async fn roll_up_all(&self) -> Result<Vec<FactorRollUp>> {
        let factors = self.store.list_factors().await?;
        let mut roll_ups = Vec::with_capacity(factors.len());
        for factor in &factors {
            let roll_up = if factor.is_critical {
                self.roll_up_critical(factor).await
            } else {
                self.roll_up_owned(factor).await
            };
            match roll_up {
                Ok(roll_up) => roll_ups.push(roll_up),
                Err(ServiceError::Engine(err)) => {
                    warn!(factor = %factor.name, error = %err, "Success factor skipped")
                }
                Err(err) => return Err(err),
            }
        }
        Ok(roll_ups)
    }

    /// Dashboard counts over every indicator
    pub async fn portfolio_summary(&self) -> Result<PortfolioSummary> {
        let evaluations = self.evaluate_all().await?;
        Ok(summarize(&evaluations))
    }

    /// Link an indicator to a CSF with a weight of 0-100
    #[instrument(skip(self))]
    pub async fn link_indicator(
        &self,
        csf_name: &str,
        code: &str,
        weight: f64,
        strength: RelationshipStrength,
        impact: ImpactLevel,
    ) -> Result<CsfIndicatorLink> {
        let csf = self.factor(csf_name).await?;
        if !csf.is_critical {
            return Err(EngineError::NotCritical(csf.id).into());
        }
        let indicator = self.indicator(code).await?;
        if !weight.is_finite() || !(0.0..=100.0).contains(&weight) {
            return Err(ConfigurationError::InvalidWeight {
                indicator_id: indicator.id,
                weight,
            }
            .into());
        }

        let link = CsfIndicatorLink::new(csf.id, indicator.id, weight)
            .with_strength(strength)
            .with_impact(impact);
        self.store.save_link(link.clone()).await?;

        let total: f64 = self
            .store
            .links_for_factor(&csf.id)
            .await?
            .iter()
            .map(|l| l.weight)
            .sum();
        if total > self.config.roll_up.max_weight_sum {
            warn!(total, "CSF link weights now exceed maximum");
        }
        info!("Indicator linked");
        Ok(link)
    }

    /// Remove an indicator.
    ///
    /// Hard delete is refused while measurements exist; the indicator is
    /// archived instead so its history stays intact.
    #[instrument(skip(self))]
    pub async fn retire_or_delete(&self, code: &str) -> Result<Removal> {
        let indicator = self.indicator(code).await?;
        let count = self.store.count_measurements(&indicator.id).await?;

        if count == 0 {
            self.store.delete_indicator(&indicator.id).await?;
            info!("Indicator deleted");
            return Ok(Removal::Deleted);
        }

        let from = indicator.status;
        if from.is_terminal() {
            return Ok(Removal::Retired { from });
        }
        self.transition(code, IndicatorStatus::Archived).await?;
        info!(measurements = count, "Indicator retired instead of deleted");
        Ok(Removal::Retired { from })
    }

    /// Check every indicator policy; returns the problems found
    pub async fn validate(&self) -> Result<Vec<PolicyIssue>> {
        let indicators = self.store.list_indicators().await?;
        Ok(indicators
            .iter()
            .filter_map(|indicator| {
                validate_indicator(indicator).err().map(|err| PolicyIssue {
                    code: indicator.code.clone(),
                    message: err.to_string(),
                })
            })
            .collect())
    }
}

/// A slot taken between reading the history and writing is a duplicate
/// period to the caller, same as one the engine caught.
fn slot_taken(err: StoreError) -> ServiceError {
    match err {
        StoreError::DuplicateMeasurement {
            indicator_id,
            measured_on,
            period,
            existing,
        } => RecordError::DuplicatePeriod {
            indicator_id,
            measured_on,
            period,
            existing,
        }
        .into(),
        other => other.into(),
    }
}
