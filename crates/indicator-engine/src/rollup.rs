//! Success factor roll-up.
//!
//! A Critical Success Factor aggregates its linked indicators by weight; a
//! plain success factor aggregates the indicators it owns with equal weight.
//! Progress is renormalized over the contributors that actually have an
//! achievement value, so a missing measurement never counts as zero.

use indicator_types::{CsfIndicatorLink, IndicatorId, SuccessFactor, SuccessFactorId};
use serde::Serialize;
use tracing::{debug, warn};

use crate::band::BandStatus;
use crate::config::RollUpConfig;
use crate::derived::{Derived, InsufficientData};
use crate::error::{ConfigurationError, EngineError, EngineResult};
use crate::evaluation::IndicatorEvaluation;

/// Aggregated progress and risk of one success factor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollUp {
    pub factor_id: SuccessFactorId,

    /// Weighted mean of capped achievement percentages
    pub weighted_progress: Derived<f64>,

    /// Worst known band among the contributors
    pub aggregate_risk: BandStatus,

    /// Sum of all link weights (CSF roll-ups only)
    pub weight_sum: Option<f64>,

    /// Link weights exceed the configured maximum. Progress is still
    /// computed; the factor's weights need attention.
    pub weight_sum_warning: bool,

    /// Indicators whose achievement entered the weighted mean
    pub contributing: Vec<IndicatorId>,

    /// Indicators without a usable achievement value
    pub skipped: Vec<IndicatorId>,
}

/// Roll up a Critical Success Factor from its weighted links.
///
/// Each link is paired with the evaluation of the indicator it points at.
pub fn roll_up_csf(
    csf: &SuccessFactor,
    links: &[(&CsfIndicatorLink, &IndicatorEvaluation)],
    config: &RollUpConfig,
) -> EngineResult<RollUp> {
    config.validate()?;
    if !csf.is_critical {
        return Err(EngineError::NotCritical(csf.id));
    }

    for (link, evaluation) in links {
        if link.csf_id != csf.id {
            return Err(EngineError::ForeignLink {
                link_id: link.id,
                expected: csf.id,
                actual: link.csf_id,
            });
        }
        if link.indicator_id != evaluation.indicator_id {
            return Err(EngineError::LinkEvaluationMismatch {
                link_id: link.id,
                linked: link.indicator_id,
                evaluated: evaluation.indicator_id,
            });
        }
        if !link.weight.is_finite() || !(0.0..=100.0).contains(&link.weight) {
            return Err(ConfigurationError::InvalidWeight {
                indicator_id: link.indicator_id,
                weight: link.weight,
            }
            .into());
        }
    }

    let weight_sum: f64 = links.iter().map(|(link, _)| link.weight).sum();
    let weight_sum_warning = weight_sum > config.max_weight_sum + 1e-9;
    if weight_sum_warning {
        warn!(
            factor = %csf.name,
            weight_sum,
            max = config.max_weight_sum,
            "Link weights exceed maximum"
        );
    }

    let weighted = links
        .iter()
        .map(|(link, evaluation)| (link.weight, *evaluation));
    let mut roll_up = aggregate(csf.id, weighted, config);
    roll_up.weight_sum = Some(weight_sum);
    roll_up.weight_sum_warning = weight_sum_warning;

    debug!(
        factor = %csf.name,
        contributing = roll_up.contributing.len(),
        skipped = roll_up.skipped.len(),
        "CSF rolled up"
    );
    Ok(roll_up)
}

/// Roll up a success factor from the indicators it owns, equally weighted.
pub fn roll_up_success_factor(
    factor: &SuccessFactor,
    evaluations: &[IndicatorEvaluation],
    config: &RollUpConfig,
) -> EngineResult<RollUp> {
    config.validate()?;
    if let Some(foreign) = evaluations
        .iter()
        .find(|e| e.success_factor_id != factor.id)
    {
        return Err(EngineError::ForeignIndicator {
            indicator_id: foreign.indicator_id,
            expected: factor.id,
            actual: foreign.success_factor_id,
        });
    }

    let roll_up = aggregate(factor.id, evaluations.iter().map(|e| (1.0, e)), config);
    debug!(
        factor = %factor.name,
        contributing = roll_up.contributing.len(),
        "Success factor rolled up"
    );
    Ok(roll_up)
}

fn aggregate<'a>(
    factor_id: SuccessFactorId,
    weighted: impl Iterator<Item = (f64, &'a IndicatorEvaluation)>,
    config: &RollUpConfig,
) -> RollUp {
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    let mut bands = Vec::new();
    let mut contributing = Vec::new();
    let mut skipped = Vec::new();

    for (weight, evaluation) in weighted {
        bands.push(evaluation.band);
        match evaluation.achievement_pct.get() {
            Some(pct) => {
                numerator += pct.min(config.achievement_cap_pct) * weight;
                denominator += weight;
                contributing.push(evaluation.indicator_id);
            }
            None => skipped.push(evaluation.indicator_id),
        }
    }

    let weighted_progress = if contributing.is_empty() {
        Derived::Insufficient(InsufficientData::NoContributors)
    } else if denominator <= 0.0 {
        Derived::Insufficient(InsufficientData::ZeroWeight)
    } else {
        Derived::Available(numerator / denominator)
    };

    RollUp {
        factor_id,
        weighted_progress,
        aggregate_risk: BandStatus::worst(bands),
        weight_sum: None,
        weight_sum_warning: false,
        contributing,
        skipped,
    }
}
