//! Portfolio-level counts over a set of evaluations.

use serde::Serialize;

use crate::band::BandStatus;
use crate::evaluation::{CoarseStatus, IndicatorEvaluation};

/// Band counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BandCounts {
    pub green: usize,
    pub yellow: usize,
    pub red: usize,
    pub unknown: usize,
}

/// Coarse status counts; `not_available` covers indicators without an
/// achievement value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CoarseCounts {
    pub achieved: usize,
    pub on_target: usize,
    pub below_target: usize,
    pub at_risk: usize,
    pub not_available: usize,
}

/// Dashboard summary of a portfolio of indicators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PortfolioSummary {
    pub total: usize,
    pub bands: BandCounts,
    pub coarse: CoarseCounts,
    pub alerts: usize,
    pub without_data: usize,
}

impl PortfolioSummary {
    /// Share of indicators in the Green band, as a percentage of `total`.
    pub fn green_share_pct(&self) -> Option<f64> {
        (self.total > 0).then(|| self.bands.green as f64 / self.total as f64 * 100.0)
    }
}

pub fn summarize<'a>(
    evaluations: impl IntoIterator<Item = &'a IndicatorEvaluation>,
) -> PortfolioSummary {
    let mut summary = PortfolioSummary::default();

    for evaluation in evaluations {
        summary.total += 1;

        match evaluation.band {
            BandStatus::Green => summary.bands.green += 1,
            BandStatus::Yellow => summary.bands.yellow += 1,
            BandStatus::Red => summary.bands.red += 1,
            BandStatus::Unknown => summary.bands.unknown += 1,
        }

        match evaluation.coarse_status.get() {
            Some(CoarseStatus::Achieved) => summary.coarse.achieved += 1,
            Some(CoarseStatus::OnTarget) => summary.coarse.on_target += 1,
            Some(CoarseStatus::BelowTarget) => summary.coarse.below_target += 1,
            Some(CoarseStatus::AtRisk) => summary.coarse.at_risk += 1,
            None => summary.coarse.not_available += 1,
        }

        if evaluation.alert_triggered() {
            summary.alerts += 1;
        }
        if !evaluation.has_data() {
            summary.without_data += 1;
        }
    }

    summary
}
