//! Success factor roll-up command

use super::Service;
use crate::output::{self, band_label, derived_number, print_warning, OutputFormat};
use anyhow::Result;
use indicator_store::FactorRollUp;
use tabled::Tabled;

#[derive(Tabled)]
struct RollUpRow {
    #[tabled(rename = "FACTOR")]
    name: String,
    #[tabled(rename = "CSF")]
    critical: String,
    #[tabled(rename = "PROGRESS")]
    progress: String,
    #[tabled(rename = "RISK")]
    risk: String,
    #[tabled(rename = "CONTRIBUTING")]
    contributing: usize,
    #[tabled(rename = "SKIPPED")]
    skipped: usize,
    #[tabled(rename = "WEIGHTS")]
    weights: String,
}

impl From<&FactorRollUp> for RollUpRow {
    fn from(r: &FactorRollUp) -> Self {
        let weights = match r.roll_up.weight_sum {
            Some(sum) if r.roll_up.weight_sum_warning => format!("{:.0} (over limit)", sum),
            Some(sum) => format!("{:.0}", sum),
            None => "-".to_string(),
        };
        Self {
            name: r.name.clone(),
            critical: if r.is_critical { "yes" } else { "no" }.to_string(),
            progress: derived_number(&r.roll_up.weighted_progress, "%"),
            risk: band_label(r.roll_up.aggregate_risk).to_string(),
            contributing: r.roll_up.contributing.len(),
            skipped: r.roll_up.skipped.len(),
            weights,
        }
    }
}

/// Roll up one factor by name, or every factor when `name` is absent.
///
/// Critical factors roll up through their weighted links, plain factors
/// through the indicators they own.
pub async fn run(service: &Service, name: Option<&str>, format: OutputFormat) -> Result<()> {
    let roll_ups = match name {
        Some(name) => {
            let factor = service.factor(name).await?;
            let roll_up = if factor.is_critical {
                service.roll_up_csf(name).await?
            } else {
                service.roll_up_success_factor(name).await?
            };
            vec![roll_up]
        }
        None => service.roll_up_all().await?,
    };

    for roll_up in roll_ups.iter().filter(|r| r.roll_up.weight_sum_warning) {
        print_warning(&format!(
            "{}: link weights sum to {:.0}, above the configured maximum",
            roll_up.name,
            roll_up.roll_up.weight_sum.unwrap_or_default()
        ));
    }

    let rows: Vec<RollUpRow> = roll_ups.iter().map(RollUpRow::from).collect();
    match (name, roll_ups.first()) {
        (Some(_), Some(single)) => output::print_output(single, rows, format),
        _ => output::print_output(&roll_ups, rows, format),
    }
}
