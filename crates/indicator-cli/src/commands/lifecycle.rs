//! Commands that change indicator status or CSF links

use super::{ImpactArg, Service, StatusArg, StrengthArg};
use crate::output::{self, print_success, print_warning};
use anyhow::Result;
use indicator_engine::{next_states, EngineError};
use indicator_store::{LinkStore, Removal, ServiceError};
use indicator_types::IndicatorStatus;

/// Move an indicator to `state`
pub async fn transition(service: &Service, code: &str, state: StatusArg) -> Result<()> {
    let to = IndicatorStatus::from(state);
    let current = service.indicator(code).await?.status;

    let indicator = match service.transition(code, to).await {
        Ok(indicator) => indicator,
        Err(err @ ServiceError::Engine(EngineError::InvalidTransition { .. })) => {
            let allowed: Vec<String> = next_states(current).iter().map(|s| s.to_string()).collect();
            if allowed.is_empty() {
                print_warning(&format!("{} is {} and cannot change status", code, current));
            } else {
                print_warning(&format!(
                    "{} is {}; allowed next states: {}",
                    code,
                    current,
                    allowed.join(", ")
                ));
            }
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    print_success(&format!("{} moved from {} to {}", code, current, indicator.status));
    output::print_json(&indicator)
}

/// Delete an indicator, or archive it when measurements exist
pub async fn retire(service: &Service, code: &str) -> Result<()> {
    let removal = service.retire_or_delete(code).await?;
    match removal {
        Removal::Deleted => print_success(&format!("{} deleted", code)),
        Removal::Retired { from } if from.is_terminal() => {
            print_warning(&format!("{} has measurements and is already {}", code, from))
        }
        Removal::Retired { from } => print_success(&format!(
            "{} has measurements; archived instead of deleted (was {})",
            code, from
        )),
    }
    output::print_json(&removal)
}

/// Link an indicator to a critical success factor
pub async fn link(
    service: &Service,
    csf: &str,
    code: &str,
    weight: f64,
    strength: StrengthArg,
    impact: ImpactArg,
) -> Result<()> {
    let link = service
        .link_indicator(csf, code, weight, strength.into(), impact.into())
        .await?;

    let total: f64 = service
        .store()
        .links_for_factor(&link.csf_id)
        .await?
        .iter()
        .map(|l| l.weight)
        .sum();
    if total > service.config().roll_up.max_weight_sum {
        print_warning(&format!(
            "{} link weights now sum to {:.0}, above the configured maximum",
            csf, total
        ));
    }

    print_success(&format!("{} linked to {} with weight {}", code, csf, weight));
    output::print_json(&link)
}
