//! Indicator lifecycle state machine.
//!
//! ```text
//! Draft -> Active <-> UnderReview -> Approved
//! Active | UnderReview | Approved -> Archived | Deprecated
//! ```
//!
//! Archived and Deprecated are terminal. Indicators are soft-retired through
//! them rather than deleted.

use chrono::{DateTime, Utc};
use indicator_types::{Indicator, IndicatorStatus};
use tracing::debug;

use crate::error::{EngineError, EngineResult};

/// Whether `from -> to` is an allowed lifecycle transition.
pub fn can_transition(from: IndicatorStatus, to: IndicatorStatus) -> bool {
    use indicator_types::IndicatorStatus::*;

    matches!(
        (from, to),
        (Draft, Active)
            | (Active, UnderReview)
            | (UnderReview, Active)
            | (UnderReview, Approved)
            | (Active | UnderReview | Approved, Archived | Deprecated)
    )
}

/// States reachable from `from` in one step.
pub fn next_states(from: IndicatorStatus) -> Vec<IndicatorStatus> {
    use indicator_types::IndicatorStatus::*;

    [Draft, Active, UnderReview, Approved, Archived, Deprecated]
        .into_iter()
        .filter(|to| can_transition(from, *to))
        .collect()
}

/// Move `indicator` to `to`, stamping `updated_at`.
///
/// The indicator is left untouched when the transition is not allowed.
pub fn transition(
    indicator: &mut Indicator,
    to: IndicatorStatus,
    at: DateTime<Utc>,
) -> EngineResult<IndicatorStatus> {
    let from = indicator.status;
    if !can_transition(from, to) {
        return Err(EngineError::InvalidTransition { from, to });
    }

    indicator.status = to;
    indicator.updated_at = at;
    debug!(code = %indicator.code, %from, %to, "Indicator transitioned");
    Ok(from)
}
