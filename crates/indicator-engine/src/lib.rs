//! # indicator-engine
//!
//! Pure evaluation rules for the indicator hierarchy:
//!
//! - **Bands**: Red/Yellow/Green classification against a direction-aware
//!   threshold band, with `Unknown` kept distinct from `Red`
//! - **Evaluation**: current value, achievement %, variance, trend, coarse
//!   status, alerts and bounds for one indicator and its history
//! - **Recording**: (indicator, date, period) uniqueness, explicit supersede,
//!   terminal-state guard, period label derivation
//! - **Lifecycle**: Draft → Active ⇄ UnderReview → Approved → Archived/Deprecated
//! - **Hierarchy**: KRI → RI → PI/KPI tree assembled from parent ids
//! - **Roll-up**: weighted CSF progress and worst-band aggregate risk
//!
//! Every function here is synchronous and side-effect free apart from
//! `tracing` events. Missing data is reported as [`Derived::Insufficient`],
//! never as an error and never as zero.

#![deny(unsafe_code)]

pub mod band;
pub mod config;
pub mod derived;
pub mod error;
pub mod evaluation;
pub mod hierarchy;
pub mod lifecycle;
pub mod period;
pub mod policy;
pub mod recording;
pub mod rollup;
pub mod summary;
pub mod trend;

pub use band::{evaluate_band, validate_band, BandStatus, ValidatedBand};
pub use config::{CoarseStatusThresholds, EvaluationConfig, RollUpConfig, TrendConfig};
pub use derived::{Derived, InsufficientData};
pub use error::{ConfigurationError, EngineError, EngineResult, RecordError};
pub use evaluation::{
    achievement, evaluate_indicator, AlertBreach, AlertState, CoarseStatus, IndicatorEvaluation,
};
pub use hierarchy::{
    assemble_hierarchy, hierarchy_from_indicators, IndicatorHierarchy, KeyResultNode, ResultNode,
};
pub use lifecycle::{can_transition, next_states, transition};
pub use period::{period_label, resolve_period};
pub use policy::{validate_indicator, validate_target_policy};
pub use recording::{record_measurement, RecordMode, RecordedMeasurement};
pub use rollup::{roll_up_csf, roll_up_success_factor, RollUp};
pub use summary::{summarize, BandCounts, CoarseCounts, PortfolioSummary};
pub use trend::{classify_trend, Trend};
