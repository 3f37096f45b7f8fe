//! Storage trait definitions

use crate::error::StoreResult;
use async_trait::async_trait;
use indicator_types::{
    CsfIndicatorLink, Indicator, IndicatorId, LinkId, Measurement, MeasurementId, SuccessFactor,
    SuccessFactorId,
};

/// Combined storage trait
#[async_trait]
pub trait Store:
    IndicatorStore + MeasurementStore + SuccessFactorStore + LinkStore + Send + Sync
{
}

impl<T> Store for T where
    T: IndicatorStore + MeasurementStore + SuccessFactorStore + LinkStore + Send + Sync
{
}

/// Storage for indicators
#[async_trait]
pub trait IndicatorStore: Send + Sync {
    /// Get an indicator by ID
    async fn get_indicator(&self, id: &IndicatorId) -> StoreResult<Option<Indicator>>;

    /// Get an indicator by its unique code
    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Indicator>>;

    /// List all indicators, ordered by code
    async fn list_indicators(&self) -> StoreResult<Vec<Indicator>>;

    /// List indicators owned by a success factor
    async fn list_indicators_for_factor(
        &self,
        factor_id: &SuccessFactorId,
    ) -> StoreResult<Vec<Indicator>>;

    /// Create or update an indicator; the code must stay unique
    async fn save_indicator(&self, indicator: Indicator) -> StoreResult<()>;

    /// Delete an indicator with its measurements and CSF links
    async fn delete_indicator(&self, id: &IndicatorId) -> StoreResult<bool>;
}

/// Storage for measurements
#[async_trait]
pub trait MeasurementStore: Send + Sync {
    /// Get a measurement by ID
    async fn get_measurement(&self, id: &MeasurementId) -> StoreResult<Option<Measurement>>;

    /// All measurements of an indicator (superseded ones included), oldest first
    async fn list_measurements(&self, indicator_id: &IndicatorId) -> StoreResult<Vec<Measurement>>;

    /// Number of measurements held for an indicator
    async fn count_measurements(&self, indicator_id: &IndicatorId) -> StoreResult<usize>;

    /// Insert a new measurement. An active record in the same
    /// (indicator, date, period) slot is a conflict.
    async fn insert_measurement(&self, measurement: Measurement) -> StoreResult<()>;

    /// Atomically mark `previous` superseded by `replacement` and insert it.
    /// The replacement must belong to a known indicator and occupy the same
    /// indicator and slot as `previous`.
    async fn supersede_measurement(
        &self,
        previous: &MeasurementId,
        replacement: Measurement,
    ) -> StoreResult<()>;

    /// Delete a measurement by ID
    async fn delete_measurement(&self, id: &MeasurementId) -> StoreResult<bool>;
}

/// Storage for success factors
#[async_trait]
pub trait SuccessFactorStore: Send + Sync {
    /// Get a success factor by ID
    async fn get_factor(&self, id: &SuccessFactorId) -> StoreResult<Option<SuccessFactor>>;

    /// Get a success factor by name
    async fn find_factor_by_name(&self, name: &str) -> StoreResult<Option<SuccessFactor>>;

    /// List all success factors, ordered by name
    async fn list_factors(&self) -> StoreResult<Vec<SuccessFactor>>;

    /// Create or update a success factor
    async fn save_factor(&self, factor: SuccessFactor) -> StoreResult<()>;

    /// Delete a success factor and its CSF links. Refused with
    /// `FactorInUse` while any indicator still belongs to the factor.
    async fn delete_factor(&self, id: &SuccessFactorId) -> StoreResult<bool>;
}

/// Storage for CSF-indicator links
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Links of one CSF
    async fn links_for_factor(&self, csf_id: &SuccessFactorId) -> StoreResult<Vec<CsfIndicatorLink>>;

    /// Links pointing at one indicator
    async fn links_for_indicator(
        &self,
        indicator_id: &IndicatorId,
    ) -> StoreResult<Vec<CsfIndicatorLink>>;

    /// List all links
    async fn list_links(&self) -> StoreResult<Vec<CsfIndicatorLink>>;

    /// Create or update a link; one link per (CSF, indicator) pair
    async fn save_link(&self, link: CsfIndicatorLink) -> StoreResult<()>;

    /// Delete a link by ID
    async fn delete_link(&self, id: &LinkId) -> StoreResult<bool>;
}
