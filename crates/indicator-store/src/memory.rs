//! In-memory storage implementation
//!
//! Locks are always taken in the order factors, indicators, measurements,
//! links.

use crate::dataset::Dataset;
use crate::error::{StoreError, StoreResult};
use crate::traits::*;
use async_trait::async_trait;
use indicator_types::{
    CsfIndicatorLink, Indicator, IndicatorId, LinkId, Measurement, MeasurementId, SuccessFactor,
    SuccessFactorId,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory storage for the CLI and tests
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    factors: Arc<RwLock<HashMap<SuccessFactorId, SuccessFactor>>>,
    indicators: Arc<RwLock<HashMap<IndicatorId, Indicator>>>,
    measurements: Arc<RwLock<HashMap<MeasurementId, Measurement>>>,
    links: Arc<RwLock<HashMap<LinkId, CsfIndicatorLink>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            factors: Arc::new(RwLock::new(HashMap::new())),
            indicators: Arc::new(RwLock::new(HashMap::new())),
            measurements: Arc::new(RwLock::new(HashMap::new())),
            links: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Load a dataset, enforcing the same rules as individual inserts
    pub async fn from_dataset(dataset: Dataset) -> StoreResult<Self> {
        let store = Self::new();
        for factor in dataset.success_factors {
            store.save_factor(factor).await?;
        }
        for indicator in dataset.indicators {
            store.save_indicator(indicator).await?;
        }
        // Superseded records first so they never block their replacements.
        let (superseded, active): (Vec<_>, Vec<_>) = dataset
            .measurements
            .into_iter()
            .partition(|m| m.superseded_by.is_some());
        for measurement in superseded.into_iter().chain(active) {
            store.insert_measurement(measurement).await?;
        }
        for link in dataset.links {
            store.save_link(link).await?;
        }
        Ok(store)
    }

    /// Export the whole store, in a stable order
    pub async fn snapshot(&self) -> Dataset {
        let factors = self.factors.read().await;
        let indicators = self.indicators.read().await;
        let measurements = self.measurements.read().await;
        let links = self.links.read().await;

        let mut success_factors: Vec<_> = factors.values().cloned().collect();
        success_factors.sort_by(|a, b| a.name.cmp(&b.name));

        let mut indicators: Vec<_> = indicators.values().cloned().collect();
        indicators.sort_by(|a, b| a.code.cmp(&b.code));

        let mut measurements: Vec<_> = measurements.values().cloned().collect();
        sort_chronologically(&mut measurements);

        let mut links: Vec<_> = links.values().cloned().collect();
        links.sort_by_key(|l| (l.csf_id, l.indicator_id));

        Dataset {
            success_factors,
            indicators,
            measurements,
            links,
        }
    }
}

fn sort_chronologically(measurements: &mut [Measurement]) {
    measurements.sort_by(|a, b| {
        a.measured_on
            .cmp(&b.measured_on)
            .then(a.recorded_at.cmp(&b.recorded_at))
            .then(a.id.cmp(&b.id))
    });
}

fn slot_conflict<'a>(
    measurements: &'a HashMap<MeasurementId, Measurement>,
    candidate: &Measurement,
) -> Option<&'a Measurement> {
    measurements.values().find(|m| {
        m.id != candidate.id
            && m.indicator_id == candidate.indicator_id
            && m.is_active()
            && m.occupies(candidate.measured_on, &candidate.period)
    })
}

fn duplicate_measurement(existing: &Measurement) -> StoreError {
    StoreError::DuplicateMeasurement {
        indicator_id: existing.indicator_id,
        measured_on: existing.measured_on,
        period: existing.period.clone(),
        existing: existing.id,
    }
}

#[async_trait]
impl IndicatorStore for InMemoryStore {
    async fn get_indicator(&self, id: &IndicatorId) -> StoreResult<Option<Indicator>> {
        let indicators = self.indicators.read().await;
        Ok(indicators.get(id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Indicator>> {
        let indicators = self.indicators.read().await;
        Ok(indicators.values().find(|i| i.code == code).cloned())
    }

    async fn list_indicators(&self) -> StoreResult<Vec<Indicator>> {
        let indicators = self.indicators.read().await;
        let mut list: Vec<_> = indicators.values().cloned().collect();
        list.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(list)
    }

    async fn list_indicators_for_factor(
        &self,
        factor_id: &SuccessFactorId,
    ) -> StoreResult<Vec<Indicator>> {
        let indicators = self.indicators.read().await;
        let mut list: Vec<_> = indicators
            .values()
            .filter(|i| &i.success_factor_id == factor_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(list)
    }

    async fn save_indicator(&self, indicator: Indicator) -> StoreResult<()> {
        let factors = self.factors.read().await;
        if !factors.contains_key(&indicator.success_factor_id) {
            return Err(StoreError::SuccessFactorNotFound(indicator.success_factor_id));
        }

        let mut indicators = self.indicators.write().await;
        if let Some(holder) = indicators
            .values()
            .find(|i| i.code == indicator.code && i.id != indicator.id)
        {
            return Err(StoreError::DuplicateCode {
                code: indicator.code.clone(),
                existing: holder.id,
            });
        }
        indicators.insert(indicator.id, indicator);
        Ok(())
    }

    async fn delete_indicator(&self, id: &IndicatorId) -> StoreResult<bool> {
        let mut indicators = self.indicators.write().await;
        let mut measurements = self.measurements.write().await;
        let mut links = self.links.write().await;

        if indicators.remove(id).is_none() {
            return Ok(false);
        }
        let before = (measurements.len(), links.len());
        measurements.retain(|_, m| &m.indicator_id != id);
        links.retain(|_, l| &l.indicator_id != id);
        debug!(
            indicator = %id,
            measurements = before.0 - measurements.len(),
            links = before.1 - links.len(),
            "Indicator deleted with dependents"
        );
        Ok(true)
    }
}

#[async_trait]
impl MeasurementStore for InMemoryStore {
    async fn get_measurement(&self, id: &MeasurementId) -> StoreResult<Option<Measurement>> {
        let measurements = self.measurements.read().await;
        Ok(measurements.get(id).cloned())
    }

    async fn list_measurements(&self, indicator_id: &IndicatorId) -> StoreResult<Vec<Measurement>> {
        let measurements = self.measurements.read().await;
        let mut list: Vec<_> = measurements
            .values()
            .filter(|m| &m.indicator_id == indicator_id)
            .cloned()
            .collect();
        sort_chronologically(&mut list);
        Ok(list)
    }

    async fn count_measurements(&self, indicator_id: &IndicatorId) -> StoreResult<usize> {
        let measurements = self.measurements.read().await;
        Ok(measurements
            .values()
            .filter(|m| &m.indicator_id == indicator_id)
            .count())
    }

    async fn insert_measurement(&self, measurement: Measurement) -> StoreResult<()> {
        let indicators = self.indicators.read().await;
        if !indicators.contains_key(&measurement.indicator_id) {
            return Err(StoreError::IndicatorNotFound(measurement.indicator_id));
        }

        let mut measurements = self.measurements.write().await;
        if measurement.is_active() {
            if let Some(existing) = slot_conflict(&measurements, &measurement) {
                return Err(duplicate_measurement(existing));
            }
        }
        measurements.insert(measurement.id, measurement);
        Ok(())
    }

    async fn supersede_measurement(
        &self,
        previous: &MeasurementId,
        replacement: Measurement,
    ) -> StoreResult<()> {
        let indicators = self.indicators.read().await;
        if !indicators.contains_key(&replacement.indicator_id) {
            return Err(StoreError::IndicatorNotFound(replacement.indicator_id));
        }

        let mut measurements = self.measurements.write().await;

        let prior = measurements
            .get(previous)
            .ok_or(StoreError::MeasurementNotFound(*previous))?;
        if !prior.is_active() {
            return Err(StoreError::AlreadySuperseded(*previous));
        }
        if replacement.indicator_id != prior.indicator_id
            || !replacement.occupies(prior.measured_on, &prior.period)
        {
            return Err(StoreError::SlotMismatch {
                previous: *previous,
                replacement: replacement.id,
            });
        }

        // Any other active record in the replacement's slot is still a conflict.
        if let Some(existing) = slot_conflict(&measurements, &replacement)
            .filter(|m| &m.id != previous)
        {
            return Err(duplicate_measurement(existing));
        }

        if let Some(prior) = measurements.get_mut(previous) {
            prior.superseded_by = Some(replacement.id);
        }
        measurements.insert(replacement.id, replacement);
        Ok(())
    }

    async fn delete_measurement(&self, id: &MeasurementId) -> StoreResult<bool> {
        let mut measurements = self.measurements.write().await;
        Ok(measurements.remove(id).is_some())
    }
}

#[async_trait]
impl SuccessFactorStore for InMemoryStore {
    async fn get_factor(&self, id: &SuccessFactorId) -> StoreResult<Option<SuccessFactor>> {
        let factors = self.factors.read().await;
        Ok(factors.get(id).cloned())
    }

    async fn find_factor_by_name(&self, name: &str) -> StoreResult<Option<SuccessFactor>> {
        let factors = self.factors.read().await;
        Ok(factors.values().find(|f| f.name == name).cloned())
    }

    async fn list_factors(&self) -> StoreResult<Vec<SuccessFactor>> {
        let factors = self.factors.read().await;
        let mut list: Vec<_> = factors.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    async fn save_factor(&self, factor: SuccessFactor) -> StoreResult<()> {
        let mut factors = self.factors.write().await;
        if factors
            .values()
            .any(|f| f.name == factor.name && f.id != factor.id)
        {
            return Err(StoreError::DuplicateFactorName(factor.name));
        }
        factors.insert(factor.id, factor);
        Ok(())
    }

    async fn delete_factor(&self, id: &SuccessFactorId) -> StoreResult<bool> {
        let mut factors = self.factors.write().await;
        let indicators = self.indicators.read().await;
        let mut links = self.links.write().await;

        if !factors.contains_key(id) {
            return Ok(false);
        }
        let owned = indicators
            .values()
            .filter(|i| &i.success_factor_id == id)
            .count();
        if owned > 0 {
            return Err(StoreError::FactorInUse {
                factor_id: *id,
                indicators: owned,
            });
        }

        factors.remove(id);
        links.retain(|_, l| &l.csf_id != id);
        Ok(true)
    }
}

#[async_trait]
impl LinkStore for InMemoryStore {
    async fn links_for_factor(&self, csf_id: &SuccessFactorId) -> StoreResult<Vec<CsfIndicatorLink>> {
        let links = self.links.read().await;
        let mut list: Vec<_> = links
            .values()
            .filter(|l| &l.csf_id == csf_id)
            .cloned()
            .collect();
        list.sort_by_key(|l| l.indicator_id);
        Ok(list)
    }

    async fn links_for_indicator(
        &self,
        indicator_id: &IndicatorId,
    ) -> StoreResult<Vec<CsfIndicatorLink>> {
        let links = self.links.read().await;
        let mut list: Vec<_> = links
            .values()
            .filter(|l| &l.indicator_id == indicator_id)
            .cloned()
            .collect();
        list.sort_by_key(|l| l.csf_id);
        Ok(list)
    }

    async fn list_links(&self) -> StoreResult<Vec<CsfIndicatorLink>> {
        let links = self.links.read().await;
        let mut list: Vec<_> = links.values().cloned().collect();
        list.sort_by_key(|l| (l.csf_id, l.indicator_id));
        Ok(list)
    }

    async fn save_link(&self, link: CsfIndicatorLink) -> StoreResult<()> {
        let factors = self.factors.read().await;
        let indicators = self.indicators.read().await;
        if !factors.contains_key(&link.csf_id) {
            return Err(StoreError::SuccessFactorNotFound(link.csf_id));
        }
        if !indicators.contains_key(&link.indicator_id) {
            return Err(StoreError::IndicatorNotFound(link.indicator_id));
        }

        let mut links = self.links.write().await;
        if links.values().any(|l| {
            l.csf_id == link.csf_id && l.indicator_id == link.indicator_id && l.id != link.id
        }) {
            return Err(StoreError::DuplicateLink {
                csf_id: link.csf_id,
                indicator_id: link.indicator_id,
            });
        }
        links.insert(link.id, link);
        Ok(())
    }

    async fn delete_link(&self, id: &LinkId) -> StoreResult<bool> {
        let mut links = self.links.write().await;
        Ok(links.remove(id).is_some())
    }
}
