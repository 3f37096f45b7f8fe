//! Serializable snapshot of a whole indicator portfolio.

use crate::error::StoreResult;
use indicator_types::{CsfIndicatorLink, Indicator, Measurement, SuccessFactor};
use serde::{Deserialize, Serialize};

/// Every record the store holds, as one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub success_factors: Vec<SuccessFactor>,

    #[serde(default)]
    pub indicators: Vec<Indicator>,

    #[serde(default)]
    pub measurements: Vec<Measurement>,

    #[serde(default)]
    pub links: Vec<CsfIndicatorLink>,
}

impl Dataset {
    pub fn from_json(json: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.success_factors.is_empty()
            && self.indicators.is_empty()
            && self.measurements.is_empty()
            && self.links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicator_types::IndicatorKind;

    #[test]
    fn missing_sections_default_to_empty() {
        let dataset = Dataset::from_json("{}").unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn json_round_trip_keeps_records() {
        let factor = SuccessFactor::critical("Customer retention");
        let indicator = Indicator::new("KRI-001", "Retention rate", IndicatorKind::Kri, factor.id);
        let dataset = Dataset {
            success_factors: vec![factor],
            indicators: vec![indicator],
            ..Default::default()
        };
        let json = dataset.to_json_pretty().unwrap();
        assert!(json.contains("\"kind\": \"KRI\""));
        assert_eq!(Dataset::from_json(&json).unwrap(), dataset);
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        assert!(matches!(
            Dataset::from_json("{ not json"),
            Err(crate::error::StoreError::Serialization(_))
        ));
    }
}
