//! Tunable evaluation settings.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Complete evaluation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default)]
    pub trend: TrendConfig,

    #[serde(default)]
    pub coarse_status: CoarseStatusThresholds,

    #[serde(default)]
    pub roll_up: RollUpConfig,

    /// Treat a missing target as a configuration error instead of
    /// "insufficient data"
    #[serde(default)]
    pub strict_targets: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            trend: TrendConfig::default(),
            coarse_status: CoarseStatusThresholds::default(),
            roll_up: RollUpConfig::default(),
            strict_targets: false,
        }
    }
}

impl EvaluationConfig {
    /// Reject settings the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.trend.validate()?;
        self.coarse_status.validate()?;
        self.roll_up.validate()
    }
}

/// Trend classification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Relative change (percent of the earlier value) a move must exceed to
    /// count as improving or declining
    #[serde(default = "default_noise_threshold_pct")]
    pub noise_threshold_pct: f64,

    /// Number of trailing points inspected for fluctuation (at least 3)
    #[serde(default = "default_fluctuation_window")]
    pub fluctuation_window: usize,

    /// Direction reversals inside the window needed to report `Fluctuating`
    #[serde(default = "default_fluctuation_min_alternations")]
    pub fluctuation_min_alternations: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            noise_threshold_pct: default_noise_threshold_pct(),
            fluctuation_window: default_fluctuation_window(),
            fluctuation_min_alternations: default_fluctuation_min_alternations(),
        }
    }
}

impl TrendConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.noise_threshold_pct.is_finite() || self.noise_threshold_pct < 0.0 {
            return Err(ConfigurationError::InvalidSetting {
                setting: "trend.noise_threshold_pct",
                reason: format!("must be a non-negative number, got {}", self.noise_threshold_pct),
            });
        }
        if self.fluctuation_window < 3 {
            return Err(ConfigurationError::InvalidSetting {
                setting: "trend.fluctuation_window",
                reason: format!("must be at least 3, got {}", self.fluctuation_window),
            });
        }
        if self.fluctuation_min_alternations == 0 {
            return Err(ConfigurationError::InvalidSetting {
                setting: "trend.fluctuation_min_alternations",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Achievement percentages at which the coarse status steps down
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoarseStatusThresholds {
    #[serde(default = "default_achieved_pct")]
    pub achieved_pct: f64,
    #[serde(default = "default_on_target_pct")]
    pub on_target_pct: f64,
    #[serde(default = "default_below_target_pct")]
    pub below_target_pct: f64,
}

impl Default for CoarseStatusThresholds {
    fn default() -> Self {
        Self {
            achieved_pct: default_achieved_pct(),
            on_target_pct: default_on_target_pct(),
            below_target_pct: default_below_target_pct(),
        }
    }
}

impl CoarseStatusThresholds {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (setting, value) in [
            ("coarse_status.achieved_pct", self.achieved_pct),
            ("coarse_status.on_target_pct", self.on_target_pct),
            ("coarse_status.below_target_pct", self.below_target_pct),
        ] {
            if !value.is_finite() {
                return Err(ConfigurationError::InvalidSetting {
                    setting,
                    reason: format!("must be finite, got {}", value),
                });
            }
        }
        if !(self.achieved_pct >= self.on_target_pct && self.on_target_pct >= self.below_target_pct)
        {
            return Err(ConfigurationError::InvalidSetting {
                setting: "coarse_status",
                reason: format!(
                    "thresholds must descend: achieved {} >= on_target {} >= below_target {}",
                    self.achieved_pct, self.on_target_pct, self.below_target_pct
                ),
            });
        }
        Ok(())
    }
}

/// Roll-up settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollUpConfig {
    /// Per-indicator achievement is capped here before weighting
    #[serde(default = "default_achievement_cap")]
    pub achievement_cap_pct: f64,

    /// Link weight total above which a CSF is flagged as mis-configured
    #[serde(default = "default_max_weight_sum")]
    pub max_weight_sum: f64,
}

impl Default for RollUpConfig {
    fn default() -> Self {
        Self {
            achievement_cap_pct: default_achievement_cap(),
            max_weight_sum: default_max_weight_sum(),
        }
    }
}

impl RollUpConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.achievement_cap_pct.is_finite() || self.achievement_cap_pct <= 0.0 {
            return Err(ConfigurationError::InvalidSetting {
                setting: "roll_up.achievement_cap_pct",
                reason: format!("must be positive, got {}", self.achievement_cap_pct),
            });
        }
        if !self.max_weight_sum.is_finite() || self.max_weight_sum <= 0.0 {
            return Err(ConfigurationError::InvalidSetting {
                setting: "roll_up.max_weight_sum",
                reason: format!("must be positive, got {}", self.max_weight_sum),
            });
        }
        Ok(())
    }
}

// Default value helpers
fn default_noise_threshold_pct() -> f64 {
    0.0
}

fn default_fluctuation_window() -> usize {
    4
}

fn default_fluctuation_min_alternations() -> usize {
    2
}

fn default_achieved_pct() -> f64 {
    100.0
}

fn default_on_target_pct() -> f64 {
    75.0
}

fn default_below_target_pct() -> f64 {
    50.0
}

fn default_achievement_cap() -> f64 {
    100.0
}

fn default_max_weight_sum() -> f64 {
    100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EvaluationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trend.noise_threshold_pct, 0.0);
        assert_eq!(config.coarse_status.on_target_pct, 75.0);
        assert_eq!(config.roll_up.max_weight_sum, 100.0);
    }

    #[test]
    fn test_short_fluctuation_window_rejected() {
        let mut config = EvaluationConfig::default();
        config.trend.fluctuation_window = 2;
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidSetting { setting: "trend.fluctuation_window", .. })
        ));
    }

    #[test]
    fn test_negative_noise_rejected() {
        let mut config = TrendConfig::default();
        config.noise_threshold_pct = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_coarse_thresholds_must_descend() {
        let thresholds = CoarseStatusThresholds {
            achieved_pct: 100.0,
            on_target_pct: 40.0,
            below_target_pct: 60.0,
        };
        assert!(thresholds.validate().is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: EvaluationConfig =
            serde_json::from_str(r#"{"trend": {"noise_threshold_pct": 2.5}}"#).unwrap();
        assert_eq!(config.trend.noise_threshold_pct, 2.5);
        assert_eq!(config.trend.fluctuation_window, 4);
        assert!(!config.strict_targets);
    }
}
