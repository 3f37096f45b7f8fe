//! Configuration for kpictl

use indicator_engine::EvaluationConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiConfig {
    /// Evaluation tunables handed to the engine
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Dataset file used when `--dataset` is not given
    #[serde(default)]
    pub dataset: Option<PathBuf>,

    /// User recorded in audit stamps
    #[serde(default = "default_user")]
    pub user: String,
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            evaluation: EvaluationConfig::default(),
            logging: LoggingConfig::default(),
            dataset: None,
            user: default_user(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_user() -> String {
    "kpictl".to_string()
}

impl KpiConfig {
    /// Load configuration: defaults, then the optional file, then `KPI_`
    /// environment variables (`__` separates nested keys, e.g.
    /// `KPI_EVALUATION__STRICT_TARGETS=true`).
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&KpiConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("KPI")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
