//! kpictl - operator CLI for the indicator engine
//!
//! Works on a JSON dataset file holding success factors, indicators,
//! measurements and CSF links. It can:
//! - Evaluate indicators and print the KRI → RI → PI/KPI hierarchy
//! - Roll up success factors and summarize the portfolio
//! - Record measurements and move indicators through their lifecycle

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicator_store::{IndicatorService, SystemAuditContext};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod dataset;
mod output;

use commands::{evaluate, lifecycle, record, rollup};
use commands::{ImpactArg, StatusArg, StrengthArg};
use config::KpiConfig;
use output::{print_error, OutputFormat};

/// kpictl CLI
#[derive(Parser)]
#[command(name = "kpictl")]
#[command(about = "Indicator hierarchy evaluation and measurement recording", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "KPI_CONFIG")]
    config: Option<String>,

    /// Dataset file (JSON)
    #[arg(short, long, env = "KPI_DATASET")]
    dataset: Option<PathBuf>,

    /// Output format (json, table)
    #[arg(short, long, value_enum, default_value = "json")]
    output: OutputFormat,

    /// Log level or filter directive
    #[arg(long, env = "KPI_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "KPI_LOG_JSON")]
    json: bool,

    /// User recorded in audit fields
    #[arg(short, long, env = "KPI_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Evaluate one indicator, or every indicator
    Evaluate {
        /// Indicator code
        code: Option<String>,
    },

    /// Show the indicator hierarchy
    Hierarchy,

    /// Roll up one success factor, or every factor
    Rollup {
        /// Success factor name
        name: Option<String>,
    },

    /// Portfolio dashboard counts
    Summary,

    /// Check indicator policies
    Validate,

    /// Record a measurement
    Record(record::RecordArgs),

    /// Move an indicator to another lifecycle state
    Transition {
        /// Indicator code
        code: String,

        /// Target state
        #[arg(value_enum)]
        state: StatusArg,
    },

    /// Delete an indicator, or archive it when it has measurements
    Retire {
        /// Indicator code
        code: String,
    },

    /// Link an indicator to a critical success factor
    Link {
        /// Critical success factor name
        csf: String,

        /// Indicator code
        code: String,

        /// Contribution weight (0-100)
        weight: f64,

        #[arg(long, value_enum, default_value = "moderate")]
        strength: StrengthArg,

        #[arg(long, value_enum, default_value = "medium")]
        impact: ImpactArg,
    },

    /// Show the effective configuration
    Config,
}

impl Commands {
    fn mutates(&self) -> bool {
        matches!(
            self,
            Commands::Record(_)
                | Commands::Transition { .. }
                | Commands::Retire { .. }
                | Commands::Link { .. }
        )
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        print_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Load config, then let flags override it
    let mut config = KpiConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(level) = cli.log_level.clone() {
        config.logging.level = level;
    }
    if cli.json {
        config.logging.json = true;
    }
    if let Some(dataset) = cli.dataset.clone() {
        config.dataset = Some(dataset);
    }
    if let Some(user) = cli.user.clone() {
        config.user = user;
    }

    init_tracing(&config);

    if let Commands::Config = cli.command {
        return output::print_json(&config);
    }

    let path = config
        .dataset
        .clone()
        .context("no dataset given; pass --dataset or set KPI_DATASET")?;
    let store = dataset::load(&path).await?;
    let audit = Arc::new(SystemAuditContext::new(config.user.clone()));
    let service = IndicatorService::new(store, audit, config.evaluation.clone())
        .context("invalid evaluation configuration")?;

    let format = cli.output;
    match &cli.command {
        Commands::Evaluate { code } => evaluate::evaluate(&service, code.as_deref(), format).await?,
        Commands::Hierarchy => evaluate::hierarchy(&service, format).await?,
        Commands::Rollup { name } => rollup::run(&service, name.as_deref(), format).await?,
        Commands::Summary => evaluate::summary(&service, format).await?,
        Commands::Validate => evaluate::validate(&service, format).await?,
        Commands::Record(args) => record::run(&service, args).await?,
        Commands::Transition { code, state } => {
            lifecycle::transition(&service, code, *state).await?
        }
        Commands::Retire { code } => lifecycle::retire(&service, code).await?,
        Commands::Link {
            csf,
            code,
            weight,
            strength,
            impact,
        } => lifecycle::link(&service, csf, code, *weight, *strength, *impact).await?,
        Commands::Config => {}
    }

    if cli.command.mutates() {
        dataset::save(service.store(), &path).await?;
        debug!(path = %path.display(), "Dataset updated");
    }
    Ok(())
}

/// Logs go to stderr; stdout carries command output only
fn init_tracing(config: &KpiConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
