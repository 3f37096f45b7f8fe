//! Measurement recording command

use super::{MeasurementStatusArg, Service};
use crate::output::{self, print_success};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use indicator_engine::RecordMode;
use indicator_types::NewMeasurement;

/// Arguments for `kpictl record`
#[derive(Debug, Args)]
pub struct RecordArgs {
    /// Indicator code
    pub code: String,

    /// Measured value
    #[arg(allow_negative_numbers = true)]
    pub value: f64,

    /// Measurement date (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,

    /// Period label; derived from the date and frequency when omitted
    #[arg(long)]
    pub period: Option<String>,

    /// Provenance of the value
    #[arg(long, value_enum)]
    pub status: Option<MeasurementStatusArg>,

    /// Replace the active measurement for the same date and period
    #[arg(long)]
    pub supersede: bool,

    /// Free-text notes
    #[arg(long)]
    pub notes: Option<String>,
}

impl RecordArgs {
    fn to_new_measurement(&self) -> Result<NewMeasurement> {
        let measured_on = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .with_context(|| format!("invalid --date {:?}, expected YYYY-MM-DD", self.date))?;

        let mut new = NewMeasurement::new(self.value, measured_on);
        if let Some(period) = &self.period {
            new = new.with_period(period);
        }
        if let Some(status) = self.status {
            new = new.with_status(status.into());
        }
        if let Some(notes) = &self.notes {
            new = new.with_notes(notes);
        }
        Ok(new)
    }

    fn mode(&self) -> RecordMode {
        if self.supersede {
            RecordMode::Supersede
        } else {
            RecordMode::Reject
        }
    }
}

/// Record a measurement and print the stored record
pub async fn run(service: &Service, args: &RecordArgs) -> Result<()> {
    let new = args.to_new_measurement()?;
    let recorded = service.record_measurement(&args.code, new, args.mode()).await?;

    match recorded.superseded {
        Some(previous) => print_success(&format!(
            "Recorded {} for {} ({}), superseding {}",
            recorded.measurement.value, args.code, recorded.measurement.period, previous
        )),
        None => print_success(&format!(
            "Recorded {} for {} ({})",
            recorded.measurement.value, args.code, recorded.measurement.period
        )),
    }
    output::print_json(&recorded.measurement)
}
