//! Output formatting utilities
//!
//! Command results go to stdout; status messages go to stderr so JSON
//! output stays machine-readable.

use anyhow::Result;
use colored::*;
use indicator_engine::{BandStatus, Derived};
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Table format
    Table,
}

/// Print a list either as JSON (`data`) or as a table (`rows`)
pub fn print_output<T, R>(data: &T, rows: Vec<R>, format: OutputFormat) -> Result<()>
where
    T: Serialize + ?Sized,
    R: Tabled,
{
    match format {
        OutputFormat::Json => print_json(data),
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("{}", "No results".dimmed());
            } else {
                println!("{}", Table::new(rows));
            }
            Ok(())
        }
    }
}

/// Print a single item as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(data: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Render a derived number for a table cell
pub fn derived_number(value: &Derived<f64>, suffix: &str) -> String {
    match value {
        Derived::Available(v) => format!("{:.1}{}", v, suffix),
        Derived::Insufficient(reason) => format!("n/a ({})", reason.describe()),
    }
}

pub fn band_label(band: BandStatus) -> &'static str {
    match band {
        BandStatus::Green => "green",
        BandStatus::Yellow => "yellow",
        BandStatus::Red => "red",
        BandStatus::Unknown => "unknown",
    }
}
