//! Period labels for measurements.

use chrono::{Datelike, NaiveDate};
use indicator_types::MeasurementFrequency;

/// Derive the period label for `date` at the given frequency.
///
/// | frequency | label        |
/// |-----------|--------------|
/// | daily     | `2024-03-01` |
/// | weekly    | `W09 2024` (ISO week and ISO year) |
/// | monthly   | `Mar 2024`   |
/// | quarterly | `Q1 2024`    |
/// | annual    | `2024`       |
pub fn period_label(date: NaiveDate, frequency: MeasurementFrequency) -> String {
    match frequency {
        MeasurementFrequency::Daily => date.format("%Y-%m-%d").to_string(),
        MeasurementFrequency::Weekly => {
            let week = date.iso_week();
            format!("W{:02} {}", week.week(), week.year())
        }
        MeasurementFrequency::Monthly => date.format("%b %Y").to_string(),
        MeasurementFrequency::Quarterly => format!("Q{} {}", date.month0() / 3 + 1, date.year()),
        MeasurementFrequency::Annual => date.year().to_string(),
    }
}

/// Use the caller's label if it is non-blank, otherwise derive one.
pub fn resolve_period(
    supplied: Option<&str>,
    date: NaiveDate,
    frequency: MeasurementFrequency,
) -> String {
    match supplied.map(str::trim) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => period_label(date, frequency),
    }
}
