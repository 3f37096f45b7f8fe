//! Trend classification over a chronological series of values.

use indicator_types::MeasurementDirection;
use serde::Serialize;

use crate::config::TrendConfig;
use crate::derived::{Derived, InsufficientData};
use crate::error::ConfigurationError;

/// Direction of recent movement, judged against the indicator's direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
    Fluctuating,
}

/// Classify the trend of `values` (oldest first).
///
/// The trailing window is checked for fluctuation first: if the significant
/// moves inside it reverse direction at least
/// `fluctuation_min_alternations` times the series is `Fluctuating`.
/// Otherwise the last two points decide: a move toward the better side that
/// exceeds the noise threshold is `Improving`, one toward the worse side is
/// `Declining`, anything else is `Stable`.
///
/// An invalid `config` is an error even when there are too few points to
/// classify.
pub fn classify_trend(
    values: &[f64],
    direction: MeasurementDirection,
    config: &TrendConfig,
) -> Result<Derived<Trend>, ConfigurationError> {
    config.validate()?;

    match values.len() {
        0 => return Ok(Derived::Insufficient(InsufficientData::NoMeasurements)),
        1 => return Ok(Derived::Insufficient(InsufficientData::SinglePoint)),
        _ => {}
    }

    if is_fluctuating(values, config) {
        return Ok(Derived::Available(Trend::Fluctuating));
    }

    let prior = values[values.len() - 2];
    let latest = values[values.len() - 1];
    let move_sign = significant_sign(prior, latest, config.noise_threshold_pct);

    let trend = match (move_sign, direction) {
        (0, _) => Trend::Stable,
        (s, MeasurementDirection::HigherIsBetter) if s > 0 => Trend::Improving,
        (s, MeasurementDirection::LowerIsBetter) if s < 0 => Trend::Improving,
        _ => Trend::Declining,
    };
    Ok(Derived::Available(trend))
}

fn is_fluctuating(values: &[f64], config: &TrendConfig) -> bool {
    let window = config.fluctuation_window.min(values.len());
    if window < 3 {
        return false;
    }

    let tail = &values[values.len() - window..];
    let signs: Vec<i8> = tail
        .windows(2)
        .map(|pair| significant_sign(pair[0], pair[1], config.noise_threshold_pct))
        .filter(|s| *s != 0)
        .collect();

    let alternations = signs.windows(2).filter(|pair| pair[0] != pair[1]).count();
    alternations >= config.fluctuation_min_alternations
}

/// +1 / -1 for a move from `from` to `to` larger than `noise_pct` percent of
/// `|from|`, 0 otherwise.
fn significant_sign(from: f64, to: f64, noise_pct: f64) -> i8 {
    let delta = to - from;
    let threshold = from.abs() * noise_pct / 100.0;
    if delta > threshold {
        1
    } else if delta < -threshold {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HIB: MeasurementDirection = MeasurementDirection::HigherIsBetter;
    const LIB: MeasurementDirection = MeasurementDirection::LowerIsBetter;

    fn cfg() -> TrendConfig {
        TrendConfig::default()
    }

    fn trend(values: &[f64], direction: MeasurementDirection, config: &TrendConfig) -> Derived<Trend> {
        classify_trend(values, direction, config).unwrap()
    }

    #[test]
    fn needs_two_points() {
        assert_eq!(
            trend(&[], HIB, &cfg()),
            Derived::Insufficient(InsufficientData::NoMeasurements)
        );
        assert_eq!(
            trend(&[5.0], HIB, &cfg()),
            Derived::Insufficient(InsufficientData::SinglePoint)
        );
    }

    #[test]
    fn two_point_direction_aware() {
        assert_eq!(trend(&[10.0, 20.0], HIB, &cfg()), Derived::Available(Trend::Improving));
        assert_eq!(trend(&[10.0, 20.0], LIB, &cfg()), Derived::Available(Trend::Declining));
        assert_eq!(trend(&[20.0, 10.0], HIB, &cfg()), Derived::Available(Trend::Declining));
        assert_eq!(trend(&[20.0, 10.0], LIB, &cfg()), Derived::Available(Trend::Improving));
        assert_eq!(trend(&[10.0, 10.0], HIB, &cfg()), Derived::Available(Trend::Stable));
    }

    #[test]
    fn noise_threshold_absorbs_small_moves() {
        let config = TrendConfig {
            noise_threshold_pct: 5.0,
            ..cfg()
        };
        // 100 -> 104 is within 5%
        assert_eq!(trend(&[100.0, 104.0], HIB, &config), Derived::Available(Trend::Stable));
        assert_eq!(trend(&[100.0, 106.0], HIB, &config), Derived::Available(Trend::Improving));
        assert_eq!(trend(&[100.0, 94.0], HIB, &config), Derived::Available(Trend::Declining));
    }

    #[test]
    fn alternating_window_is_fluctuating() {
        assert_eq!(
            trend(&[10.0, 20.0, 10.0, 20.0], HIB, &cfg()),
            Derived::Available(Trend::Fluctuating)
        );
    }

    #[test]
    fn single_reversal_is_not_fluctuating() {
        // +, - : one alternation, below the default of two
        assert_eq!(
            trend(&[10.0, 12.0, 11.0], HIB, &cfg()),
            Derived::Available(Trend::Declining)
        );
    }

    #[test]
    fn only_trailing_window_counts() {
        // Early zig-zag falls outside the 4-point window
        let values = [10.0, 20.0, 10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(trend(&values, HIB, &cfg()), Derived::Available(Trend::Improving));
    }

    #[test]
    fn flat_steps_do_not_break_alternation() {
        // +, 0, -, + : zero moves are skipped, leaving + - + (two alternations)
        let config = TrendConfig {
            fluctuation_window: 5,
            ..cfg()
        };
        let values = [10.0, 20.0, 20.0, 10.0, 20.0];
        assert_eq!(trend(&values, HIB, &config), Derived::Available(Trend::Fluctuating));
    }

    #[test]
    fn fluctuation_count_is_tunable() {
        let config = TrendConfig {
            fluctuation_min_alternations: 1,
            ..cfg()
        };
        assert_eq!(
            trend(&[10.0, 12.0, 11.0], HIB, &config),
            Derived::Available(Trend::Fluctuating)
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let zero_alternations = TrendConfig {
            fluctuation_min_alternations: 0,
            ..cfg()
        };
        assert!(matches!(
            classify_trend(&[10.0, 12.0, 11.0], HIB, &zero_alternations),
            Err(ConfigurationError::InvalidSetting {
                setting: "trend.fluctuation_min_alternations",
                ..
            })
        ));

        // Checked before the point count
        let short_window = TrendConfig {
            fluctuation_window: 2,
            ..cfg()
        };
        assert!(classify_trend(&[], HIB, &short_window).is_err());
    }
}
