//! Property tests: band classification and indicator evaluation.
//!
//! Bands must be monotonic in the value for either direction, an unset cut
//! must never read as Red, and evaluation must be a pure function of its
//! inputs.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use indicator_engine::{
    assemble_hierarchy, evaluate_band, evaluate_indicator, BandStatus, Derived,
    EvaluationConfig, InsufficientData,
};
use indicator_types::{
    Indicator, IndicatorKind, Measurement, MeasurementId, SuccessFactorId, TargetPolicy,
    ThresholdBand,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Three ordered cut points (lowest first).
fn arb_sorted_cuts() -> impl Strategy<Value = (f64, f64, f64)> {
    prop::array::uniform3(-1_000.0f64..1_000.0).prop_map(|mut cuts| {
        cuts.sort_by(|a, b| a.total_cmp(b));
        (cuts[0], cuts[1], cuts[2])
    })
}

/// A band whose cuts are ordered for its direction.
fn arb_valid_band() -> impl Strategy<Value = ThresholdBand> {
    (arb_sorted_cuts(), any::<bool>()).prop_map(|((low, mid, high), higher_is_better)| {
        if higher_is_better {
            ThresholdBand::new(low, mid, high, true)
        } else {
            ThresholdBand::new(high, mid, low, false)
        }
    })
}

fn arb_value() -> impl Strategy<Value = f64> {
    -2_000.0f64..2_000.0
}

/// Severity rank; larger is worse.
fn severity(status: BandStatus) -> u8 {
    status.severity().expect("valid band always classifies")
}

fn measurements_for(indicator: &Indicator, values: &[(u16, f64)]) -> Vec<Measurement> {
    let base = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let recorded = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    values
        .iter()
        .enumerate()
        .map(|(i, (offset, value))| Measurement {
            id: MeasurementId::generate(),
            indicator_id: indicator.id,
            value: *value,
            measured_on: base + Duration::days(i64::from(*offset)),
            period: format!("slot-{i}"),
            status: Default::default(),
            notes: None,
            recorded_by: "analyst".into(),
            recorded_at: recorded + Duration::seconds(i as i64),
            superseded_by: None,
        })
        .collect()
}

fn kpi(target: Option<f64>) -> Indicator {
    Indicator::new("KPI-P", "Property KPI", IndicatorKind::Kpi, SuccessFactorId::generate())
        .with_target(TargetPolicy {
            target,
            ..Default::default()
        })
        .with_band(ThresholdBand::new(10.0, 50.0, 90.0, true))
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// A better value never lands in a worse band.
    #[test]
    fn band_is_monotonic_in_value(
        band in arb_valid_band(),
        a in arb_value(),
        b in arb_value(),
    ) {
        let (worse, better) = match (band.higher_is_better, a <= b) {
            (true, true) | (false, false) => (a, b),
            _ => (b, a),
        };
        prop_assert!(severity(evaluate_band(better, &band)) <= severity(evaluate_band(worse, &band)));
    }

    /// Any unset cut point yields Unknown, whatever the value.
    #[test]
    fn missing_cut_is_unknown_never_red(
        band in arb_valid_band(),
        missing in 0usize..3,
        value in arb_value(),
    ) {
        let mut band = band;
        match missing {
            0 => band.red = None,
            1 => band.yellow = None,
            _ => band.green = None,
        }
        prop_assert_eq!(evaluate_band(value, &band), BandStatus::Unknown);
    }

    /// Evaluating the same inputs twice gives the same result.
    #[test]
    fn evaluation_is_idempotent(
        target in prop::option::of(-500.0f64..500.0),
        points in prop::collection::vec((0u16..400, -1_000.0f64..1_000.0), 0..12),
    ) {
        let indicator = kpi(target);
        let measurements = measurements_for(&indicator, &points);
        let config = EvaluationConfig::default();

        let first = evaluate_indicator(&indicator, &measurements, &config).unwrap();
        let second = evaluate_indicator(&indicator, &measurements, &config).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Input order of the history does not change the outcome.
    #[test]
    fn evaluation_ignores_input_order(
        points in prop::collection::vec((0u16..400, -1_000.0f64..1_000.0), 1..12),
    ) {
        let indicator = kpi(Some(100.0));
        let measurements = measurements_for(&indicator, &points);
        let mut reversed = measurements.clone();
        reversed.reverse();
        let config = EvaluationConfig::default();

        let forward = evaluate_indicator(&indicator, &measurements, &config).unwrap();
        let backward = evaluate_indicator(&indicator, &reversed, &config).unwrap();
        prop_assert_eq!(forward, backward);
    }

    /// No target, or a zero target, never yields an achievement percentage.
    #[test]
    fn achievement_absent_without_usable_target(
        zero in any::<bool>(),
        value in -1_000.0f64..1_000.0,
    ) {
        let target = if zero { Some(0.0) } else { None };
        let indicator = kpi(target);
        let measurements = measurements_for(&indicator, &[(0, value)]);
        let eval = evaluate_indicator(&indicator, &measurements, &EvaluationConfig::default()).unwrap();

        let expected = if zero { InsufficientData::ZeroTarget } else { InsufficientData::NoTarget };
        prop_assert_eq!(eval.achievement_pct, Derived::Insufficient(expected));
        prop_assert!(eval.coarse_status.value().is_none());
    }

    /// Every indicator lands in exactly one place in the hierarchy.
    #[test]
    fn hierarchy_places_each_indicator_once(
        kri_count in 0usize..4,
        ri_parents in prop::collection::vec(prop::option::of(0usize..6), 0..6),
        pi_parents in prop::collection::vec(prop::option::of(0usize..8), 0..8),
    ) {
        let factor = SuccessFactorId::generate();
        let kris: Vec<Indicator> = (0..kri_count)
            .map(|i| Indicator::new(format!("K{i}"), "kri", IndicatorKind::Kri, factor))
            .collect();

        // Indexes past the end point at ids that do not resolve.
        let dangling = indicator_types::IndicatorId::generate();
        let ris: Vec<Indicator> = ri_parents
            .iter()
            .enumerate()
            .map(|(i, parent)| {
                let ri = Indicator::new(format!("R{i}"), "ri", IndicatorKind::Ri, factor);
                match parent {
                    Some(p) => ri.with_parent(kris.get(*p).map_or(dangling, |k| k.id)),
                    None => ri,
                }
            })
            .collect();
        let pis: Vec<Indicator> = pi_parents
            .iter()
            .enumerate()
            .map(|(i, parent)| {
                let pi = Indicator::new(format!("P{i}"), "pi", IndicatorKind::Pi, factor);
                match parent {
                    Some(p) => pi.with_parent(ris.get(*p).map_or(dangling, |r| r.id)),
                    None => pi,
                }
            })
            .collect();

        let tree = assemble_hierarchy(&kris, &ris, &pis);
        let total = kris.len() + ris.len() + pis.len();
        prop_assert_eq!(tree.len(), total);

        let mut placed: Vec<_> = tree.indicator_ids().collect();
        placed.sort();
        placed.dedup();
        prop_assert_eq!(placed.len(), total);
    }
}
