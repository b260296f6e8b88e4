//! Property-based tests for regularization and forecasting.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated weekly and daily data.

use anofox_weather::config::ForecastConfig;
use anofox_weather::core::{ObservationRecord, RegularizedSeries, Variable};
use anofox_weather::pipeline::ForecastOrchestrator;
use anofox_weather::transform::{interpolate_gaps, SeriesRegularizer};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

/// A Sunday, so each week's single record closes its own week.
fn base_sunday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2016, 1, 3).unwrap()
}

/// Build a weekly series from seasonal columns with a random base and
/// amplitude plus bounded noise.
fn seasonal_series(
    len: usize,
    period: usize,
    base: f64,
    amplitude: f64,
    noise: &[f64],
) -> RegularizedSeries {
    let column = |offset: f64, scale: f64| -> Vec<f64> {
        (0..len)
            .map(|i| {
                let phase = 2.0 * std::f64::consts::PI * i as f64 / period as f64;
                offset + scale * phase.sin() + noise[i % noise.len()]
            })
            .collect()
    };
    let timestamps = (0..len)
        .map(|i| base_sunday() + Duration::weeks(i as i64))
        .collect();
    RegularizedSeries::new(
        timestamps,
        column(base, amplitude),
        column(base + 10.0, amplitude * 1.2),
        column(amplitude, amplitude * 0.5),
    )
    .unwrap()
}

/// Strategy for seasonal weekly series with period 4.
fn seasonal_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = RegularizedSeries> {
    (
        min_len..max_len,
        5.0..25.0_f64,
        1.0..8.0_f64,
        prop::collection::vec(-0.5..0.5_f64, 1..16),
    )
        .prop_map(|(len, base, amplitude, noise)| {
            seasonal_series(len, 4, base, amplitude, &noise)
        })
}

fn weekly_record(week: usize, value: f64) -> ObservationRecord {
    ObservationRecord::new(
        "Perth",
        base_sunday() + Duration::weeks(week as i64),
        Some(value),
        Some(value + 10.0),
        Some(value.abs()),
    )
}

fn small_period_config(horizon: usize) -> ForecastConfig {
    ForecastConfig::default()
        .with_horizon(horizon)
        .with_seasonal_period(4)
}

// =============================================================================
// Property: Forecast length and timestamps
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn forecast_length_matches_horizon(
        series in seasonal_strategy(12, 48),
        horizon in 1usize..30
    ) {
        let orchestrator = ForecastOrchestrator::new(small_period_config(horizon)).unwrap();
        let table = orchestrator.forecast_series(&series).unwrap();

        prop_assert_eq!(table.horizon(), horizon);
        let last = series.last_timestamp().unwrap();
        prop_assert_eq!(table.first().unwrap().date, last + Duration::days(7));
        for pair in table.dates().windows(2) {
            prop_assert_eq!(pair[1] - pair[0], Duration::days(7));
        }
    }

    #[test]
    fn forecast_values_are_finite(series in seasonal_strategy(12, 48)) {
        let orchestrator = ForecastOrchestrator::new(small_period_config(8)).unwrap();
        let table = orchestrator.forecast_series(&series).unwrap();
        for variable in Variable::ALL {
            prop_assert!(table.column(variable).iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn forecast_is_deterministic(series in seasonal_strategy(12, 40)) {
        let orchestrator = ForecastOrchestrator::new(small_period_config(6)).unwrap();
        let first = orchestrator.forecast_series(&series).unwrap();
        let second = orchestrator.forecast_series(&series).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn too_short_series_fails_every_model(series in seasonal_strategy(3, 8)) {
        let orchestrator = ForecastOrchestrator::new(small_period_config(4)).unwrap();
        let err = orchestrator.forecast_series(&series).unwrap_err();
        prop_assert!(err.is_model_fit());
    }
}

// =============================================================================
// Property: Gap filling
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn single_hole_is_midpoint(
        values in prop::collection::vec(-20.0..40.0_f64, 3..20),
        hole_seed in any::<usize>()
    ) {
        let hole = 1 + hole_seed % (values.len() - 2);
        let records: Vec<_> = values
            .iter()
            .enumerate()
            .filter(|(week, _)| *week != hole)
            .map(|(week, &v)| weekly_record(week, v))
            .collect();

        let series = SeriesRegularizer::default().regularize(&records).unwrap();
        prop_assert_eq!(series.len(), values.len());

        let expected = (values[hole - 1] + values[hole + 1]) / 2.0;
        let filled = series.values(Variable::MinTemp)[hole];
        prop_assert!((filled - expected).abs() < 1e-9);
        prop_assert_eq!(series.filled(Variable::MinTemp), 1);
    }

    #[test]
    fn interpolation_keeps_known_values(
        values in prop::collection::vec(prop::option::of(-50.0..50.0_f64), 1..40)
    ) {
        let raw: Vec<f64> = values.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
        let filled = interpolate_gaps(&raw);
        prop_assert_eq!(filled.len(), raw.len());
        for (before, after) in raw.iter().zip(&filled) {
            if before.is_finite() {
                prop_assert_eq!(before, after);
            }
        }
    }

    #[test]
    fn regularized_series_is_weekly_and_complete(
        days in prop::collection::vec(prop::option::of(0.0..30.0_f64), 14..120),
        start_offset in 0i64..7
    ) {
        let start = base_sunday() + Duration::days(start_offset);
        let records: Vec<_> = days
            .iter()
            .enumerate()
            .map(|(i, v)| {
                ObservationRecord::new("Perth", start + Duration::days(i as i64), *v, *v, *v)
            })
            .collect();

        // Gap-heavy inputs may be rejected; accepted ones must be regular.
        if let Ok(series) = SeriesRegularizer::default().regularize(&records) {
            prop_assert!(series.len() >= 2);
            for pair in series.timestamps().windows(2) {
                prop_assert_eq!(pair[1] - pair[0], Duration::days(7));
            }
            for variable in Variable::ALL {
                prop_assert!(series.values(variable).iter().all(|v| v.is_finite()));
            }
        }
    }

    #[test]
    fn regularization_ignores_record_order(
        values in prop::collection::vec(0.0..30.0_f64, 14..60),
        seed in any::<u64>()
    ) {
        let records: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                ObservationRecord::new(
                    "Perth",
                    base_sunday() + Duration::days(i as i64),
                    Some(v),
                    Some(v + 5.0),
                    Some(v / 2.0),
                )
            })
            .collect();

        let mut shuffled = records.clone();
        let len = shuffled.len();
        let mut state = seed;
        for i in (1..len).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            shuffled.swap(i, (state >> 33) as usize % (i + 1));
        }

        let regularizer = SeriesRegularizer::default();
        prop_assert_eq!(
            regularizer.regularize(&records).unwrap(),
            regularizer.regularize(&shuffled).unwrap()
        );
    }
}
