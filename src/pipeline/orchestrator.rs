//! Forecast orchestration for one location.

use rayon::prelude::*;

use crate::config::ForecastConfig;
use crate::core::{ForecastTable, ObservationRecord, RegularizedSeries, Variable, WeatherDataset};
use crate::error::{ForecastError, Result};
use crate::models::SeasonalForecastModel;
use crate::transform::SeriesRegularizer;

/// Runs the full pipeline for a location's history.
///
/// Holds no per-request state; one orchestrator can serve concurrent
/// requests.
///
/// # Example
/// ```no_run
/// use anofox_weather::core::WeatherDataset;
/// use anofox_weather::pipeline::ForecastOrchestrator;
///
/// let dataset = WeatherDataset::from_path("weatherAUS.csv").unwrap();
/// let table = ForecastOrchestrator::default()
///     .forecast_location(&dataset, "sydney")
///     .unwrap();
/// assert_eq!(table.horizon(), 26);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ForecastOrchestrator {
    config: ForecastConfig,
    regularizer: SeriesRegularizer,
}

impl ForecastOrchestrator {
    /// Create an orchestrator after validating `config`.
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            regularizer: SeriesRegularizer::new(config.regularizer),
            config,
        })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast every variable `config.horizon` weeks past the end of
    /// `records`.
    ///
    /// Empty `records` fail with [`ForecastError::LocationNotFound`] before
    /// any resampling. A failure in any single variable fails the request.
    pub fn run_forecast(
        &self,
        location: &str,
        records: &[ObservationRecord],
    ) -> Result<ForecastTable> {
        let location = location.trim();
        if records.is_empty() {
            tracing::warn!(location, "no records for location");
            return Err(ForecastError::LocationNotFound(location.to_string()));
        }
        tracing::info!(location, records = records.len(), "forecast requested");

        let series = self.regularizer.regularize(records).inspect_err(|err| {
            tracing::warn!(location, error = %err, "regularization failed");
        })?;
        tracing::debug!(
            location,
            weeks = series.len(),
            first = ?series.first_timestamp(),
            last = ?series.last_timestamp(),
            "series regularized"
        );

        let table = self.forecast_series(&series).inspect_err(|err| {
            tracing::warn!(location, error = %err, "forecast failed");
        })?;

        tracing::info!(
            location,
            horizon = table.horizon(),
            first = ?table.first().map(|p| p.date),
            "forecast complete"
        );
        Ok(table)
    }

    /// Fit and forecast each variable of an already regularized series.
    pub fn forecast_series(&self, series: &RegularizedSeries) -> Result<ForecastTable> {
        let horizon = self.config.horizon;

        let results: Vec<Result<Vec<f64>>> = Variable::ALL
            .as_slice()
            .par_iter()
            .map(|&variable| {
                SeasonalForecastModel::new(variable, self.config.spec_for(variable))
                    .fit(series)?
                    .forecast(horizon)
            })
            .collect();

        // Report the first failure in column order.
        let mut columns = Vec::with_capacity(Variable::ALL.len());
        for result in results {
            columns.push(result?);
        }

        let dates = series.future_timestamps(horizon)?;
        ForecastTable::from_columns(&dates, &columns[0], &columns[1], &columns[2])
    }

    /// Filter `dataset` by `location` and forecast the matching records.
    pub fn forecast_location(
        &self,
        dataset: &WeatherDataset,
        location: &str,
    ) -> Result<ForecastTable> {
        let records = dataset.filter_location(location)?;
        self.run_forecast(location, &records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::arima::SARIMASpec;
    use chrono::{Duration, NaiveDate};

    fn daily_records(location: &str, days: i64) -> Vec<ObservationRecord> {
        let start = NaiveDate::from_ymd_opt(2016, 1, 4).unwrap();
        (0..days)
            .map(|i| {
                let t = i as f64;
                let season = (2.0 * std::f64::consts::PI * t / 56.0).sin();
                ObservationRecord::new(
                    location,
                    start + Duration::days(i),
                    Some(14.0 + 4.0 * season + 0.5 * (t * 0.9).sin()),
                    Some(25.0 + 5.0 * season + 0.7 * (t * 1.1).cos()),
                    Some((2.0 + 2.0 * season + (t * 0.7).sin()).max(0.0)),
                )
            })
            .collect()
    }

    fn small_period_config() -> ForecastConfig {
        ForecastConfig::default()
            .with_horizon(6)
            .with_seasonal_period(8)
    }

    #[test]
    fn orchestrator_produces_aligned_table() {
        let orchestrator = ForecastOrchestrator::new(small_period_config()).unwrap();
        let records = daily_records("Albury", 7 * 30);
        let table = orchestrator.run_forecast("Albury", &records).unwrap();

        assert_eq!(table.horizon(), 6);
        let dates = table.dates();
        for pair in dates.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(7));
        }
        assert!(table
            .iter()
            .all(|p| p.min_temp.is_finite() && p.max_temp.is_finite() && p.rainfall.is_finite()));
    }

    #[test]
    fn orchestrator_empty_records_is_location_not_found() {
        let orchestrator = ForecastOrchestrator::default();
        assert_eq!(
            orchestrator.run_forecast(" Atlantis ", &[]),
            Err(ForecastError::LocationNotFound("Atlantis".to_string()))
        );
    }

    #[test]
    fn orchestrator_propagates_regularization_errors() {
        let orchestrator = ForecastOrchestrator::default();
        let records = daily_records("Albury", 3);
        let err = orchestrator.run_forecast("Albury", &records).unwrap_err();
        assert!(matches!(err, ForecastError::InsufficientData { .. }));
    }

    #[test]
    fn orchestrator_single_failure_fails_request() {
        // Rainfall needs two 52-week seasons; the temperatures need two of 8.
        let config = small_period_config().with_model(
            Variable::Rainfall,
            SARIMASpec::new(0, 0, 0, 1, 1, 1, 52),
        );
        let orchestrator = ForecastOrchestrator::new(config).unwrap();
        let err = orchestrator
            .run_forecast("Albury", &daily_records("Albury", 7 * 30))
            .unwrap_err();

        match err {
            ForecastError::ModelFit { variable, .. } => assert_eq!(variable, Variable::Rainfall),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn orchestrator_rejects_invalid_config() {
        assert!(ForecastOrchestrator::new(ForecastConfig::default().with_horizon(0)).is_err());
        let huge = ForecastConfig::default().with_horizon(usize::MAX);
        assert!(matches!(
            ForecastOrchestrator::new(huge),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn orchestrator_filters_dataset() {
        let mut records = daily_records("Albury", 7 * 30);
        records.extend(daily_records("Darwin", 10));
        let dataset = WeatherDataset::from_records(records);
        let orchestrator = ForecastOrchestrator::new(small_period_config()).unwrap();

        assert!(orchestrator.forecast_location(&dataset, "ALB").is_ok());
        assert!(matches!(
            orchestrator.forecast_location(&dataset, "Perth"),
            Err(ForecastError::LocationNotFound(_))
        ));
    }
}
