//! Climate summary and rainfall trend for a location.

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::{ObservationRecord, WeatherDataset};
use crate::error::{ForecastError, Result};
use crate::transform::rolling_mean;

/// Daily observations per point of the rainfall moving average.
pub const RAINFALL_WINDOW: usize = 30;

/// Aggregate statistics over every record of a location.
///
/// Missing values are skipped. A statistic is `None` (JSON `null`) when no
/// record carries the underlying column, except total rainfall, which is
/// `0.0` then.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateSummary {
    pub location: String,
    pub records: usize,
    /// Highest `MaxTemp`.
    pub max_temp: Option<f64>,
    /// Lowest `MinTemp`.
    pub min_temp: Option<f64>,
    /// Mean `Temp3pm`.
    pub avg_temp: Option<f64>,
    /// Total `Rainfall`.
    pub rainfall: f64,
    /// Mean `Humidity3pm`.
    pub humidity_3pm: Option<f64>,
    /// Mean `Humidity9am`.
    pub humidity_9am: Option<f64>,
}

impl ClimateSummary {
    /// Summarize `records` under the name `location`.
    ///
    /// Empty `records` fail with [`ForecastError::LocationNotFound`].
    pub fn summarize(location: &str, records: &[ObservationRecord]) -> Result<Self> {
        let location = location.trim();
        if records.is_empty() {
            return Err(ForecastError::LocationNotFound(location.to_string()));
        }

        let column = |f: fn(&ObservationRecord) -> Option<f64>| records.iter().filter_map(f);

        Ok(Self {
            location: location.to_string(),
            records: records.len(),
            max_temp: column(|r| r.max_temp).reduce(f64::max),
            min_temp: column(|r| r.min_temp).reduce(f64::min),
            avg_temp: mean(column(|r| r.temp_3pm)),
            rainfall: column(|r| r.rainfall).sum(),
            humidity_3pm: mean(column(|r| r.humidity_3pm)),
            humidity_9am: mean(column(|r| r.humidity_9am)),
        })
    }

    /// Filter `dataset` by `location` and summarize the matches.
    pub fn for_location(dataset: &WeatherDataset, location: &str) -> Result<Self> {
        let records = dataset.filter_location(location)?;
        Self::summarize(location, &records)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Trailing `window`-observation mean of daily rainfall, by date.
///
/// Records are sorted by date first. Points are NaN until the window fills
/// and wherever the window holds a missing value.
pub fn rainfall_moving_average(
    records: &[ObservationRecord],
    window: usize,
) -> Vec<(NaiveDate, f64)> {
    let mut sorted: Vec<&ObservationRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.date);

    let rainfall: Vec<f64> = sorted
        .iter()
        .map(|r| r.rainfall.unwrap_or(f64::NAN))
        .collect();

    sorted
        .iter()
        .map(|r| r.date)
        .zip(rolling_mean(&rainfall, window))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(day: u32, min: f64, max: f64, rain: Option<f64>) -> ObservationRecord {
        ObservationRecord::new(
            "Cairns",
            NaiveDate::from_ymd_opt(2017, 3, day).unwrap(),
            Some(min),
            Some(max),
            rain,
        )
    }

    #[test]
    fn climate_summary_statistics() {
        let records = vec![
            record(1, 21.0, 31.5, Some(4.0))
                .with_temp_3pm(Some(30.0))
                .with_humidity(Some(80.0), Some(60.0)),
            record(2, 19.5, 33.0, None)
                .with_temp_3pm(Some(32.0))
                .with_humidity(Some(70.0), None),
            record(3, 22.0, 29.0, Some(12.5)),
        ];

        let summary = ClimateSummary::summarize("Cairns", &records).unwrap();
        assert_eq!(summary.records, 3);
        assert_eq!(summary.max_temp, Some(33.0));
        assert_eq!(summary.min_temp, Some(19.5));
        assert_relative_eq!(summary.avg_temp.unwrap(), 31.0);
        assert_relative_eq!(summary.rainfall, 16.5);
        assert_relative_eq!(summary.humidity_9am.unwrap(), 75.0);
        assert_relative_eq!(summary.humidity_3pm.unwrap(), 60.0);
    }

    #[test]
    fn climate_summary_missing_columns_are_null() {
        let summary = ClimateSummary::summarize("Cairns", &[record(1, 20.0, 30.0, None)]).unwrap();
        assert_eq!(summary.rainfall, 0.0);
        assert_eq!(summary.avg_temp, None);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["humidity_3pm"].is_null());
        assert_eq!(json["rainfall"], 0.0);
        assert_eq!(json["max_temp"], 30.0);
    }

    #[test]
    fn climate_summary_requires_records() {
        assert_eq!(
            ClimateSummary::summarize("Nowhere", &[]),
            Err(ForecastError::LocationNotFound("Nowhere".to_string()))
        );
    }

    #[test]
    fn rainfall_moving_average_sorts_by_date() {
        let records = vec![
            record(3, 0.0, 0.0, Some(6.0)),
            record(1, 0.0, 0.0, Some(2.0)),
            record(2, 0.0, 0.0, Some(4.0)),
            record(4, 0.0, 0.0, None),
        ];

        let averaged = rainfall_moving_average(&records, 2);
        let dates: Vec<u32> = averaged.iter().map(|(d, _)| chrono::Datelike::day(d)).collect();
        assert_eq!(dates, vec![1, 2, 3, 4]);
        assert!(averaged[0].1.is_nan());
        assert_relative_eq!(averaged[1].1, 3.0);
        assert_relative_eq!(averaged[2].1, 5.0);
        assert!(averaged[3].1.is_nan());
    }
}
