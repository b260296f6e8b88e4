//! Loading weather CSV files and configuration from disk.

use std::io::Write;

use anofox_weather::config::ForecastConfig;
use anofox_weather::core::{Variable, WeatherDataset};
use anofox_weather::error::{ErrorCategory, ForecastError};
use anofox_weather::features::{
    correlation_matrix, rainfall_histogram, rainfall_moving_average, ClimateSummary,
    CORRELATION_COLUMNS, RAINFALL_BINS, RAINFALL_WINDOW,
};
use anofox_weather::pipeline::ForecastOrchestrator;
use chrono::{Duration, NaiveDate};
use tempfile::NamedTempFile;

const HEADER: &str =
    "Date,Location,MinTemp,MaxTemp,Rainfall,Evaporation,Humidity9am,Humidity3pm,Temp3pm,RainToday";

/// Write `days` of daily rows per location in the weatherAUS layout.
fn write_csv(locations: &[&str], days: i64) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();

    let start = NaiveDate::from_ymd_opt(2013, 7, 1).unwrap();
    for (offset, location) in locations.iter().enumerate() {
        for i in 0..days {
            let t = i as f64;
            let annual = (2.0 * std::f64::consts::PI * t / 365.25).cos();
            let min = 12.0 + offset as f64 + 5.0 * annual + (t * 0.41).sin();
            let max = min + 9.0 + (t * 0.17).cos();
            let rain = if i % 9 == 0 {
                "NA".to_string()
            } else {
                format!("{:.1}", (3.0 + 2.5 * annual + 2.0 * (t * 0.53).sin()).max(0.0))
            };
            writeln!(
                file,
                "{},{location},{min:.1},{max:.1},{rain},NA,{},{},{:.1},No",
                start + Duration::days(i),
                60 + i % 20,
                45 + i % 10,
                max - 1.5,
            )
            .unwrap();
        }
    }
    file.flush().unwrap();
    file
}

#[test]
fn forecast_from_csv_file() {
    let file = write_csv(&["Sydney", "SydneyAirport", "Darwin"], 3 * 365 + 10);
    let dataset = WeatherDataset::from_path(file.path()).unwrap();
    assert_eq!(dataset.locations(), vec!["Darwin", "Sydney", "SydneyAirport"]);

    let table = ForecastOrchestrator::default()
        .forecast_location(&dataset, "darwin")
        .unwrap();
    assert_eq!(table.horizon(), 26);
    for variable in Variable::ALL {
        assert!(table.column(variable).iter().all(|v| v.is_finite()));
    }
}

#[test]
fn climate_summary_from_csv_file() {
    let file = write_csv(&["Cairns"], 60);
    let dataset = WeatherDataset::from_path(file.path()).unwrap();

    let summary = ClimateSummary::for_location(&dataset, "CAIRNS").unwrap();
    assert_eq!(summary.records, 60);
    assert!(summary.max_temp.unwrap() > summary.min_temp.unwrap());
    assert!(summary.rainfall > 0.0);
    assert!((45.0..55.0).contains(&summary.humidity_3pm.unwrap()));

    let cairns = dataset.filter_location("Cairns").unwrap();
    let trend = rainfall_moving_average(&cairns, RAINFALL_WINDOW);
    assert_eq!(trend.len(), 60);
    // Every window of 30 days contains a missing reading.
    assert!(trend.iter().all(|(_, v)| v.is_nan()));

    let err = ClimateSummary::for_location(&dataset, "Perth").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::LocationNotFound);
}

#[test]
fn correlation_and_rainfall_distribution_from_csv_file() {
    let file = write_csv(&["Cairns"], 120);
    let dataset = WeatherDataset::from_path(file.path()).unwrap();
    let cairns = dataset.filter_location("Cairns").unwrap();

    let matrix = correlation_matrix(&cairns);
    assert_eq!(matrix.values.len(), CORRELATION_COLUMNS.len());
    // Temp3pm is written as MaxTemp - 1.5.
    assert!(matrix.get("MaxTemp", "Temp3pm").unwrap() > 0.99);
    for row in &matrix.values {
        for r in row.iter().flatten() {
            assert!((-1.0..=1.0).contains(r));
        }
    }

    let histogram = rainfall_histogram(&cairns, RAINFALL_BINS);
    assert_eq!(histogram.len(), RAINFALL_BINS);
    // Every ninth day has no rainfall reading.
    let counted: usize = histogram.iter().map(|b| b.count).sum();
    assert_eq!(counted, 120 - 14);
}

#[test]
fn missing_csv_file_is_io_error() {
    let err = WeatherDataset::from_path("/nonexistent/weatherAUS.csv").unwrap_err();
    assert!(matches!(err, ForecastError::Io(_)));
    assert_eq!(err.category(), ErrorCategory::Input);
}

#[test]
fn date_with_time_of_day_is_accepted() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Location,MinTemp,MaxTemp,Rainfall").unwrap();
    writeln!(file, "2017-06-24 09:00:00,Hobart,2.1,11.0,0.4").unwrap();
    writeln!(file, "2017-06-25T15:30:00,Hobart,3.5,12.2,NA").unwrap();
    file.flush().unwrap();

    let dataset = WeatherDataset::from_path(file.path()).unwrap();
    let dates: Vec<NaiveDate> = dataset.records().iter().map(|r| r.date).collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2017, 6, 24).unwrap(),
            NaiveDate::from_ymd_opt(2017, 6, 25).unwrap(),
        ]
    );
}

#[test]
fn config_from_toml_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
horizon = 10

[models.max_temp]
p = 1
d = 0
q = 0
cap_p = 0
cap_d = 1
cap_q = 1
s = 52
"#
    )
    .unwrap();
    file.flush().unwrap();

    let config = ForecastConfig::from_path(file.path()).unwrap();
    assert_eq!(config.horizon, 10);
    assert_eq!(config.spec_for(Variable::MaxTemp).q, 0);
    assert_eq!(config.spec_for(Variable::MinTemp).cap_p, 1);
}
