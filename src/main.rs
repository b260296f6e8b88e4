//! # anofox-weather
//!
//! Command-line driver: forecasts and climate summaries from a weather CSV.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anofox_weather::config::ForecastConfig;
use anofox_weather::core::WeatherDataset;
use anofox_weather::features::{
    correlation_matrix, rainfall_histogram, rainfall_moving_average, ClimateSummary,
    RAINFALL_BINS, RAINFALL_WINDOW,
};
use anofox_weather::pipeline::{ErrorResponse, ForecastOrchestrator, ForecastResponse};
use anofox_weather::ForecastError;
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "anofox-weather")]
#[command(about = "Weekly weather forecasts from daily station records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast minimum/maximum temperature and rainfall for a location
    Forecast {
        /// Historical observations (weatherAUS CSV layout)
        #[arg(short, long)]
        data: PathBuf,

        /// Location name, matched case-insensitively as a substring
        #[arg(short, long)]
        location: String,

        /// TOML configuration file (optional)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of weeks to forecast (overrides the config)
        #[arg(long)]
        horizon: Option<usize>,
    },

    /// Summarize the recorded climate of a location
    Summary {
        /// Historical observations (weatherAUS CSV layout)
        #[arg(short, long)]
        data: PathBuf,

        /// Location name, matched case-insensitively as a substring
        #[arg(short, long)]
        location: String,
    },

    /// Trailing moving average of daily rainfall for a location
    RainfallTrend {
        /// Historical observations (weatherAUS CSV layout)
        #[arg(short, long)]
        data: PathBuf,

        /// Location name, matched case-insensitively as a substring
        #[arg(short, long)]
        location: String,

        /// Observations per window
        #[arg(short, long, default_value_t = RAINFALL_WINDOW)]
        window: usize,
    },

    /// Pairwise correlation of the temperature, rainfall and humidity columns
    Correlation {
        /// Historical observations (weatherAUS CSV layout)
        #[arg(short, long)]
        data: PathBuf,

        /// Location name, matched case-insensitively as a substring
        #[arg(short, long)]
        location: String,
    },

    /// Histogram of daily rainfall for a location
    RainfallDistribution {
        /// Historical observations (weatherAUS CSV layout)
        #[arg(short, long)]
        data: PathBuf,

        /// Location name, matched case-insensitively as a substring
        #[arg(short, long)]
        location: String,

        /// Number of equal-width bins
        #[arg(short, long, default_value_t = RAINFALL_BINS)]
        bins: usize,
    },
}

#[derive(Serialize)]
struct TrendPoint {
    #[serde(rename = "Date")]
    date: chrono::NaiveDate,
    #[serde(rename = "Rainfall_MA")]
    rainfall_ma: Option<f64>,
}

fn load_config(
    path: Option<&Path>,
    horizon: Option<usize>,
) -> Result<ForecastConfig, ForecastError> {
    let config = match path {
        Some(path) => ForecastConfig::from_path(path)?,
        None => ForecastConfig::default(),
    };
    match horizon {
        Some(h) => {
            let config = config.with_horizon(h);
            config.validate()?;
            Ok(config)
        }
        None => Ok(config),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// Print the outcome as JSON and report whether it succeeded.
fn emit<T: Serialize>(result: Result<T, ForecastError>) -> anyhow::Result<bool> {
    match result {
        Ok(value) => {
            print_json(&value)?;
            Ok(true)
        }
        Err(err) => {
            tracing::warn!(error = %err, "request failed");
            print_json(&ErrorResponse::from(&err))?;
            Ok(false)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    match cli.command {
        Commands::Forecast {
            data,
            location,
            config,
            horizon,
        } => {
            let result = load_config(config.as_deref(), horizon)
                .and_then(ForecastOrchestrator::new)
                .and_then(|orchestrator| {
                    let dataset = WeatherDataset::from_path(&data)?;
                    orchestrator.forecast_location(&dataset, &location)
                });
            let response = ForecastResponse::from(result);
            print_json(&response)?;
            Ok(response.is_success())
        }
        Commands::Summary { data, location } => emit(
            WeatherDataset::from_path(&data)
                .and_then(|dataset| ClimateSummary::for_location(&dataset, &location)),
        ),
        Commands::RainfallTrend {
            data,
            location,
            window,
        } => emit(
            WeatherDataset::from_path(&data)
                .and_then(|dataset| dataset.filter_location(&location))
                .map(|records| {
                    rainfall_moving_average(&records, window)
                        .into_iter()
                        .map(|(date, value)| TrendPoint {
                            date,
                            rainfall_ma: value.is_finite().then_some(value),
                        })
                        .collect::<Vec<_>>()
                }),
        ),
        Commands::Correlation { data, location } => emit(
            WeatherDataset::from_path(&data)
                .and_then(|dataset| dataset.filter_location(&location))
                .map(|records| correlation_matrix(&records)),
        ),
        Commands::RainfallDistribution {
            data,
            location,
            bins,
        } => emit(
            WeatherDataset::from_path(&data)
                .and_then(|dataset| dataset.filter_location(&location))
                .map(|records| rainfall_histogram(&records, bins)),
        ),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "anofox_weather=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
