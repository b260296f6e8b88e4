//! # anofox-weather
//!
//! Weekly weather forecasting for station locations.
//!
//! Irregular daily observations are resampled to a gap-free weekly series,
//! one seasonal ARIMA model is fitted per variable (minimum temperature,
//! maximum temperature, rainfall), and the three forecasts are joined into a
//! table of future weeks.
//!
//! # Example
//!
//! ```no_run
//! use anofox_weather::prelude::*;
//!
//! let dataset = WeatherDataset::from_path("weatherAUS.csv")?;
//! let orchestrator = ForecastOrchestrator::new(ForecastConfig::default())?;
//! let table = orchestrator.forecast_location(&dataset, "Sydney")?;
//!
//! for point in &table {
//!     println!(
//!         "{} {:.1} {:.1} {:.1}",
//!         point.date, point.min_temp, point.max_temp, point.rainfall
//!     );
//! }
//! # Ok::<(), anofox_weather::ForecastError>(())
//! ```

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod models;
pub mod pipeline;
pub mod transform;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::config::ForecastConfig;
    pub use crate::core::{
        ForecastPoint, ForecastTable, ObservationRecord, RegularizedSeries, Variable,
        WeatherDataset,
    };
    pub use crate::error::{ErrorCategory, ForecastError, Result};
    pub use crate::features::ClimateSummary;
    pub use crate::models::{Forecaster, SeasonalForecastModel};
    pub use crate::pipeline::{ForecastOrchestrator, ForecastResponse};
    pub use crate::transform::SeriesRegularizer;
}
