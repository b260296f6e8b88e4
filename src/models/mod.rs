//! Forecasting models.

mod traits;

pub mod arima;
pub mod seasonal;

pub use seasonal::{default_spec, FittedModel, SeasonalForecastModel, WEEKS_PER_YEAR};
pub use traits::{BoxedForecaster, Forecaster};
