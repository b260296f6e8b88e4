//! Core data structures: observations, weekly series and forecast tables.

mod dataset;
mod forecast;
mod observation;
mod time_series;

pub use dataset::WeatherDataset;
pub use forecast::{ForecastPoint, ForecastTable};
pub use observation::{parse_observation_date, ObservationRecord, Variable};
pub use time_series::{week, RegularizedSeries, DAYS_PER_WEEK};
