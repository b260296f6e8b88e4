//! Descriptive statistics over a location's raw observations.

mod climate;
mod distribution;

pub use climate::{rainfall_moving_average, ClimateSummary, RAINFALL_WINDOW};
pub use distribution::{
    correlation_matrix, rainfall_histogram, CorrelationMatrix, HistogramBin,
    CORRELATION_COLUMNS, RAINFALL_BINS,
};
