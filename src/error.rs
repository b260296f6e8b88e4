//! Error types for the weather forecasting pipeline.

use crate::core::Variable;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Coarse classification of a [`ForecastError`], as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// No historical records matched the queried location.
    LocationNotFound,
    /// The records could not be turned into a usable weekly series.
    InsufficientData,
    /// A per-variable seasonal model could not be fitted.
    ModelFit,
    /// Malformed input: CSV, dates, configuration or I/O.
    Input,
}

/// Errors that can occur while loading observations or producing a forecast.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// No historical records match the queried location.
    #[error("location not found: {0}")]
    LocationNotFound(String),

    /// Too few distinct weeks to form a series.
    #[error("insufficient data: need at least {needed} weeks, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Too many weeks had to be filled by interpolation.
    #[error("insufficient data: {holes} of {weeks} weekly {variable} values are missing")]
    TooManyGaps {
        variable: Variable,
        holes: usize,
        weeks: usize,
    },

    /// The series is shorter than the model can be estimated on.
    #[error("series too short: need at least {needed} observations, got {got}")]
    SeriesTooShort { needed: usize, got: usize },

    /// The parameter search did not converge.
    #[error("optimizer did not converge after {iterations} iterations")]
    NotConverged { iterations: usize },

    /// Estimation produced a non-finite objective or coefficient.
    #[error("numerical failure: {0}")]
    Numerical(String),

    /// A per-variable model fit failed.
    #[error("{variable} model fit failed: {source}")]
    ModelFit {
        variable: Variable,
        #[source]
        source: Box<ForecastError>,
    },

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Invalid parameter or configuration value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A CSV row or date could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Reading an input file failed.
    #[error("io error: {0}")]
    Io(String),
}

impl ForecastError {
    /// Wrap a model error with the variable whose fit failed.
    pub fn model_fit(variable: Variable, source: ForecastError) -> Self {
        match source {
            already @ ForecastError::ModelFit { .. } => already,
            other => ForecastError::ModelFit {
                variable,
                source: Box::new(other),
            },
        }
    }

    /// Category used at the request boundary.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ForecastError::LocationNotFound(_) => ErrorCategory::LocationNotFound,
            ForecastError::InsufficientData { .. } | ForecastError::TooManyGaps { .. } => {
                ErrorCategory::InsufficientData
            }
            ForecastError::SeriesTooShort { .. }
            | ForecastError::NotConverged { .. }
            | ForecastError::Numerical(_)
            | ForecastError::ModelFit { .. }
            | ForecastError::FitRequired => ErrorCategory::ModelFit,
            ForecastError::InvalidParameter(_)
            | ForecastError::Parse(_)
            | ForecastError::Io(_) => ErrorCategory::Input,
        }
    }

    /// Whether this error is a model fit failure.
    pub fn is_model_fit(&self) -> bool {
        self.category() == ErrorCategory::ModelFit
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(io) => ForecastError::Io(io.to_string()),
            _ => ForecastError::Parse(err.to_string()),
        }
    }
}

impl From<std::io::Error> for ForecastError {
    fn from(err: std::io::Error) -> Self {
        ForecastError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for ForecastError {
    fn from(err: toml::de::Error) -> Self {
        ForecastError::InvalidParameter(format!("config: {}", err.message()))
    }
}
