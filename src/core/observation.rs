//! Daily weather observations and the variables forecast from them.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A forecast variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    /// Daily minimum temperature (°C).
    MinTemp,
    /// Daily maximum temperature (°C).
    MaxTemp,
    /// Daily rainfall (mm).
    Rainfall,
}

impl Variable {
    /// All forecast variables, in table column order.
    pub const ALL: [Variable; 3] = [Variable::MinTemp, Variable::MaxTemp, Variable::Rainfall];

    /// Snake-case name used in logs and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Variable::MinTemp => "min_temp",
            Variable::MaxTemp => "max_temp",
            Variable::Rainfall => "rainfall",
        }
    }

    /// Position of this variable in [`Variable::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Variable::MinTemp => 0,
            Variable::MaxTemp => 1,
            Variable::Rainfall => 2,
        }
    }

    /// Read this variable from an observation.
    pub fn value_of(&self, record: &ObservationRecord) -> Option<f64> {
        match self {
            Variable::MinTemp => record.min_temp,
            Variable::MaxTemp => record.max_temp,
            Variable::Rainfall => record.rainfall,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One day of weather at one location.
///
/// Every measurement is optional; the historical data has gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRecord {
    pub location: String,
    pub date: NaiveDate,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub rainfall: Option<f64>,
    pub temp_3pm: Option<f64>,
    pub humidity_9am: Option<f64>,
    pub humidity_3pm: Option<f64>,
}

impl ObservationRecord {
    /// Create a record carrying only the three forecast variables.
    pub fn new(
        location: impl Into<String>,
        date: NaiveDate,
        min_temp: Option<f64>,
        max_temp: Option<f64>,
        rainfall: Option<f64>,
    ) -> Self {
        Self {
            location: location.into(),
            date,
            min_temp,
            max_temp,
            rainfall,
            temp_3pm: None,
            humidity_9am: None,
            humidity_3pm: None,
        }
    }

    pub fn with_temp_3pm(mut self, value: Option<f64>) -> Self {
        self.temp_3pm = value;
        self
    }

    pub fn with_humidity(mut self, at_9am: Option<f64>, at_3pm: Option<f64>) -> Self {
        self.humidity_9am = at_9am;
        self.humidity_3pm = at_3pm;
        self
    }

    /// Case-insensitive substring match against the record's location.
    pub fn matches_location(&self, query: &str) -> bool {
        self.location
            .to_lowercase()
            .contains(&query.trim().to_lowercase())
    }
}

/// Parse a date field, discarding any time-of-day suffix.
///
/// Accepts `YYYY-MM-DD`, optionally followed by `T` or a space and a time.
pub fn parse_observation_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed
        .split(['T', ' '])
        .next()
        .unwrap_or(trimmed);

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| ForecastError::Parse(format!("invalid date {trimmed:?}: {e}")))
}
