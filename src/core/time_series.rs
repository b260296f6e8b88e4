//! Weekly, gap-free series of the three forecast variables.

use crate::core::observation::Variable;
use crate::error::{ForecastError, Result};
use chrono::{Duration, NaiveDate};

/// Days between consecutive points of a [`RegularizedSeries`].
pub const DAYS_PER_WEEK: i64 = 7;

/// One week's step.
pub fn week() -> Duration {
    Duration::days(DAYS_PER_WEEK)
}

/// A uniformly spaced weekly series with no missing values.
///
/// Invariants checked on construction:
/// - timestamps are strictly increasing and exactly one week apart
/// - every variable has one finite value per timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct RegularizedSeries {
    timestamps: Vec<NaiveDate>,
    /// values\[variable.index()\]\[week\]
    values: [Vec<f64>; 3],
    /// Number of interpolated weeks per variable.
    filled: [usize; 3],
}

impl RegularizedSeries {
    /// Build a series from aligned weekly columns.
    pub fn new(
        timestamps: Vec<NaiveDate>,
        min_temp: Vec<f64>,
        max_temp: Vec<f64>,
        rainfall: Vec<f64>,
    ) -> Result<Self> {
        for pair in timestamps.windows(2) {
            if pair[1] - pair[0] != week() {
                return Err(ForecastError::InvalidParameter(format!(
                    "timestamps must be spaced one week apart, found {} -> {}",
                    pair[0], pair[1]
                )));
            }
        }

        let values = [min_temp, max_temp, rainfall];
        for variable in Variable::ALL {
            let column = &values[variable.index()];
            if column.len() != timestamps.len() {
                return Err(ForecastError::InvalidParameter(format!(
                    "{variable} has {} values for {} timestamps",
                    column.len(),
                    timestamps.len()
                )));
            }
            if let Some(pos) = column.iter().position(|v| !v.is_finite()) {
                return Err(ForecastError::InvalidParameter(format!(
                    "{variable} is missing a value at {}",
                    timestamps[pos]
                )));
            }
        }

        Ok(Self {
            timestamps,
            values,
            filled: [0; 3],
        })
    }

    /// Record how many weeks of each variable were interpolated.
    pub fn with_filled_counts(mut self, filled: [usize; 3]) -> Self {
        self.filled = filled;
        self
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDate] {
        &self.timestamps
    }

    /// Values of one variable, oldest first.
    pub fn values(&self, variable: Variable) -> &[f64] {
        &self.values[variable.index()]
    }

    /// Number of weeks of `variable` that were filled by interpolation.
    pub fn filled(&self, variable: Variable) -> usize {
        self.filled[variable.index()]
    }

    pub fn first_timestamp(&self) -> Option<NaiveDate> {
        self.timestamps.first().copied()
    }

    pub fn last_timestamp(&self) -> Option<NaiveDate> {
        self.timestamps.last().copied()
    }

    /// The `horizon` weekly dates following the last observation.
    pub fn future_timestamps(&self, horizon: usize) -> Result<Vec<NaiveDate>> {
        let last = self
            .last_timestamp()
            .ok_or(ForecastError::InsufficientData { needed: 1, got: 0 })?;

        let mut dates = Vec::with_capacity(horizon);
        let mut current = last;
        for _ in 0..horizon {
            current = current.checked_add_signed(week()).ok_or_else(|| {
                ForecastError::InvalidParameter(format!("date overflow after {current}"))
            })?;
            dates.push(current);
        }
        Ok(dates)
    }
}
