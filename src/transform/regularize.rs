//! Weekly resampling and gap filling of daily observations.
//!
//! Daily records are grouped into Monday–Sunday calendar weeks labeled by
//! the closing Sunday. Each variable is averaged independently over the days
//! it was observed; a week without any value for a variable is a hole.
//! Interior holes are filled by linear interpolation. Leading and trailing
//! holes are never extrapolated: the series is trimmed to the span where all
//! three variables are known.

use crate::core::{week, ObservationRecord, RegularizedSeries, Variable, DAYS_PER_WEEK};
use crate::error::{ForecastError, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Limits applied while building a weekly series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegularizerConfig {
    /// Minimum number of weeks in the resulting series (at least 2).
    pub min_weeks: usize,
    /// Largest tolerated share of weeks that needed filling, per variable.
    pub max_hole_fraction: f64,
}

impl Default for RegularizerConfig {
    fn default() -> Self {
        Self {
            min_weeks: 2,
            max_hole_fraction: 0.5,
        }
    }
}

impl RegularizerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_weeks < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "regularizer.min_weeks must be at least 2, got {}",
                self.min_weeks
            )));
        }
        if !(0.0..=1.0).contains(&self.max_hole_fraction) {
            return Err(ForecastError::InvalidParameter(format!(
                "regularizer.max_hole_fraction must be within [0, 1], got {}",
                self.max_hole_fraction
            )));
        }
        Ok(())
    }
}

/// Converts irregular daily records into a [`RegularizedSeries`].
#[derive(Debug, Clone, Default)]
pub struct SeriesRegularizer {
    config: RegularizerConfig,
}

impl SeriesRegularizer {
    pub fn new(config: RegularizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RegularizerConfig {
        &self.config
    }

    /// Resample `records` to a weekly, gap-free series.
    ///
    /// Records may arrive in any order. Fails with
    /// [`ForecastError::InsufficientData`] when fewer than `min_weeks` weeks
    /// hold data or survive edge trimming, and with
    /// [`ForecastError::TooManyGaps`] when a variable needed filling in more
    /// than `max_hole_fraction` of the weeks.
    pub fn regularize(&self, records: &[ObservationRecord]) -> Result<RegularizedSeries> {
        let needed = self.config.min_weeks;

        let mut sorted: Vec<&ObservationRecord> = records.iter().collect();
        sorted.sort_by_key(|r| r.date);

        let (first, last) = match (sorted.first(), sorted.last()) {
            (Some(first), Some(last)) => (week_ending(first.date), week_ending(last.date)),
            _ => return Err(ForecastError::InsufficientData { needed, got: 0 }),
        };
        let weeks = ((last - first).num_days() / DAYS_PER_WEEK) as usize + 1;

        // Per-week running sums and counts for each variable.
        let mut sums = [vec![0.0; weeks], vec![0.0; weeks], vec![0.0; weeks]];
        let mut counts = [vec![0usize; weeks], vec![0usize; weeks], vec![0usize; weeks]];
        let mut observed = vec![false; weeks];

        for record in &sorted {
            let idx = week_index(first, record.date);
            observed[idx] = true;
            for variable in Variable::ALL {
                if let Some(value) = variable.value_of(record).filter(|v| v.is_finite()) {
                    sums[variable.index()][idx] += value;
                    counts[variable.index()][idx] += 1;
                }
            }
        }

        let observed_weeks = observed.iter().filter(|&&o| o).count();
        if observed_weeks < needed {
            return Err(ForecastError::InsufficientData {
                needed,
                got: observed_weeks,
            });
        }

        let mut columns: [Vec<f64>; 3] = Default::default();
        let mut holes = [Vec::new(), Vec::new(), Vec::new()];
        for variable in Variable::ALL {
            let i = variable.index();
            let weekly: Vec<f64> = sums[i]
                .iter()
                .zip(&counts[i])
                .map(|(&sum, &count)| {
                    if count == 0 {
                        f64::NAN
                    } else {
                        sum / count as f64
                    }
                })
                .collect();

            let hole_count = weekly.iter().filter(|v| v.is_nan()).count();
            if hole_count as f64 > self.config.max_hole_fraction * weeks as f64 {
                tracing::warn!(%variable, holes = hole_count, weeks, "too many empty weeks");
                return Err(ForecastError::TooManyGaps {
                    variable,
                    holes: hole_count,
                    weeks,
                });
            }

            holes[i] = weekly.iter().map(|v| v.is_nan()).collect::<Vec<bool>>();
            columns[i] = interpolate_gaps(&weekly);
        }

        // Trim to the span where every variable is resolved.
        let resolved = |idx: usize| columns.iter().all(|c| c[idx].is_finite());
        let start = (0..weeks).find(|&idx| resolved(idx));
        let end = (0..weeks).rev().find(|&idx| resolved(idx)).map(|idx| idx + 1);
        let (start, end) = match (start, end) {
            (Some(start), Some(end)) if end - start >= needed => (start, end),
            (Some(start), Some(end)) => {
                return Err(ForecastError::InsufficientData {
                    needed,
                    got: end - start,
                })
            }
            _ => return Err(ForecastError::InsufficientData { needed, got: 0 }),
        };

        let filled = [0, 1, 2].map(|i| holes[i][start..end].iter().filter(|&&h| h).count());
        let timestamps: Vec<NaiveDate> = (start..end)
            .map(|idx| first + Duration::weeks(idx as i64))
            .collect();
        let [min_temp, max_temp, rainfall] = columns.map(|c| c[start..end].to_vec());

        tracing::debug!(
            weeks = timestamps.len(),
            trimmed = weeks - (end - start),
            filled_min_temp = filled[0],
            filled_max_temp = filled[1],
            filled_rainfall = filled[2],
            "regularized weekly series"
        );

        Ok(RegularizedSeries::new(timestamps, min_temp, max_temp, rainfall)?
            .with_filled_counts(filled))
    }
}

/// The Sunday closing the Monday–Sunday week that contains `date`.
pub fn week_ending(date: NaiveDate) -> NaiveDate {
    let days_to_sunday = 6 - i64::from(date.weekday().num_days_from_monday());
    date + Duration::days(days_to_sunday)
}

/// Index of the week containing `date`, counted from the week ending `first`.
fn week_index(first: NaiveDate, date: NaiveDate) -> usize {
    ((week_ending(date) - first).num_days() / week().num_days()) as usize
}

/// Linear interpolation across interior NaN runs.
///
/// NaN values before the first or after the last finite value are left as
/// they are.
pub fn interpolate_gaps(values: &[f64]) -> Vec<f64> {
    let mut result = values.to_vec();
    let mut previous: Option<usize> = None;

    for idx in 0..result.len() {
        if result[idx].is_nan() {
            continue;
        }
        if let Some(prev) = previous {
            let span = (idx - prev) as f64;
            let (left, right) = (result[prev], result[idx]);
            for gap in prev + 1..idx {
                let t = (gap - prev) as f64 / span;
                result[gap] = left + t * (right - left);
            }
        }
        previous = Some(idx);
    }

    result
}
