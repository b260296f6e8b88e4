//! Pairwise correlation between weather columns and the daily rainfall
//! histogram.

use serde::Serialize;

use crate::core::ObservationRecord;

/// Columns compared by [`correlation_matrix`], in matrix order.
pub const CORRELATION_COLUMNS: [&str; 6] = [
    "MaxTemp",
    "MinTemp",
    "Temp3pm",
    "Rainfall",
    "Humidity3pm",
    "Humidity9am",
];

/// Default number of bins for [`rainfall_histogram`].
pub const RAINFALL_BINS: usize = 50;

fn column_value(record: &ObservationRecord, column: usize) -> Option<f64> {
    let value = match column {
        0 => record.max_temp,
        1 => record.min_temp,
        2 => record.temp_3pm,
        3 => record.rainfall,
        4 => record.humidity_3pm,
        _ => record.humidity_9am,
    };
    value.filter(|v| v.is_finite())
}

/// Pearson correlation between every pair of [`CORRELATION_COLUMNS`].
///
/// `values[i][j]` is `None` (JSON `null`) when fewer than two records carry
/// both columns or either column is constant over them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<&'static str>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Correlation between two named columns.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| *c == a)?;
        let j = self.columns.iter().position(|c| *c == b)?;
        self.values[i][j]
    }
}

/// Correlate the weather columns of `records`.
///
/// Missing values are dropped pair by pair, so each entry uses every record
/// that has both of its columns.
pub fn correlation_matrix(records: &[ObservationRecord]) -> CorrelationMatrix {
    let n = CORRELATION_COLUMNS.len();
    let mut values = vec![vec![None; n]; n];

    for i in 0..n {
        for j in i..n {
            let pairs: Vec<(f64, f64)> = records
                .iter()
                .filter_map(|r| Some((column_value(r, i)?, column_value(r, j)?)))
                .collect();
            let r = pearson(&pairs).map(|r| if i == j { 1.0 } else { r });
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: CORRELATION_COLUMNS.to_vec(),
        values,
    }
}

fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    Some((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

/// One equal-width bin of daily rainfall.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Histogram of daily rainfall over `bins` equal-width bins spanning the
/// observed range.
///
/// Bins are half-open except the last, which includes the maximum. Missing
/// readings are skipped. When every reading is equal a single bin holds them
/// all; with no readings the histogram is empty.
pub fn rainfall_histogram(records: &[ObservationRecord], bins: usize) -> Vec<HistogramBin> {
    let rainfall: Vec<f64> = records
        .iter()
        .filter_map(|r| r.rainfall.filter(|v| v.is_finite()))
        .collect();
    let (Some(min), Some(max)) = (
        rainfall.iter().copied().reduce(f64::min),
        rainfall.iter().copied().reduce(f64::max),
    ) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }
    if max <= min {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: rainfall.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for value in rainfall {
        let idx = (((value - min) / width) as usize).min(bins - 1);
        histogram[idx].count += 1;
    }
    histogram
}
