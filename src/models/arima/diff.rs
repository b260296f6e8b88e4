//! Differencing and integration at arbitrary lags.
//!
//! Regular differencing is lag 1; seasonal differencing is lag `s`.

use crate::error::{ForecastError, Result};

/// Apply `order` rounds of lag-`lag` differencing.
///
/// Each round shortens the series by `lag`. Returns an empty vector when the
/// series runs out.
pub fn lag_difference(series: &[f64], lag: usize, order: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    if lag == 0 {
        return result;
    }
    for _ in 0..order {
        if result.len() <= lag {
            return Vec::new();
        }
        result = result[lag..]
            .iter()
            .zip(&result)
            .map(|(curr, prev)| curr - prev)
            .collect();
    }
    result
}

/// Apply regular (lag 1) differencing `d` times.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    lag_difference(series, 1, d)
}

/// Apply seasonal differencing `d` times at `period`.
pub fn seasonal_difference(series: &[f64], d: usize, period: usize) -> Vec<f64> {
    lag_difference(series, period, d)
}

/// Undo `order` rounds of lag-`lag` differencing for values that follow
/// `history` on the original scale.
///
/// Later values may depend on earlier integrated ones, so horizons longer
/// than `lag` are supported.
pub fn lag_integrate(
    differenced: &[f64],
    history: &[f64],
    lag: usize,
    order: usize,
) -> Result<Vec<f64>> {
    if order == 0 || lag == 0 || differenced.is_empty() {
        return Ok(differenced.to_vec());
    }

    let mut result = differenced.to_vec();
    for level in (0..order).rev() {
        // History at the differencing level being restored.
        let mut extended = lag_difference(history, lag, level);
        if extended.len() < lag {
            return Err(ForecastError::SeriesTooShort {
                needed: lag * (level + 1),
                got: history.len(),
            });
        }

        let known = extended.len();
        extended.reserve(result.len());
        for &delta in &result {
            let base = extended[extended.len() - lag];
            extended.push(base + delta);
        }
        result = extended.split_off(known);
    }
    Ok(result)
}

/// Undo `d` rounds of regular differencing.
pub fn integrate(differenced: &[f64], history: &[f64], d: usize) -> Result<Vec<f64>> {
    lag_integrate(differenced, history, 1, d)
}

/// Undo `d` rounds of seasonal differencing at `period`.
pub fn seasonal_integrate(
    differenced: &[f64],
    history: &[f64],
    d: usize,
    period: usize,
) -> Result<Vec<f64>> {
    lag_integrate(differenced, history, period, d)
}
