//! Trailing window statistics.

/// Trailing rolling mean.
///
/// Position `i` holds the mean of `series[i + 1 - window..=i]`. It is NaN
/// until the window has filled, and wherever the window contains a NaN.
///
/// # Arguments
/// * `series` - Input values, oldest first
/// * `window` - Window size
pub fn rolling_mean(series: &[f64], window: usize) -> Vec<f64> {
    let n = series.len();
    let mut result = vec![f64::NAN; n];
    if window == 0 || window > n {
        return result;
    }

    for end in window..=n {
        let slice = &series[end - window..end];
        if slice.iter().all(|v| v.is_finite()) {
            result[end - 1] = slice.iter().sum::<f64>() / window as f64;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rolling_mean_trailing_window() {
        let result = rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_relative_eq!(result[2], 2.0);
        assert_relative_eq!(result[3], 3.0);
        assert_relative_eq!(result[4], 4.0);
    }

    #[test]
    fn rolling_mean_propagates_missing_values() {
        let result = rolling_mean(&[1.0, f64::NAN, 3.0, 5.0, 7.0], 2);
        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
        assert_relative_eq!(result[3], 4.0);
        assert_relative_eq!(result[4], 6.0);
    }

    #[test]
    fn rolling_mean_degenerate_windows() {
        assert!(rolling_mean(&[1.0, 2.0], 0).iter().all(|v| v.is_nan()));
        assert!(rolling_mean(&[1.0, 2.0], 3).iter().all(|v| v.is_nan()));
        assert!(rolling_mean(&[], 3).is_empty());
    }
}
