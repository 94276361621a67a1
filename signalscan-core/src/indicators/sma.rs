//! Simple Moving Average (SMA).
//!
//! Rolling mean of adjusted closes over a trailing window.
//! Lookback: window - 1 (first defined value at index window-1).
//! The year line is `Sma::new(250)`, the half-year line `Sma::new(120)`.

use super::Indicator;
use crate::adjust::AdjustedSeries;

#[derive(Debug, Clone)]
pub struct Sma {
    window: usize,
    name: String,
}

impl Sma {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "SMA window must be >= 1");
        Self {
            window,
            name: format!("sma_{window}"),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window.saturating_sub(1)
    }

    fn compute(&self, series: &AdjustedSeries) -> Vec<f64> {
        sma_of_series(&series.closes(), self.window)
    }
}

/// Rolling mean of an arbitrary column.
///
/// A window containing NaN yields NaN, so SMA of a column with a warm-up gap
/// has a warm-up gap of its own plus `window - 1` rows.
pub fn sma_of_series(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if window == 0 || n < window {
        return result;
    }

    let mut sum = 0.0;
    let mut nan_count = 0usize;
    for &v in values.iter().take(window) {
        if v.is_nan() {
            nan_count += 1;
        } else {
            sum += v;
        }
    }
    if nan_count == 0 {
        result[window - 1] = sum / window as f64;
    }

    for i in window..n {
        let leaving = values[i - window];
        let entering = values[i];
        if leaving.is_nan() {
            nan_count -= 1;
        } else {
            sum -= leaving;
        }
        if entering.is_nan() {
            nan_count += 1;
        } else {
            sum += entering;
        }

        if nan_count == 0 {
            // Recompute on exit from a NaN stretch so float drift does not accumulate.
            if leaving.is_nan() {
                sum = values[(i + 1 - window)..=i].iter().sum();
            }
            result[i] = sum / window as f64;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_series, DEFAULT_EPSILON};

    #[test]
    fn sma_5_basic() {
        let series = make_series(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0]);
        let result = Sma::new(5).compute(&series);

        assert_eq!(result.len(), 7);
        for (i, v) in result.iter().enumerate().take(4) {
            assert!(v.is_nan(), "expected NaN at index {i}");
        }
        assert_approx(result[4], 12.0, DEFAULT_EPSILON);
        assert_approx(result[5], 13.0, DEFAULT_EPSILON);
        assert_approx(result[6], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_1_is_close() {
        let series = make_series(&[100.0, 200.0, 300.0]);
        let result = Sma::new(1).compute(&series);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_of_series_nan_propagation() {
        let values = [10.0, 11.0, f64::NAN, 13.0, 14.0, 15.0];
        let result = sma_of_series(&values, 3);
        // Every window touching index 2 is undefined.
        assert!(result[2].is_nan());
        assert!(result[3].is_nan());
        assert!(result[4].is_nan());
        // Window [13,14,15]
        assert_approx(result[5], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_of_series_after_warmup_gap() {
        // Leading NaN as produced by another indicator's warm-up.
        let values = [f64::NAN, f64::NAN, 3.0, 6.0, 9.0];
        let result = sma_of_series(&values, 2);
        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
        assert_approx(result[3], 4.5, DEFAULT_EPSILON);
        assert_approx(result[4], 7.5, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_lookback() {
        assert_eq!(Sma::new(20).lookback(), 19);
        assert_eq!(Sma::new(1).lookback(), 0);
    }

    #[test]
    fn sma_too_few_rows() {
        let series = make_series(&[10.0, 11.0]);
        let result = Sma::new(5).compute(&series);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn exactly_window_rows_defines_last_value() {
        let series = make_series(&[2.0, 4.0, 6.0]);
        let result = Sma::new(3).compute(&series);
        assert_approx(result[2], 4.0, DEFAULT_EPSILON);
    }
}
