//! Moving-average spread: sma(short) - sma(long).
//!
//! This is the `diff_ma` series the MA-family crossovers watch. With a short
//! window of 1 it becomes close minus the long SMA, which is how the
//! half-year-line distance (`price_half_diff`) is built.

use super::sma::sma_of_series;
use super::Indicator;
use crate::adjust::AdjustedSeries;

#[derive(Debug, Clone)]
pub struct SmaSpread {
    short_window: usize,
    long_window: usize,
    name: String,
}

impl SmaSpread {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        assert!(
            short_window >= 1 && long_window >= 1,
            "spread windows must be >= 1"
        );
        Self {
            short_window,
            long_window,
            name: format!("diff_ma_{short_window}_{long_window}"),
        }
    }
}

impl Indicator for SmaSpread {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.short_window.max(self.long_window) - 1
    }

    fn compute(&self, series: &AdjustedSeries) -> Vec<f64> {
        let closes = series.closes();
        let short = sma_of_series(&closes, self.short_window);
        let long = sma_of_series(&closes, self.long_window);
        short.iter().zip(&long).map(|(s, l)| s - l).collect()
    }
}
