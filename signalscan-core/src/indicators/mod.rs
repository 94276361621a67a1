//! Indicator engine.
//!
//! Indicators are pure functions: adjusted series in, numeric column out.
//! They are computed once per stock into an `IndicatorFrame` and then read
//! by the crossover detectors.
//!
//! Multi-line indicators (MACD, KDJ) are exposed as separate named instances
//! per line, keeping the single-column `Indicator` trait unchanged.

pub mod ema;
pub mod kdj;
pub mod macd;
pub mod sma;
pub mod spread;

pub use ema::{ema_of_series, Ema};
pub use kdj::{Kdj, KdjLine, KdjParams};
pub use macd::{macd_of_series, Macd, MacdLine, MacdParams};
pub use sma::{sma_of_series, Sma};
pub use spread::SmaSpread;

use crate::adjust::AdjustedSeries;

/// Trait for indicators.
///
/// Indicators take a full adjusted series and produce a column of the same
/// length. Rows without a defined value hold `f64::NAN`.
///
/// # Look-ahead contamination guard
/// No value at row t may depend on price data from row t+1 or later.
/// Every indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Column name (e.g. "sma_20", "macd_12_26_9").
    fn name(&self) -> &str;

    /// Number of leading rows without a defined value.
    fn lookback(&self) -> usize;

    /// Compute the column for the entire series.
    fn compute(&self, series: &AdjustedSeries) -> Vec<f64>;
}

/// Build an adjusted series from close prices for testing.
///
/// high = close + 1.0, low = close - 1.0, one calendar day per row.
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> AdjustedSeries {
    use crate::adjust::AdjustedPoint;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    AdjustedSeries::from_points(
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| AdjustedPoint {
                date: base_date + chrono::Duration::days(i as i64),
                close,
                high: close + 1.0,
                low: close - 1.0,
            })
            .collect(),
    )
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
