//! KDJ stochastic oscillator.
//!
//! rsv = (close - lowest_low(fastk)) / (highest_high(fastk) - lowest_low(fastk)) * 100
//! %K = sma(rsv, slowk), %D = sma(%K, slowd), J = 3K - 2D, k_d_dif = %K - %D
//!
//! A flat high/low range has no defined rsv. The row is left NaN and the
//! frame reports it as invalid input if a detector reads it.

use serde::{Deserialize, Serialize};

use super::sma::sma_of_series;
use super::Indicator;
use crate::adjust::AdjustedSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KdjParams {
    pub fastk: usize,
    pub slowk: usize,
    pub slowd: usize,
}

impl KdjParams {
    pub const fn new(fastk: usize, slowk: usize, slowd: usize) -> Self {
        Self {
            fastk,
            slowk,
            slowd,
        }
    }

    /// Rows needed before %D is defined.
    pub fn warmup(&self) -> usize {
        self.fastk + self.slowk + self.slowd
    }
}

impl Default for KdjParams {
    fn default() -> Self {
        Self::new(9, 3, 3)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdjLine {
    K,
    D,
    J,
    /// %K - %D
    KDDif,
}

impl KdjLine {
    fn prefix(&self) -> &'static str {
        match self {
            KdjLine::K => "k",
            KdjLine::D => "d",
            KdjLine::J => "j",
            KdjLine::KDDif => "k_d_dif",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Kdj {
    params: KdjParams,
    line: KdjLine,
    name: String,
}

impl Kdj {
    pub fn new(params: KdjParams, line: KdjLine) -> Self {
        assert!(
            params.fastk >= 1 && params.slowk >= 1 && params.slowd >= 1,
            "KDJ periods must be >= 1"
        );
        Self {
            params,
            line,
            name: format!(
                "{}_{}_{}_{}",
                line.prefix(),
                params.fastk,
                params.slowk,
                params.slowd
            ),
        }
    }
}

impl Indicator for Kdj {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        let k = self.params.fastk + self.params.slowk - 2;
        match self.line {
            KdjLine::K => k,
            KdjLine::D | KdjLine::J | KdjLine::KDDif => k + self.params.slowd - 1,
        }
    }

    fn compute(&self, series: &AdjustedSeries) -> Vec<f64> {
        let rsv = rsv(series, self.params.fastk);
        let k = sma_of_series(&rsv, self.params.slowk);
        if self.line == KdjLine::K {
            return k;
        }
        let d = sma_of_series(&k, self.params.slowd);
        match self.line {
            KdjLine::D => d,
            KdjLine::J => k.iter().zip(&d).map(|(k, d)| 3.0 * k - 2.0 * d).collect(),
            KdjLine::KDDif => k.iter().zip(&d).map(|(k, d)| k - d).collect(),
            KdjLine::K => k,
        }
    }
}

/// Raw stochastic value over a trailing `fastk` window.
fn rsv(series: &AdjustedSeries, fastk: usize) -> Vec<f64> {
    let points = series.points();
    let n = points.len();
    let mut result = vec![f64::NAN; n];

    if fastk == 0 || n < fastk {
        return result;
    }

    for i in (fastk - 1)..n {
        let window = &points[(i + 1 - fastk)..=i];
        let highest = window.iter().map(|p| p.high).fold(f64::NEG_INFINITY, f64::max);
        let lowest = window.iter().map(|p| p.low).fold(f64::INFINITY, f64::min);
        let range = highest - lowest;
        if range > 0.0 && range.is_finite() {
            result[i] = (points[i].close - lowest) / range * 100.0;
        }
    }

    result
}
