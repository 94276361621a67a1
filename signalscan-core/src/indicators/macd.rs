//! MACD: DIF, DEA and histogram.
//!
//! dif = ema(close, short) - ema(close, long)
//! dea = ema(dif, signal)
//! macd = dif - dea
//!
//! Every EMA seeds on its first value, so all three lines are defined from
//! the first row.

use serde::{Deserialize, Serialize};

use super::ema::ema_of_series;
use super::Indicator;
use crate::adjust::AdjustedSeries;

/// EMA spans for one MACD configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacdParams {
    pub short_span: usize,
    pub long_span: usize,
    pub signal_span: usize,
}

impl MacdParams {
    pub const fn new(short_span: usize, long_span: usize, signal_span: usize) -> Self {
        Self {
            short_span,
            long_span,
            signal_span,
        }
    }

    /// The conventional 12/26/9 configuration.
    pub const fn standard() -> Self {
        Self::new(12, 26, 9)
    }

    fn suffix(&self) -> String {
        format!("{}_{}_{}", self.short_span, self.long_span, self.signal_span)
    }
}

impl Default for MacdParams {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Dif,
    Dea,
    Hist,
}

impl MacdLine {
    fn prefix(&self) -> &'static str {
        match self {
            MacdLine::Dif => "dif",
            MacdLine::Dea => "dea",
            MacdLine::Hist => "macd",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Macd {
    params: MacdParams,
    line: MacdLine,
    name: String,
}

impl Macd {
    pub fn new(params: MacdParams, line: MacdLine) -> Self {
        assert!(
            params.short_span >= 1 && params.long_span >= 1 && params.signal_span >= 1,
            "MACD spans must be >= 1"
        );
        Self {
            params,
            line,
            name: format!("{}_{}", line.prefix(), params.suffix()),
        }
    }

    pub fn dif(params: MacdParams) -> Self {
        Self::new(params, MacdLine::Dif)
    }

    pub fn dea(params: MacdParams) -> Self {
        Self::new(params, MacdLine::Dea)
    }

    pub fn hist(params: MacdParams) -> Self {
        Self::new(params, MacdLine::Hist)
    }

    /// All three lines of one configuration.
    pub fn lines(params: MacdParams) -> [Self; 3] {
        [Self::dif(params), Self::dea(params), Self::hist(params)]
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, series: &AdjustedSeries) -> Vec<f64> {
        let (dif, dea, hist) = macd_of_series(&series.closes(), self.params);
        match self.line {
            MacdLine::Dif => dif,
            MacdLine::Dea => dea,
            MacdLine::Hist => hist,
        }
    }
}

/// Compute (dif, dea, macd) for a close column.
pub fn macd_of_series(closes: &[f64], params: MacdParams) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let short = ema_of_series(closes, params.short_span);
    let long = ema_of_series(closes, params.long_span);
    let dif: Vec<f64> = short.iter().zip(&long).map(|(s, l)| s - l).collect();
    let dea = ema_of_series(&dif, params.signal_span);
    let hist = dif.iter().zip(&dea).map(|(f, e)| f - e).collect();
    (dif, dea, hist)
}
