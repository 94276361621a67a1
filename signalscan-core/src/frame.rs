//! IndicatorFrame: an adjusted series plus its named indicator columns.
//!
//! Built once per stock evaluation, then read by the crossover detectors by
//! row index. Undefined cells hold NaN internally; reading one through
//! `value` is an error, so NaN never reaches a stored result.

use std::collections::HashMap;
use std::ops::Range;

use crate::adjust::{AdjustedPoint, AdjustedSeries};
use crate::error::ScanError;
use crate::indicators::Indicator;

#[derive(Debug, Clone, Default)]
pub struct IndicatorFrame {
    series: AdjustedSeries,
    columns: HashMap<String, Vec<f64>>,
}

impl IndicatorFrame {
    /// Compute every indicator over `series`.
    ///
    /// Indicators sharing a name are computed once.
    pub fn compute(series: AdjustedSeries, indicators: &[Box<dyn Indicator>]) -> Self {
        let mut columns = HashMap::with_capacity(indicators.len());
        for ind in indicators {
            if !columns.contains_key(ind.name()) {
                columns.insert(ind.name().to_string(), ind.compute(&series));
            }
        }
        Self { series, columns }
    }

    /// Insert a precomputed column.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.columns.insert(name.into(), values);
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn series(&self) -> &AdjustedSeries {
        &self.series
    }

    pub fn point(&self, row: usize) -> Option<&AdjustedPoint> {
        self.series.points().get(row)
    }

    /// Full column by name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    /// Raw cell, NaN included.
    pub fn get(&self, name: &str, row: usize) -> Option<f64> {
        self.columns.get(name).and_then(|v| v.get(row).copied())
    }

    /// Defined cell value; missing column, out-of-range row or NaN is an error.
    pub fn value(&self, name: &str, row: usize) -> Result<f64, ScanError> {
        let column = self
            .columns
            .get(name)
            .ok_or_else(|| ScanError::InvalidInput(format!("indicator {name} not computed")))?;
        match column.get(row) {
            Some(v) if v.is_finite() => Ok(*v),
            Some(_) => Err(ScanError::InvalidInput(format!(
                "indicator {name} undefined at row {row}"
            ))),
            None => Err(ScanError::InvalidInput(format!(
                "row {row} out of range for {name} ({} rows)",
                column.len()
            ))),
        }
    }

    /// Maximum of the defined values of a column over `rows`.
    ///
    /// `None` when the column is missing or no row in range is defined.
    pub fn trailing_max(&self, name: &str, rows: Range<usize>) -> Option<f64> {
        let column = self.columns.get(name)?;
        let end = rows.end.min(column.len());
        let start = rows.start.min(end);
        column[start..end]
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }

    /// Index of the last row, the row being evaluated.
    pub fn last_row(&self) -> Option<usize> {
        self.len().checked_sub(1)
    }
}
