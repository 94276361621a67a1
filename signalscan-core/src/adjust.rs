//! Share-count adjustment: rebases a bar window onto one share-count basis.
//!
//! Input windows are ordered most-recent-first (the order storage returns
//! them in). The reference share count is taken from the second bar, falling
//! back to the third: the most recent bar may carry a share count that has
//! not been published yet.
//!
//! Adjustment is pure. Input bars are borrowed and never modified.

use std::borrow::Borrow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::DailyBar;
use crate::error::ScanError;

/// Minimum window length: the reference lookup reads `window[1]` and `window[2]`.
pub const MIN_WINDOW: usize = 3;

/// One row of an adjusted series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustedPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub high: f64,
    pub low: f64,
}

/// Adjusted prices in ascending date order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdjustedSeries {
    points: Vec<AdjustedPoint>,
    reference_shares: f64,
}

impl AdjustedSeries {
    /// Build a series from points that are already comparable (no adjustment).
    ///
    /// Points are sorted by date.
    pub fn from_points(mut points: Vec<AdjustedPoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self {
            points,
            reference_shares: 0.0,
        }
    }

    pub fn points(&self) -> &[AdjustedPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&AdjustedPoint> {
        self.points.last()
    }

    /// Share count every price was rebased to (0 for unadjusted series).
    pub fn reference_shares(&self) -> f64 {
        self.reference_shares
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.low).collect()
    }
}

/// Pick the reference share count: `window[1]`, else `window[2]`.
pub fn reference_shares<B: Borrow<DailyBar>>(window: &[B]) -> Result<f64, ScanError> {
    if window.len() < MIN_WINDOW {
        return Err(ScanError::InsufficientHistory {
            required: MIN_WINDOW,
            available: window.len(),
        });
    }

    let second = window[1].borrow();
    let third = window[2].borrow();
    let reference = if second.has_share_count() {
        second.total_shares
    } else {
        third.total_shares
    };

    if !(reference > 0.0) || !reference.is_finite() {
        return Err(ScanError::InvalidInput(format!(
            "no reference share count for {} as of {}",
            second.stock_id, second.date
        )));
    }
    Ok(reference)
}

/// Adjust a most-recent-first window onto its reference share count.
pub fn adjust<B: Borrow<DailyBar>>(window: &[B]) -> Result<AdjustedSeries, ScanError> {
    let reference = reference_shares(window)?;
    adjust_with_reference(window, reference)
}

/// Adjust a window onto an explicit reference share count.
///
/// Bars without a share count pass through unchanged; every other bar is
/// scaled by `total_shares / reference`.
pub fn adjust_with_reference<B: Borrow<DailyBar>>(
    window: &[B],
    reference: f64,
) -> Result<AdjustedSeries, ScanError> {
    if !(reference > 0.0) || !reference.is_finite() {
        return Err(ScanError::InvalidInput(format!(
            "reference share count must be positive, got {reference}"
        )));
    }

    let mut points: Vec<AdjustedPoint> = window
        .iter()
        .map(|bar| {
            let bar = bar.borrow();
            let scale = if !bar.has_share_count() || bar.total_shares == reference {
                1.0
            } else {
                bar.total_shares / reference
            };
            AdjustedPoint {
                date: bar.date,
                close: bar.close * scale,
                high: bar.high * scale,
                low: bar.low * scale,
            }
        })
        .collect();
    points.sort_by_key(|p| p.date);

    Ok(AdjustedSeries {
        points,
        reference_shares: reference,
    })
}
