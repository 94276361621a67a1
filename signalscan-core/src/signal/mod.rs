//! Crossover detection: one detector per strategy family.
//!
//! Detectors are storage-agnostic. They receive only the indicator frame
//! of one stock and compare its last two rows: `previous = n-2`,
//! `current = n-1`. No state is kept between calls.

pub mod detector;
pub mod filter;
pub mod halfboot;
pub mod ma;
pub mod ma_macd;
pub mod macd;
pub mod macd_kdj;

pub use detector::SignalDetector;
pub use halfboot::HalfBootCross;
pub use ma::MaCross;
pub use ma_macd::MaMacdCross;
pub use macd::MacdCross;
pub use macd_kdj::MacdKdjCross;

use std::fmt;

use crate::domain::Direction;
use crate::error::ScanError;
use crate::frame::IndicatorFrame;
use crate::indicators::Indicator;

/// Trait for crossover detectors.
///
/// # Architecture invariant
/// `detect` sees only the indicator frame. Whether a result is persisted,
/// deduplicated or previewed is the orchestrator's business.
pub trait CrossoverSignal: Send + Sync + fmt::Debug {
    /// Family name (e.g. "macd_kdj").
    fn name(&self) -> &str;

    /// Indicators this detector reads from the frame.
    fn indicators(&self) -> Vec<Box<dyn Indicator>>;

    /// Compare the last two rows.
    ///
    /// Returns the signal direction when the crossing happened on the last
    /// row and every confirmatory filter passed.
    fn detect(&self, frame: &IndicatorFrame) -> Result<Option<Direction>, ScanError>;
}

/// `(previous, current)` row indices of a frame.
pub fn last_two_rows(frame: &IndicatorFrame) -> Result<(usize, usize), ScanError> {
    match frame.len() {
        n if n >= 2 => Ok((n - 2, n - 1)),
        n => Err(ScanError::InsufficientHistory {
            required: 2,
            available: n,
        }),
    }
}

/// Negative-or-zero to positive. A value sitting at zero counts as not yet crossed.
pub fn crossed_above(previous: f64, current: f64) -> bool {
    previous <= 0.0 && current > 0.0
}

/// Positive-or-zero to negative.
pub fn crossed_below(previous: f64, current: f64) -> bool {
    previous >= 0.0 && current < 0.0
}

#[cfg(test)]
pub(crate) fn frame_for(closes: &[f64], signal: &dyn CrossoverSignal) -> IndicatorFrame {
    IndicatorFrame::compute(crate::indicators::make_series(closes), &signal.indicators())
}
