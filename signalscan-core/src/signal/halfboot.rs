//! Half-year boot: an MA crossover launched from the half-year line.
//!
//! Requires the current close at or above the half-year line, and the
//! close to have touched or cleared that line at least once in the
//! inspection window before the current row.

use super::filter::{close_at_or_above, held_non_negative};
use super::{crossed_above, last_two_rows, CrossoverSignal};
use crate::domain::Direction;
use crate::error::ScanError;
use crate::frame::IndicatorFrame;
use crate::indicators::{Indicator, Sma, SmaSpread};

#[derive(Debug, Clone)]
pub struct HalfBootCross {
    pub short_window: usize,
    pub long_window: usize,
    inspect_window: usize,
    direction: Direction,
    spread: SmaSpread,
    half_ma: Sma,
    price_half_diff: SmaSpread,
}

impl HalfBootCross {
    pub fn new(
        short_window: usize,
        long_window: usize,
        half_year_window: usize,
        inspect_window: usize,
    ) -> Self {
        Self {
            short_window,
            long_window,
            inspect_window,
            direction: Direction::from_params(short_window, long_window),
            spread: SmaSpread::new(short_window, long_window),
            half_ma: Sma::new(half_year_window),
            price_half_diff: SmaSpread::new(1, half_year_window),
        }
    }
}

impl CrossoverSignal for HalfBootCross {
    fn name(&self) -> &str {
        "halfboot"
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(self.spread.clone()),
            Box::new(self.half_ma.clone()),
            Box::new(self.price_half_diff.clone()),
        ]
    }

    fn detect(&self, frame: &IndicatorFrame) -> Result<Option<Direction>, ScanError> {
        let (prev, cur) = last_two_rows(frame)?;
        let key = self.spread.name();
        if !crossed_above(frame.value(key, prev)?, frame.value(key, cur)?) {
            return Ok(None);
        }
        if !close_at_or_above(frame, cur, self.half_ma.name())? {
            return Ok(None);
        }
        if !held_non_negative(frame, self.price_half_diff.name(), cur, self.inspect_window)? {
            return Ok(None);
        }
        Ok(Some(self.direction))
    }
}
