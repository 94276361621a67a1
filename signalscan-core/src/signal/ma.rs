//! Moving-average crossover: `diff_ma = sma(short) - sma(long)` turns positive.
//!
//! The direction is fixed by the parameters: long when short <= long, short
//! otherwise. Halted-day handling lives in the family's window policy.

use super::{crossed_above, last_two_rows, CrossoverSignal};
use crate::domain::Direction;
use crate::error::ScanError;
use crate::frame::IndicatorFrame;
use crate::indicators::{Indicator, SmaSpread};

#[derive(Debug, Clone)]
pub struct MaCross {
    pub short_window: usize,
    pub long_window: usize,
    spread: SmaSpread,
    direction: Direction,
}

impl MaCross {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self {
            short_window,
            long_window,
            spread: SmaSpread::new(short_window, long_window),
            direction: Direction::from_params(short_window, long_window),
        }
    }
}

impl CrossoverSignal for MaCross {
    fn name(&self) -> &str {
        "ma"
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![Box::new(self.spread.clone())]
    }

    fn detect(&self, frame: &IndicatorFrame) -> Result<Option<Direction>, ScanError> {
        let (prev, cur) = last_two_rows(frame)?;
        let key = self.spread.name();
        if crossed_above(frame.value(key, prev)?, frame.value(key, cur)?) {
            Ok(Some(self.direction))
        } else {
            Ok(None)
        }
    }
}
