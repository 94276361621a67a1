//! MACD zero-line crossing of the histogram.
//!
//! Histogram turns positive → long, turns negative → short. Either way the
//! current close must sit at or above the year line.

use super::filter::close_at_or_above;
use super::{crossed_above, crossed_below, last_two_rows, CrossoverSignal};
use crate::domain::Direction;
use crate::error::ScanError;
use crate::frame::IndicatorFrame;
use crate::indicators::{Indicator, Macd, MacdParams, Sma};

#[derive(Debug, Clone)]
pub struct MacdCross {
    pub params: MacdParams,
    hist: Macd,
    year_ma: Sma,
}

impl MacdCross {
    pub fn new(params: MacdParams, year_window: usize) -> Self {
        Self {
            params,
            hist: Macd::hist(params),
            year_ma: Sma::new(year_window),
        }
    }
}

impl CrossoverSignal for MacdCross {
    fn name(&self) -> &str {
        "macd"
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![Box::new(self.hist.clone()), Box::new(self.year_ma.clone())]
    }

    fn detect(&self, frame: &IndicatorFrame) -> Result<Option<Direction>, ScanError> {
        let (prev, cur) = last_two_rows(frame)?;
        let previous = frame.value(self.hist.name(), prev)?;
        let current = frame.value(self.hist.name(), cur)?;

        let direction = if crossed_above(previous, current) {
            Direction::Long
        } else if crossed_below(previous, current) {
            Direction::Short
        } else {
            return Ok(None);
        };

        if !close_at_or_above(frame, cur, self.year_ma.name())? {
            return Ok(None);
        }
        Ok(Some(direction))
    }
}
