//! KDJ golden cross inside a positive MACD regime.
//!
//! Fires long when `k_d_dif` turns positive while the MACD histogram is
//! positive on both the previous and the current row. Long only.

use super::{crossed_above, last_two_rows, CrossoverSignal};
use crate::domain::Direction;
use crate::error::ScanError;
use crate::frame::IndicatorFrame;
use crate::indicators::{Indicator, Kdj, KdjLine, KdjParams, Macd, MacdParams};

#[derive(Debug, Clone)]
pub struct MacdKdjCross {
    pub macd: MacdParams,
    pub kdj: KdjParams,
    hist: Macd,
    k_d_dif: Kdj,
}

impl MacdKdjCross {
    pub fn new(macd: MacdParams, kdj: KdjParams) -> Self {
        Self {
            macd,
            kdj,
            hist: Macd::hist(macd),
            k_d_dif: Kdj::new(kdj, KdjLine::KDDif),
        }
    }
}

impl CrossoverSignal for MacdKdjCross {
    fn name(&self) -> &str {
        "macd_kdj"
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![Box::new(self.hist.clone()), Box::new(self.k_d_dif.clone())]
    }

    fn detect(&self, frame: &IndicatorFrame) -> Result<Option<Direction>, ScanError> {
        let (prev, cur) = last_two_rows(frame)?;
        let kd = self.k_d_dif.name();
        if !crossed_above(frame.value(kd, prev)?, frame.value(kd, cur)?) {
            return Ok(None);
        }

        let hist = self.hist.name();
        if frame.value(hist, prev)? > 0.0 && frame.value(hist, cur)? > 0.0 {
            Ok(Some(Direction::Long))
        } else {
            Ok(None)
        }
    }
}
