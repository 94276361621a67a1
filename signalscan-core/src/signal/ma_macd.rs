//! Moving-average crossover confirmed by the MACD configuration.
//!
//! Same `diff_ma` crossing as the MA family, above the year line, plus:
//! - long: macd > 0 > dif and dea < 0 (histogram recovering below zero)
//! - short: macd < 0 < dif and dea > 0 (histogram fading above zero)

use super::filter::close_at_or_above;
use super::{crossed_above, last_two_rows, CrossoverSignal};
use crate::domain::Direction;
use crate::error::ScanError;
use crate::frame::IndicatorFrame;
use crate::indicators::{Indicator, Macd, MacdParams, Sma, SmaSpread};

#[derive(Debug, Clone)]
pub struct MaMacdCross {
    pub short_window: usize,
    pub long_window: usize,
    pub macd: MacdParams,
    direction: Direction,
    spread: SmaSpread,
    dif: Macd,
    dea: Macd,
    hist: Macd,
    year_ma: Sma,
}

impl MaMacdCross {
    pub fn new(short_window: usize, long_window: usize, macd: MacdParams, year_window: usize) -> Self {
        let [dif, dea, hist] = Macd::lines(macd);
        Self {
            short_window,
            long_window,
            macd,
            direction: Direction::from_params(short_window, long_window),
            spread: SmaSpread::new(short_window, long_window),
            dif,
            dea,
            hist,
            year_ma: Sma::new(year_window),
        }
    }

    fn macd_confirms(&self, frame: &IndicatorFrame, row: usize) -> Result<bool, ScanError> {
        let dif = frame.value(self.dif.name(), row)?;
        let dea = frame.value(self.dea.name(), row)?;
        let hist = frame.value(self.hist.name(), row)?;
        Ok(match self.direction {
            Direction::Long => hist > 0.0 && 0.0 > dif && dea < 0.0,
            Direction::Short => hist < 0.0 && 0.0 < dif && dea > 0.0,
        })
    }
}

impl CrossoverSignal for MaMacdCross {
    fn name(&self) -> &str {
        "ma_macd"
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(self.spread.clone()),
            Box::new(self.dif.clone()),
            Box::new(self.dea.clone()),
            Box::new(self.hist.clone()),
            Box::new(self.year_ma.clone()),
        ]
    }

    fn detect(&self, frame: &IndicatorFrame) -> Result<Option<Direction>, ScanError> {
        let (prev, cur) = last_two_rows(frame)?;
        let key = self.spread.name();
        if !crossed_above(frame.value(key, prev)?, frame.value(key, cur)?) {
            return Ok(None);
        }
        if !close_at_or_above(frame, cur, self.year_ma.name())? {
            return Ok(None);
        }
        if self.macd_confirms(frame, cur)? {
            Ok(Some(self.direction))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::frame_for;

    const FAST_MACD: MacdParams = MacdParams::new(2, 6, 3);

    fn decline_then_bounce() -> Vec<f64> {
        let mut closes: Vec<f64> = (0..10).map(|i| 30.0 - 2.0 * i as f64).collect();
        closes.extend([13.0, 15.0]);
        closes
    }

    #[test]
    fn bounce_in_downtrend_goes_long() {
        let s = MaMacdCross::new(2, 3, FAST_MACD, 5);
        let frame = frame_for(&decline_then_bounce(), &s);
        assert_eq!(s.detect(&frame).unwrap(), Some(Direction::Long));
    }

    #[test]
    fn bounce_below_year_line_is_filtered() {
        // sma12 ≈ 19.8 sits above the close of 15.
        let s = MaMacdCross::new(2, 3, FAST_MACD, 12);
        let frame = frame_for(&decline_then_bounce(), &s);
        assert_eq!(s.detect(&frame).unwrap(), None);
    }

    #[test]
    fn pullback_in_uptrend_goes_short() {
        let mut closes: Vec<f64> = (0..12).map(|i| 10.0 + i as f64).collect();
        closes.extend([20.0, 19.0]);
        let s = MaMacdCross::new(3, 2, FAST_MACD, 8);
        let frame = frame_for(&closes, &s);
        assert_eq!(s.detect(&frame).unwrap(), Some(Direction::Short));
    }

    #[test]
    fn long_needs_negative_dif() {
        // Shakeout during a steady rise: dif stays positive, so the long rule fails.
        let mut closes: Vec<f64> = (0..10).map(|i| 10.0 + i as f64).collect();
        closes.extend([15.0, 25.0]);
        let s = MaMacdCross::new(2, 3, FAST_MACD, 5);
        let frame = frame_for(&closes, &s);
        let diff = frame.column(s.spread.name()).unwrap();
        assert!(diff[10] <= 0.0 && diff[11] > 0.0, "fixture must cross: {diff:?}");
        assert_eq!(s.detect(&frame).unwrap(), None);
    }
}
