//! SignalDetector: the per-stock pipeline from raw window to unsaved result.
//!
//! window policy → date check → history check → adjust → indicator frame →
//! crossover detection → `StrategyResult`.

use std::borrow::Borrow;

use chrono::NaiveDate;
use tracing::trace;

use super::CrossoverSignal;
use crate::adjust::adjust;
use crate::domain::{DailyBar, Stock, StrategyResult};
use crate::error::ScanError;
use crate::frame::IndicatorFrame;
use crate::strategy::{create_signal, ScanConstants, StrategyConfig, WindowPolicy};

#[derive(Debug)]
pub struct SignalDetector {
    config: StrategyConfig,
    constants: ScanConstants,
    policy: WindowPolicy,
    signal: Box<dyn CrossoverSignal>,
}

impl SignalDetector {
    /// Validate `config` and build its detector with the family's default
    /// window policy.
    pub fn new(config: StrategyConfig, constants: ScanConstants) -> Result<Self, ScanError> {
        let signal = create_signal(&config, &constants)?;
        Ok(Self {
            policy: config.default_window_policy(&constants),
            config,
            constants,
            signal,
        })
    }

    /// Replace the window policy.
    pub fn with_policy(mut self, policy: WindowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn constants(&self) -> &ScanConstants {
        &self.constants
    }

    pub fn policy(&self) -> &WindowPolicy {
        &self.policy
    }

    pub fn required_history(&self) -> usize {
        self.config.required_history(&self.constants)
    }

    pub fn fetch_limit(&self) -> usize {
        self.config.fetch_limit(&self.constants)
    }

    /// Evaluate one stock on `date`.
    ///
    /// `window` is most-recent-first. `Ok(None)` means no signal: the policy
    /// screened the stock out, the stock did not trade on `date`, or no
    /// crossing happened.
    pub fn detect<B: Borrow<DailyBar>>(
        &self,
        stock: &Stock,
        window: &[B],
        date: NaiveDate,
    ) -> Result<Option<StrategyResult>, ScanError> {
        let Some(bars) = self.policy.apply(window) else {
            trace!(stock = %stock.id, %date, "screened out by window policy");
            return Ok(None);
        };

        let Some(latest) = bars.first().copied() else {
            return Err(ScanError::InsufficientHistory {
                required: self.required_history(),
                available: 0,
            });
        };
        if latest.date != date {
            trace!(stock = %stock.id, %date, latest = %latest.date, "no bar on evaluation date");
            return Ok(None);
        }

        let required = self.required_history();
        if bars.len() < required {
            return Err(ScanError::InsufficientHistory {
                required,
                available: bars.len(),
            });
        }

        let series = adjust(&bars)?;
        let frame = IndicatorFrame::compute(series, &self.signal.indicators());
        let Some(direction) = self.signal.detect(&frame)? else {
            return Ok(None);
        };

        let mut result = StrategyResult::new(
            stock.id.clone(),
            stock.name.clone(),
            date,
            self.config.strategy_name(direction),
            direction,
            latest.close,
        );
        result.industry = stock.industry.clone();
        result.change_pct = Some(latest.change_pct);
        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;

    fn bars_most_recent_first(closes: &[f64]) -> Vec<DailyBar> {
        let start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let mut bars: Vec<DailyBar> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| DailyBar {
                stock_id: "000002".into(),
                stock_name: "万科A".into(),
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close + 0.2,
                low: close - 0.2,
                close,
                volume: 10_000,
                amount: 0.0,
                change_pct: 1.0,
                turnover_pct: 0.8,
                volume_ratio: 1.0,
                total_shares: 1_000.0,
            })
            .collect();
        bars.reverse();
        bars
    }

    /// Eight closes: max(2, 3) plus the default margin of five.
    fn crossing_closes() -> Vec<f64> {
        vec![10.0, 10.0, 10.0, 10.0, 10.0, 9.0, 11.0, 13.0]
    }

    fn detector() -> SignalDetector {
        SignalDetector::new(StrategyConfig::ma(2, 3), ScanConstants::default()).unwrap()
    }

    fn stock() -> Stock {
        let mut stock = Stock::new("000002", "万科A");
        stock.industry = Some("房地产".into());
        stock
    }

    #[test]
    fn crossing_builds_result_from_latest_raw_bar() {
        let window = bars_most_recent_first(&crossing_closes());
        let date = window[0].date;
        let result = detector().detect(&stock(), &window, date).unwrap().unwrap();
        assert_eq!(result.strategy_name, "ma_long_2_3");
        assert_eq!(result.direction, Direction::Long);
        assert_eq!(result.init_price, 13.0);
        assert_eq!(result.date, date);
        assert_eq!(result.industry.as_deref(), Some("房地产"));
        assert_eq!(result.change_pct, Some(1.0));
        assert!(result.has_pending_outcome());
    }

    #[test]
    fn other_date_yields_nothing() {
        let window = bars_most_recent_first(&crossing_closes());
        let later = window[0].date + chrono::Duration::days(1);
        assert!(detector().detect(&stock(), &window, later).unwrap().is_none());
    }

    #[test]
    fn exact_required_history_is_enough() {
        let d = detector();
        let window = bars_most_recent_first(&crossing_closes());
        assert_eq!(window.len(), d.required_history());
        let date = window[0].date;
        let result = d.detect(&stock(), &window, date).unwrap().unwrap();
        assert_eq!(result.strategy_name, "ma_long_2_3");
    }

    #[test]
    fn halfboot_exact_required_history_is_enough() {
        let d = SignalDetector::new(StrategyConfig::halfboot(2, 3), ScanConstants::default())
            .unwrap();
        // long + margin + half-year window
        assert_eq!(d.required_history(), 3 + 5 + 120);

        let mut closes = vec![10.0; d.required_history() - 3];
        closes.extend([9.0, 11.0, 13.0]);
        let window = bars_most_recent_first(&closes);
        assert_eq!(window.len(), d.required_history());
        let date = window[0].date;
        let result = d.detect(&stock(), &window, date).unwrap().unwrap();
        assert_eq!(result.strategy_name, "halfboot_long_2_3");
        assert_eq!(result.init_price, 13.0);
    }

    #[test]
    fn length_below_required_is_insufficient_history() {
        let window = bars_most_recent_first(&crossing_closes()[2..]);
        let date = window[0].date;
        let err = detector().detect(&stock(), &window, date).unwrap_err();
        assert!(matches!(
            err,
            ScanError::InsufficientHistory {
                required: 8,
                available: 6
            }
        ));
    }

    #[test]
    fn halted_latest_bar_is_screened_out() {
        let mut window = bars_most_recent_first(&crossing_closes());
        window[0].change_pct = 0.0;
        window[0].turnover_pct = 0.0;
        let date = window[0].date;
        assert!(detector().detect(&stock(), &window, date).unwrap().is_none());
    }

    #[test]
    fn detector_is_stateless_across_calls() {
        let d = detector();
        let window = bars_most_recent_first(&crossing_closes());
        let date = window[0].date;
        let first = d.detect(&stock(), &window, date).unwrap();
        let second = d.detect(&stock(), &window, date).unwrap();
        assert_eq!(first, second);
    }
}
