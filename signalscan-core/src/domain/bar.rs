//! DailyBar: one trading day for one stock, as recorded by ingestion.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily trading record for a single stock.
///
/// Prices are raw (not adjusted for share-count changes). `change_pct` and
/// `turnover_pct` are percentages, so `3.2` means +3.2 %. A `total_shares` of
/// zero means the share count is unknown for that day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub stock_id: String,
    pub stock_name: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: u64,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub change_pct: f64,
    #[serde(default)]
    pub turnover_pct: f64,
    #[serde(default)]
    pub volume_ratio: f64,
    #[serde(default)]
    pub total_shares: f64,
}

impl DailyBar {
    /// A day with zero price change and zero turnover is a trading halt.
    pub fn is_halted(&self) -> bool {
        self.change_pct == 0.0 && self.turnover_pct == 0.0
    }

    /// True when the share count is known for this day.
    pub fn has_share_count(&self) -> bool {
        self.total_shares > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> DailyBar {
        DailyBar {
            stock_id: "600000".into(),
            stock_name: "浦发银行".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            open: 7.10,
            high: 7.25,
            low: 7.05,
            close: 7.20,
            volume: 350_000,
            amount: 25_100.0,
            change_pct: 1.41,
            turnover_pct: 0.12,
            volume_ratio: 0.95,
            total_shares: 29_352_000_000.0,
        }
    }

    #[test]
    fn trading_day_is_not_halted() {
        assert!(!sample_bar().is_halted());
    }

    #[test]
    fn zero_change_and_turnover_is_halted() {
        let mut bar = sample_bar();
        bar.change_pct = 0.0;
        bar.turnover_pct = 0.0;
        assert!(bar.is_halted());
    }

    #[test]
    fn flat_close_with_turnover_is_not_halted() {
        let mut bar = sample_bar();
        bar.change_pct = 0.0;
        assert!(!bar.is_halted());
    }

    #[test]
    fn missing_share_count() {
        let mut bar = sample_bar();
        assert!(bar.has_share_count());
        bar.total_shares = 0.0;
        assert!(!bar.has_share_count());
    }
}
