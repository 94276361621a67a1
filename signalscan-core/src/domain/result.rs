//! StrategyResult: a recorded crossover signal and its later back-test outcome.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }

    /// Direction implied by a (short, long) parameter pair.
    pub fn from_params(short: usize, long: usize) -> Self {
        if short <= long {
            Direction::Long
        } else {
            Direction::Short
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Back-test horizon, in trading days after the signal date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Horizon {
    One,
    Three,
    Five,
}

impl Horizon {
    pub const ALL: [Horizon; 3] = [Horizon::One, Horizon::Three, Horizon::Five];

    pub fn days(&self) -> usize {
        match self {
            Horizon::One => 1,
            Horizon::Three => 3,
            Horizon::Five => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Horizon::One => "one",
            Horizon::Three => "three",
            Horizon::Five => "five",
        }
    }
}

/// A signal record, unique per (stock, strategy, date).
///
/// The outcome fields stay `None` until the back-test process fills them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub stock_id: String,
    pub stock_name: String,
    pub date: NaiveDate,
    pub strategy_name: String,
    pub direction: Direction,
    /// Raw close of the signal-day bar.
    pub init_price: f64,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub change_pct: Option<f64>,
    #[serde(default)]
    pub one_price: Option<f64>,
    #[serde(default)]
    pub one_back_test: Option<bool>,
    #[serde(default)]
    pub three_price: Option<f64>,
    #[serde(default)]
    pub three_back_test: Option<bool>,
    #[serde(default)]
    pub five_price: Option<f64>,
    #[serde(default)]
    pub five_back_test: Option<bool>,
}

impl StrategyResult {
    pub fn new(
        stock_id: impl Into<String>,
        stock_name: impl Into<String>,
        date: NaiveDate,
        strategy_name: impl Into<String>,
        direction: Direction,
        init_price: f64,
    ) -> Self {
        Self {
            stock_id: stock_id.into(),
            stock_name: stock_name.into(),
            date,
            strategy_name: strategy_name.into(),
            direction,
            init_price,
            industry: None,
            change_pct: None,
            one_price: None,
            one_back_test: None,
            three_price: None,
            three_back_test: None,
            five_price: None,
            five_back_test: None,
        }
    }

    /// True if both records describe the same (stock, strategy, date) triple.
    pub fn same_key(&self, other: &StrategyResult) -> bool {
        self.stock_id == other.stock_id
            && self.strategy_name == other.strategy_name
            && self.date == other.date
    }

    /// Recorded outcome at a horizon: (price, success).
    pub fn outcome(&self, horizon: Horizon) -> Option<(f64, bool)> {
        let (price, success) = match horizon {
            Horizon::One => (self.one_price, self.one_back_test),
            Horizon::Three => (self.three_price, self.three_back_test),
            Horizon::Five => (self.five_price, self.five_back_test),
        };
        Some((price?, success?))
    }

    /// Record the outcome at a horizon. Success means the price moved in the
    /// signal's direction.
    pub fn set_outcome(&mut self, horizon: Horizon, price: f64) {
        let success = match self.direction {
            Direction::Long => price > self.init_price,
            Direction::Short => price < self.init_price,
        };
        let (slot_price, slot_success) = match horizon {
            Horizon::One => (&mut self.one_price, &mut self.one_back_test),
            Horizon::Three => (&mut self.three_price, &mut self.three_back_test),
            Horizon::Five => (&mut self.five_price, &mut self.five_back_test),
        };
        *slot_price = Some(price);
        *slot_success = Some(success);
    }

    /// True if any horizon still lacks an outcome.
    pub fn has_pending_outcome(&self) -> bool {
        Horizon::ALL.iter().any(|h| self.outcome(*h).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StrategyResult {
        StrategyResult::new(
            "000001",
            "平安银行",
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            "macd_long_12_26_9",
            Direction::Long,
            10.0,
        )
    }

    #[test]
    fn direction_from_params() {
        assert_eq!(Direction::from_params(5, 20), Direction::Long);
        assert_eq!(Direction::from_params(20, 20), Direction::Long);
        assert_eq!(Direction::from_params(30, 10), Direction::Short);
    }

    #[test]
    fn direction_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Short).unwrap(), "\"short\"");
    }

    #[test]
    fn long_outcome_success_when_price_rises() {
        let mut result = sample();
        result.set_outcome(Horizon::Three, 10.5);
        assert_eq!(result.outcome(Horizon::Three), Some((10.5, true)));
        assert_eq!(result.outcome(Horizon::One), None);
        assert!(result.has_pending_outcome());
    }

    #[test]
    fn short_outcome_success_when_price_falls() {
        let mut result = sample();
        result.direction = Direction::Short;
        result.set_outcome(Horizon::One, 9.0);
        result.set_outcome(Horizon::Five, 11.0);
        assert_eq!(result.outcome(Horizon::One), Some((9.0, true)));
        assert_eq!(result.outcome(Horizon::Five), Some((11.0, false)));
    }

    #[test]
    fn all_horizons_filled_is_not_pending() {
        let mut result = sample();
        for h in Horizon::ALL {
            result.set_outcome(h, 10.0);
        }
        assert!(!result.has_pending_outcome());
        // Unchanged price is not a success for either direction.
        assert_eq!(result.outcome(Horizon::One), Some((10.0, false)));
    }

    #[test]
    fn deserializes_without_outcome_fields() {
        let json = r#"{"stock_id":"000001","stock_name":"平安银行","date":"2024-03-15",
            "strategy_name":"ma_long_5_20","direction":"long","init_price":10.0}"#;
        let result: StrategyResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.direction, Direction::Long);
        assert!(result.industry.is_none());
        assert!(result.has_pending_outcome());
    }
}
