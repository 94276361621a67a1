//! In-memory store for tests and small datasets.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use super::Storage;
use crate::domain::{DailyBar, Stock, StrategyResult};
use crate::error::StorageError;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    stocks: Vec<Stock>,
    /// Per stock, ascending by date.
    bars: BTreeMap<String, Vec<DailyBar>>,
    results: Vec<StrategyResult>,
    persist_calls: usize,
    failing_stocks: HashSet<String>,
    universe_unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stock(&mut self, stock: Stock) {
        self.stocks.push(stock);
    }

    /// Insert bars, replacing any bar with the same stock and date.
    pub fn add_bars(&mut self, bars: impl IntoIterator<Item = DailyBar>) {
        for bar in bars {
            let series = self.bars.entry(bar.stock_id.clone()).or_default();
            match series.binary_search_by_key(&bar.date, |b| b.date) {
                Ok(i) => series[i] = bar,
                Err(i) => series.insert(i, bar),
            }
        }
    }

    pub fn stocks(&self) -> &[Stock] {
        &self.stocks
    }

    pub fn results(&self) -> &[StrategyResult] {
        &self.results
    }

    pub fn results_mut(&mut self) -> &mut [StrategyResult] {
        &mut self.results
    }

    /// Number of `persist` calls, successful or not.
    pub fn persist_calls(&self) -> usize {
        self.persist_calls
    }

    /// All bars of one stock, ascending by date.
    pub fn bars_for(&self, stock_id: &str) -> &[DailyBar] {
        self.bars.get(stock_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Make every bar fetch for `stock_id` fail.
    pub fn fail_fetches_for(&mut self, stock_id: impl Into<String>) {
        self.failing_stocks.insert(stock_id.into());
    }

    /// Make universe queries fail.
    pub fn set_universe_unavailable(&mut self, unavailable: bool) {
        self.universe_unavailable = unavailable;
    }
}

impl Storage for MemoryStore {
    fn fetch_universe(&self, offset: usize, limit: usize) -> Result<Vec<Stock>, StorageError> {
        if self.universe_unavailable {
            return Err(StorageError::Backend("universe query unavailable".into()));
        }
        Ok(self.stocks.iter().skip(offset).take(limit).cloned().collect())
    }

    fn fetch_bars(
        &self,
        stock_id: &str,
        as_of: NaiveDate,
        limit: usize,
    ) -> Result<Vec<DailyBar>, StorageError> {
        if self.failing_stocks.contains(stock_id) {
            return Err(StorageError::Backend(format!("bar fetch failed for {stock_id}")));
        }
        Ok(self
            .bars_for(stock_id)
            .iter()
            .rev()
            .filter(|b| b.date <= as_of)
            .take(limit)
            .cloned()
            .collect())
    }

    fn bars_exist(&self, date: NaiveDate) -> Result<bool, StorageError> {
        Ok(self
            .bars
            .values()
            .any(|series| series.binary_search_by_key(&date, |b| b.date).is_ok()))
    }

    fn result_exists(
        &self,
        stock_id: &str,
        strategy_name: &str,
        date: NaiveDate,
    ) -> Result<bool, StorageError> {
        Ok(self.results.iter().any(|r| {
            r.stock_id == stock_id && r.strategy_name == strategy_name && r.date == date
        }))
    }

    fn persist(&mut self, result: &StrategyResult) -> Result<(), StorageError> {
        self.persist_calls += 1;
        self.results.push(result.clone());
        Ok(())
    }
}
