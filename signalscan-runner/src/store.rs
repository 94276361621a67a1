//! Result storage used by the back-test, statistics and ranking processes.

use chrono::NaiveDate;

use signalscan_core::{DailyBar, MemoryStore, Storage, StorageError, StrategyResult};

/// Storage with read and update access to stored results.
pub trait ResultStore: Storage {
    /// Up to `limit` bars dated strictly after `after`, ascending.
    fn fetch_bars_after(
        &self,
        stock_id: &str,
        after: NaiveDate,
        limit: usize,
    ) -> Result<Vec<DailyBar>, StorageError>;

    /// Stored results, optionally restricted to one strategy name.
    fn results(&self, strategy_name: Option<&str>) -> Result<Vec<StrategyResult>, StorageError>;

    /// Replace the stored record with the same (stock, strategy, date) triple.
    fn update_result(&mut self, result: &StrategyResult) -> Result<(), StorageError>;
}

impl ResultStore for MemoryStore {
    fn fetch_bars_after(
        &self,
        stock_id: &str,
        after: NaiveDate,
        limit: usize,
    ) -> Result<Vec<DailyBar>, StorageError> {
        Ok(self
            .bars_for(stock_id)
            .iter()
            .filter(|b| b.date > after)
            .take(limit)
            .cloned()
            .collect())
    }

    fn results(&self, strategy_name: Option<&str>) -> Result<Vec<StrategyResult>, StorageError> {
        Ok(MemoryStore::results(self)
            .iter()
            .filter(|r| strategy_name.map_or(true, |name| r.strategy_name == name))
            .cloned()
            .collect())
    }

    fn update_result(&mut self, result: &StrategyResult) -> Result<(), StorageError> {
        let stored = self
            .results_mut()
            .iter_mut()
            .find(|r| r.same_key(result))
            .ok_or_else(|| {
                StorageError::NotFound(format!(
                    "{} {} {}",
                    result.stock_id, result.strategy_name, result.date
                ))
            })?;
        *stored = result.clone();
        Ok(())
    }
}
