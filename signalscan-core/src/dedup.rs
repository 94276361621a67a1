//! DedupGuard: at most one stored result per (stock, strategy, date).
//!
//! Check-then-act against the storage collaborator. Not atomic; the
//! orchestrator is single-threaded and is the only writer.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::StrategyResult;
use crate::error::ScanError;
use crate::storage::Storage;

pub struct DedupGuard<'a, S: Storage + ?Sized> {
    storage: &'a mut S,
}

impl<'a, S: Storage + ?Sized> DedupGuard<'a, S> {
    pub fn new(storage: &'a mut S) -> Self {
        Self { storage }
    }

    pub fn is_duplicate(
        &self,
        stock_id: &str,
        strategy_name: &str,
        date: NaiveDate,
    ) -> Result<bool, ScanError> {
        Ok(self.storage.result_exists(stock_id, strategy_name, date)?)
    }

    /// Persist `result` unless its triple is already stored.
    ///
    /// Returns whether a write happened.
    pub fn commit(&mut self, result: &StrategyResult) -> Result<bool, ScanError> {
        if self.is_duplicate(&result.stock_id, &result.strategy_name, result.date)? {
            debug!(
                stock = %result.stock_id,
                strategy = %result.strategy_name,
                date = %result.date,
                "duplicate result, not persisted"
            );
            return Ok(false);
        }
        self.storage.persist(result)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;
    use crate::storage::MemoryStore;

    fn result(strategy: &str) -> StrategyResult {
        StrategyResult::new(
            "600519",
            "贵州茅台",
            NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            strategy,
            Direction::Long,
            1500.0,
        )
    }

    #[test]
    fn second_commit_is_a_no_op() {
        let mut store = MemoryStore::new();
        let mut guard = DedupGuard::new(&mut store);
        assert!(guard.commit(&result("ma_long_5_20")).unwrap());
        assert!(!guard.commit(&result("ma_long_5_20")).unwrap());
        assert_eq!(store.persist_calls(), 1);
        assert_eq!(store.results().len(), 1);
    }

    #[test]
    fn different_strategy_is_not_a_duplicate() {
        let mut store = MemoryStore::new();
        let mut guard = DedupGuard::new(&mut store);
        guard.commit(&result("ma_long_5_20")).unwrap();
        assert!(guard.commit(&result("ma_long_10_30")).unwrap());
        let date = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        assert!(guard.is_duplicate("600519", "ma_long_10_30", date).unwrap());
        assert!(!guard.is_duplicate("600519", "macd_long_12_26_9", date).unwrap());
    }

    #[test]
    fn works_through_trait_objects() {
        let mut store = MemoryStore::new();
        let dyn_store: &mut dyn Storage = &mut store;
        let mut guard = DedupGuard::new(dyn_store);
        assert!(guard.commit(&result("halfboot_long_5_10")).unwrap());
    }
}
