//! Storage trait: the only way the scan engine touches persisted data.
//!
//! Implementations are injected into the orchestrator, so tests run against
//! `MemoryStore` and the runner against its CSV/JSONL file store.

pub mod memory;

pub use memory::MemoryStore;

use chrono::NaiveDate;

use crate::domain::{DailyBar, Stock, StrategyResult};
use crate::error::StorageError;

/// Storage collaborator for the scan engine.
pub trait Storage {
    /// One page of the investable universe. Pagination is stable across calls.
    fn fetch_universe(&self, offset: usize, limit: usize) -> Result<Vec<Stock>, StorageError>;

    /// Up to `limit` bars dated on or before `as_of`, most recent first.
    fn fetch_bars(
        &self,
        stock_id: &str,
        as_of: NaiveDate,
        limit: usize,
    ) -> Result<Vec<DailyBar>, StorageError>;

    /// True if any stock has a bar recorded for `date`.
    fn bars_exist(&self, date: NaiveDate) -> Result<bool, StorageError>;

    /// True if a result for the (stock, strategy, date) triple is stored.
    fn result_exists(
        &self,
        stock_id: &str,
        strategy_name: &str,
        date: NaiveDate,
    ) -> Result<bool, StorageError>;

    /// Store a new result.
    fn persist(&mut self, result: &StrategyResult) -> Result<(), StorageError>;
}
