//! SignalScan Runner: everything around the scan engine.
//!
//! This crate builds on `signalscan-core` to provide:
//! - TOML scan settings with per-strategy window overrides
//! - A CSV/JSONL file store implementing the storage traits
//! - The multi-strategy scan runner and same-day quote loading
//! - Back-test outcome filling at 1/3/5-day horizons
//! - Per-strategy success statistics
//! - Price-change rankings between two dates

pub mod backtest;
pub mod file_store;
pub mod rank;
pub mod runner;
pub mod settings;
pub mod stats;
pub mod store;

pub use backtest::{fill_outcomes, BacktestSummary};
pub use file_store::{FileStore, StoreError};
pub use rank::{rank_price_changes, PriceChange, PriceRanking, DEFAULT_TOP};
pub use runner::{build_orchestrator, load_quotes, render_report, run_strategies, RunError};
pub use settings::{ConfigError, ScanSettings, StrategyEntry};
pub use stats::{strategy_statistics, StatsError, StrategyStatistics, DEFAULT_STAT_DATES};
pub use store::ResultStore;
