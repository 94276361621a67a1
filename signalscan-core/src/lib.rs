//! SignalScan Core: crossover-signal screening over daily equity bars.
//!
//! This crate contains the screening engine:
//! - Domain types (daily bars, stocks, strategy results)
//! - Share-count price adjustment
//! - Indicator engine (SMA, EMA, MACD, KDJ, spreads) and the indicator frame
//! - Strategy families and their crossover detectors
//! - Dedup guard and the scan orchestrator (batch and real-time modes)
//! - The storage trait plus an in-memory store

pub mod adjust;
pub mod dedup;
pub mod domain;
pub mod error;
pub mod frame;
pub mod indicators;
pub mod scan;
pub mod signal;
pub mod storage;
pub mod strategy;

pub use adjust::{adjust, AdjustedPoint, AdjustedSeries};
pub use dedup::DedupGuard;
pub use domain::{DailyBar, Direction, Horizon, Stock, StrategyResult};
pub use error::{ScanError, StorageError};
pub use frame::IndicatorFrame;
pub use scan::{ScanMode, ScanOrchestrator, ScanReport};
pub use signal::{CrossoverSignal, SignalDetector};
pub use storage::{MemoryStore, Storage};
pub use strategy::{ScanConstants, StrategyConfig, StrategyFamily, WindowPolicy};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types handed across threads by callers are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<DailyBar>();
        require_sync::<DailyBar>();
        require_send::<StrategyResult>();
        require_sync::<StrategyResult>();
        require_send::<AdjustedSeries>();
        require_sync::<AdjustedSeries>();
        require_send::<IndicatorFrame>();
        require_sync::<IndicatorFrame>();
        require_send::<StrategyConfig>();
        require_sync::<StrategyConfig>();
        require_send::<ScanReport>();
        require_sync::<ScanReport>();
        require_send::<SignalDetector>();
        require_sync::<SignalDetector>();
        require_send::<MemoryStore>();
        require_sync::<MemoryStore>();
    }

    /// Detectors only see the indicator frame, never storage.
    #[test]
    fn crossover_signal_sees_only_the_frame() {
        fn _check_trait_object_builds(
            sig: &dyn CrossoverSignal,
            frame: &IndicatorFrame,
        ) -> Result<Option<Direction>, ScanError> {
            sig.detect(frame)
        }
    }
}
