//! ScanOrchestrator: runs one strategy across the investable universe.
//!
//! The universe is paged with a fixed page size. Each stock is evaluated in
//! isolation: a per-stock error is logged and counted, then the scan moves
//! on. Only scan-level errors (`ScanError::is_fatal`) abort the run.
//!
//! # Modes
//! - Batch: the date must be a recorded trading date; signals are committed
//!   through the dedup guard.
//! - Real-time: same-day quotes are spliced onto the stored window when
//!   storage has no bars for the date yet; signals are returned, never stored.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dedup::DedupGuard;
use crate::domain::{DailyBar, Stock, StrategyResult};
use crate::error::ScanError;
use crate::signal::SignalDetector;
use crate::storage::Storage;
use crate::strategy::{ScanConstants, StrategyConfig};

pub const DEFAULT_PAGE_SIZE: usize = 100;

/// How a scan treats the evaluation date and its results.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScanMode {
    /// End-of-day scan over stored bars; results are persisted.
    #[default]
    Batch,
    /// Intraday preview; `quotes` maps stock id to today's in-memory bar.
    RealTime { quotes: HashMap<String, DailyBar> },
}

impl ScanMode {
    pub fn kind(&self) -> ScanKind {
        match self {
            ScanMode::Batch => ScanKind::Batch,
            ScanMode::RealTime { .. } => ScanKind::RealTime,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanKind {
    Batch,
    RealTime,
}

/// Summary of one scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub mode: ScanKind,
    pub date: NaiveDate,
    pub strategy: String,
    /// Stocks that went through the pipeline.
    pub evaluated: usize,
    /// Stocks dropped by the auditor exclusion list.
    pub excluded: usize,
    /// Stocks without enough history or without a same-day quote.
    pub skipped: usize,
    /// Stocks whose evaluation failed with invalid input or a storage error.
    pub failed: usize,
    /// Signals already stored for the same triple.
    pub duplicates: usize,
    /// Committed results (batch) or previewed results (real-time).
    pub signals: Vec<StrategyResult>,
}

impl ScanReport {
    fn new(mode: ScanKind, date: NaiveDate, strategy: String) -> Self {
        Self {
            mode,
            date,
            strategy,
            evaluated: 0,
            excluded: 0,
            skipped: 0,
            failed: 0,
            duplicates: 0,
            signals: Vec::new(),
        }
    }
}

/// Per-stock evaluation outcome.
enum Evaluation {
    Signal(StrategyResult),
    NoSignal,
    /// Real-time mode without a quote dated on the evaluation date.
    NoQuote,
}

pub struct ScanOrchestrator<S: Storage> {
    storage: S,
    constants: ScanConstants,
    page_size: usize,
    excluded_auditors: Vec<String>,
}

impl<S: Storage> ScanOrchestrator<S> {
    pub fn new(storage: S, constants: ScanConstants) -> Self {
        Self {
            storage,
            constants,
            page_size: DEFAULT_PAGE_SIZE,
            excluded_auditors: Vec::new(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Skip stocks whose auditor name contains any of these firm names.
    pub fn with_excluded_auditors(mut self, firms: Vec<String>) -> Self {
        self.excluded_auditors = firms;
        self
    }

    pub fn constants(&self) -> &ScanConstants {
        &self.constants
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Build a detector for `config` with this orchestrator's constants.
    pub fn detector(&self, config: StrategyConfig) -> Result<SignalDetector, ScanError> {
        SignalDetector::new(config, self.constants)
    }

    /// Scan the whole universe with one strategy.
    pub fn run(
        &mut self,
        detector: &SignalDetector,
        date: NaiveDate,
        mode: &ScanMode,
    ) -> Result<ScanReport, ScanError> {
        if self.page_size == 0 {
            return Err(ScanError::InvalidConfig("page size must be >= 1".into()));
        }

        let splice_quotes = match mode {
            ScanMode::Batch => {
                if !self.storage.bars_exist(date)? {
                    return Err(ScanError::NotATradingDate(date));
                }
                false
            }
            ScanMode::RealTime { .. } => !self.storage.bars_exist(date)?,
        };

        let strategy = detector.config().label();
        info!(%strategy, %date, mode = ?mode.kind(), splice_quotes, "scan started");
        let mut report = ScanReport::new(mode.kind(), date, strategy);

        let mut offset = 0;
        loop {
            let page = self
                .storage
                .fetch_universe(offset, self.page_size)
                .map_err(ScanError::UniverseQuery)?;
            let fetched = page.len();

            for stock in &page {
                if stock.is_audited_by_any(&self.excluded_auditors) {
                    debug!(stock = %stock.id, auditor = ?stock.auditor, "excluded by auditor");
                    report.excluded += 1;
                    continue;
                }
                report.evaluated += 1;

                match self.evaluate_stock(detector, stock, date, mode, splice_quotes) {
                    Ok(Evaluation::Signal(result)) => self.record(&mut report, result, mode),
                    Ok(Evaluation::NoSignal) => {}
                    Ok(Evaluation::NoQuote) => {
                        debug!(stock = %stock.id, %date, "no usable same-day quote");
                        report.skipped += 1;
                    }
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e @ ScanError::InsufficientHistory { .. }) => {
                        warn!(stock = %stock.id, %date, error = %e, "stock skipped");
                        report.skipped += 1;
                    }
                    Err(e) => {
                        warn!(stock = %stock.id, %date, error = %e, "stock evaluation failed");
                        report.failed += 1;
                    }
                }
            }

            if fetched < self.page_size {
                break;
            }
            offset += fetched;
        }

        info!(
            strategy = %report.strategy,
            %date,
            evaluated = report.evaluated,
            excluded = report.excluded,
            skipped = report.skipped,
            failed = report.failed,
            duplicates = report.duplicates,
            signals = report.signals.len(),
            "scan finished"
        );
        Ok(report)
    }

    /// Evaluate one stock without persisting anything.
    pub fn evaluate(
        &self,
        stock: &Stock,
        date: NaiveDate,
        config: &StrategyConfig,
        mode: &ScanMode,
    ) -> Result<Option<StrategyResult>, ScanError> {
        let detector = SignalDetector::new(*config, self.constants)?;
        let splice_quotes = match mode {
            ScanMode::Batch => false,
            ScanMode::RealTime { .. } => !self.storage.bars_exist(date)?,
        };
        match self.evaluate_stock(&detector, stock, date, mode, splice_quotes)? {
            Evaluation::Signal(result) => Ok(Some(result)),
            Evaluation::NoSignal | Evaluation::NoQuote => Ok(None),
        }
    }

    fn evaluate_stock(
        &self,
        detector: &SignalDetector,
        stock: &Stock,
        date: NaiveDate,
        mode: &ScanMode,
        splice_quotes: bool,
    ) -> Result<Evaluation, ScanError> {
        let mut window = self
            .storage
            .fetch_bars(&stock.id, date, detector.fetch_limit())?;

        if let ScanMode::RealTime { quotes } = mode {
            if splice_quotes {
                let Some(quote) = quotes.get(&stock.id) else {
                    return Ok(Evaluation::NoQuote);
                };
                if quote.date != date {
                    debug!(stock = %stock.id, %date, quote_date = %quote.date, "stale quote");
                    return Ok(Evaluation::NoQuote);
                }
                window.insert(0, quote.clone());
            }
        }

        Ok(match detector.detect(stock, &window, date)? {
            Some(result) => Evaluation::Signal(result),
            None => Evaluation::NoSignal,
        })
    }

    fn record(&mut self, report: &mut ScanReport, result: StrategyResult, mode: &ScanMode) {
        match mode {
            ScanMode::RealTime { .. } => {
                info!(stock = %result.stock_id, strategy = %result.strategy_name, "preview signal");
                report.signals.push(result);
            }
            ScanMode::Batch => match DedupGuard::new(&mut self.storage).commit(&result) {
                Ok(true) => {
                    info!(stock = %result.stock_id, strategy = %result.strategy_name, "signal stored");
                    report.signals.push(result);
                }
                Ok(false) => report.duplicates += 1,
                Err(e) => {
                    warn!(stock = %result.stock_id, date = %result.date, error = %e, "persist failed");
                    report.failed += 1;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, day).unwrap()
    }

    #[test]
    fn batch_on_non_trading_date_is_fatal() {
        let mut scan = ScanOrchestrator::new(MemoryStore::new(), ScanConstants::default());
        let detector = scan.detector(StrategyConfig::ma(5, 20)).unwrap();
        let err = scan.run(&detector, d(2), &ScanMode::Batch).unwrap_err();
        assert!(matches!(err, ScanError::NotATradingDate(date) if date == d(2)));
        assert!(err.is_fatal());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let mut scan =
            ScanOrchestrator::new(MemoryStore::new(), ScanConstants::default()).with_page_size(0);
        let detector = scan.detector(StrategyConfig::ma(5, 20)).unwrap();
        let mode = ScanMode::RealTime {
            quotes: HashMap::new(),
        };
        assert!(matches!(
            scan.run(&detector, d(2), &mode),
            Err(ScanError::InvalidConfig(_))
        ));
    }

    #[test]
    fn universe_failure_is_fatal() {
        let mut store = MemoryStore::new();
        store.set_universe_unavailable(true);
        let mut scan = ScanOrchestrator::new(store, ScanConstants::default());
        let detector = scan.detector(StrategyConfig::ma(5, 20)).unwrap();
        let mode = ScanMode::RealTime {
            quotes: HashMap::new(),
        };
        assert!(matches!(
            scan.run(&detector, d(2), &mode),
            Err(ScanError::UniverseQuery(_))
        ));
    }

    #[test]
    fn empty_universe_in_real_time_reports_nothing() {
        let mut scan = ScanOrchestrator::new(MemoryStore::new(), ScanConstants::default());
        let detector = scan.detector(StrategyConfig::macd(12, 26, 9)).unwrap();
        let mode = ScanMode::RealTime {
            quotes: HashMap::new(),
        };
        let report = scan.run(&detector, d(2), &mode).unwrap();
        assert_eq!(report.mode, ScanKind::RealTime);
        assert_eq!(report.strategy, "macd_12_26_9");
        assert_eq!(report.evaluated, 0);
        assert!(report.signals.is_empty());
    }
}
