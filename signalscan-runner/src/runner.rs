//! Scan runner: wires settings, storage and the orchestrator together.
//!
//! Strategies run one after another against the same storage. A scan-level
//! error aborts the remaining strategies.

use std::collections::HashMap;
use std::fmt::Write;
use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use signalscan_core::{
    DailyBar, ScanError, ScanMode, ScanOrchestrator, ScanReport, Storage,
};

use crate::file_store::StoreError;
use crate::settings::{ConfigError, ScanSettings, StrategyEntry};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("no strategies configured")]
    NoStrategies,
}

/// Orchestrator over `store` with the page size, exclusions and constants
/// from `settings`.
pub fn build_orchestrator<S: Storage>(store: S, settings: &ScanSettings) -> ScanOrchestrator<S> {
    ScanOrchestrator::new(store, settings.constants)
        .with_page_size(settings.page_size)
        .with_excluded_auditors(settings.excluded_auditors.clone())
}

/// Run every strategy for `date`, in order.
pub fn run_strategies<S: Storage>(
    orchestrator: &mut ScanOrchestrator<S>,
    strategies: &[StrategyEntry],
    date: NaiveDate,
    mode: &ScanMode,
) -> Result<Vec<ScanReport>, RunError> {
    if strategies.is_empty() {
        return Err(RunError::NoStrategies);
    }

    let mut reports = Vec::with_capacity(strategies.len());
    for entry in strategies {
        let mut detector = orchestrator.detector(entry.config)?;
        if let Some(policy) = entry.window {
            detector = detector.with_policy(policy);
        }
        reports.push(orchestrator.run(&detector, date, mode)?);
    }

    let signals: usize = reports.iter().map(|r| r.signals.len()).sum();
    info!(%date, strategies = reports.len(), signals, "all strategies scanned");
    Ok(reports)
}

/// Load same-day quotes from a CSV with the `bars.csv` columns.
///
/// A later row for the same stock replaces an earlier one.
pub fn load_quotes(path: &Path) -> Result<HashMap<String, DailyBar>, StoreError> {
    let csv_err = |source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let mut quotes = HashMap::new();
    for bar in reader.deserialize::<DailyBar>() {
        let bar = bar.map_err(csv_err)?;
        quotes.insert(bar.stock_id.clone(), bar);
    }
    Ok(quotes)
}

/// Text summary of one scan followed by its signals.
pub fn render_report(report: &ScanReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {:?} {}: evaluated {}, excluded {}, skipped {}, failed {}, duplicates {}, signals {}",
        report.date,
        report.mode,
        report.strategy,
        report.evaluated,
        report.excluded,
        report.skipped,
        report.failed,
        report.duplicates,
        report.signals.len()
    );
    for s in &report.signals {
        let _ = writeln!(
            out,
            "  {:<10}{:<12}{:<26}{:>10.2}",
            s.stock_id, s.stock_name, s.strategy_name, s.init_price
        );
    }
    out
}
