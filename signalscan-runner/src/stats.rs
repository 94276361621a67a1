//! Per-date success statistics for one strategy.

use std::collections::BTreeSet;
use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use signalscan_core::{Direction, Horizon, StorageError, StrategyResult};

use crate::store::ResultStore;

pub const DEFAULT_STAT_DATES: usize = 50;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("unknown strategy name '{0}'")]
    UnknownStrategy(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Outcome statistics at one horizon over results with that horizon filled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HorizonStats {
    pub samples: usize,
    /// Fraction of samples whose outcome was a success.
    pub success_rate: f64,
    /// Mean signed return in the signal's direction.
    pub yield_expectation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateStats {
    pub date: NaiveDate,
    /// Signals of the strategy on this date.
    pub count: usize,
    /// Indexed like `Horizon::ALL`; `None` when no result is filled yet.
    pub horizons: [Option<HorizonStats>; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyStatistics {
    pub strategy_name: String,
    pub rows: Vec<DateStats>,
}

/// Statistics over the `last_n_dates` most recent signal dates of any
/// strategy.
pub fn strategy_statistics<S: ResultStore + ?Sized>(
    store: &S,
    strategy_name: &str,
    last_n_dates: usize,
) -> Result<StrategyStatistics, StatsError> {
    let own = store.results(Some(strategy_name))?;
    if own.is_empty() {
        return Err(StatsError::UnknownStrategy(strategy_name.to_string()));
    }

    let all_dates: BTreeSet<NaiveDate> = store.results(None)?.iter().map(|r| r.date).collect();
    let skip = all_dates.len().saturating_sub(last_n_dates);
    let direction = direction_of(strategy_name, &own[0]);

    let rows = all_dates
        .into_iter()
        .skip(skip)
        .map(|date| {
            let on_date: Vec<&StrategyResult> = own.iter().filter(|r| r.date == date).collect();
            DateStats {
                date,
                count: on_date.len(),
                horizons: Horizon::ALL.map(|h| horizon_stats(&on_date, h, direction)),
            }
        })
        .collect();

    Ok(StrategyStatistics {
        strategy_name: strategy_name.to_string(),
        rows,
    })
}

/// Direction from the name's `long`/`short` marker, else from the record.
fn direction_of(strategy_name: &str, sample: &StrategyResult) -> Direction {
    if strategy_name.contains("long") {
        Direction::Long
    } else if strategy_name.contains("short") {
        Direction::Short
    } else {
        sample.direction
    }
}

fn horizon_stats(
    results: &[&StrategyResult],
    horizon: Horizon,
    direction: Direction,
) -> Option<HorizonStats> {
    let filled: Vec<(f64, bool, f64)> = results
        .iter()
        .filter_map(|r| {
            r.outcome(horizon)
                .map(|(price, success)| (price, success, r.init_price))
        })
        .collect();
    if filled.is_empty() {
        return None;
    }

    let samples = filled.len() as f64;
    let successes = filled.iter().filter(|(_, success, _)| *success).count() as f64;
    let total_yield: f64 = filled
        .iter()
        .map(|&(price, _, init)| match direction {
            Direction::Long => (price - init) / init,
            Direction::Short => (init - price) / init,
        })
        .sum();

    Some(HorizonStats {
        samples: filled.len(),
        success_rate: successes / samples,
        yield_expectation: total_yield / samples,
    })
}

fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "-".to_string(),
    }
}

impl StrategyStatistics {
    /// Fixed-width text table, one row per date.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "strategy: {}", self.strategy_name);
        let _ = write!(out, "{:<12}{:>7}", "date", "count");
        for h in Horizon::ALL {
            let _ = write!(
                out,
                "{:>14}{:>14}",
                format!("{}_back_test", h.label()),
                format!("{}_yield", h.label())
            );
        }
        out.push('\n');

        for row in &self.rows {
            let _ = write!(out, "{:<12}{:>7}", row.date.to_string(), row.count);
            for stats in &row.horizons {
                let _ = write!(
                    out,
                    "{:>14}{:>14}",
                    percent(stats.map(|s| s.success_rate)),
                    percent(stats.map(|s| s.yield_expectation))
                );
            }
            out.push('\n');
        }
        out
    }
}
