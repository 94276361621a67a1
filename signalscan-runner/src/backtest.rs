//! Back-test outcome filling.
//!
//! A stored signal is judged by the close `h` trading days after its date,
//! for h in {1, 3, 5}. Horizons without enough later bars stay unfilled and
//! are retried on the next run.

use serde::Serialize;
use tracing::{debug, info, warn};

use signalscan_core::{Horizon, StorageError};

use crate::store::ResultStore;

/// Counts from one filling pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BacktestSummary {
    /// Results that still had at least one unfilled horizon.
    pub examined: usize,
    /// Results with at least one horizon newly filled.
    pub updated: usize,
    /// Results whose bar fetch or update failed.
    pub failed: usize,
}

/// Fill every pending horizon that has enough later bars.
///
/// `strategy_name` restricts the pass to one strategy.
pub fn fill_outcomes<S: ResultStore + ?Sized>(
    store: &mut S,
    strategy_name: Option<&str>,
) -> Result<BacktestSummary, StorageError> {
    let longest = Horizon::ALL.iter().map(Horizon::days).max().unwrap_or(0);
    let mut summary = BacktestSummary::default();

    for mut result in store.results(strategy_name)? {
        if !result.has_pending_outcome() {
            continue;
        }
        summary.examined += 1;

        let later = match store.fetch_bars_after(&result.stock_id, result.date, longest) {
            Ok(bars) => bars,
            Err(e) => {
                warn!(stock = %result.stock_id, date = %result.date, error = %e, "bar fetch failed");
                summary.failed += 1;
                continue;
            }
        };

        let mut changed = false;
        for horizon in Horizon::ALL {
            if result.outcome(horizon).is_some() {
                continue;
            }
            if let Some(bar) = later.get(horizon.days() - 1) {
                result.set_outcome(horizon, bar.close);
                changed = true;
            }
        }
        if !changed {
            debug!(stock = %result.stock_id, date = %result.date, "no new bars yet");
            continue;
        }

        match store.update_result(&result) {
            Ok(()) => summary.updated += 1,
            Err(e) => {
                warn!(stock = %result.stock_id, date = %result.date, error = %e, "update failed");
                summary.failed += 1;
            }
        }
    }

    info!(
        examined = summary.examined,
        updated = summary.updated,
        failed = summary.failed,
        "back-test outcomes filled"
    );
    Ok(summary)
}
