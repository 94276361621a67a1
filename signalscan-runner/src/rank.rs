//! Price-change ranking between two trading dates.

use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use signalscan_core::scan::DEFAULT_PAGE_SIZE;
use signalscan_core::{Storage, StorageError};

pub const DEFAULT_TOP: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceChange {
    pub stock_id: String,
    pub stock_name: String,
    pub start_price: f64,
    pub end_price: f64,
    /// `(end - start) / start`, rounded to 4 places.
    pub increase_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRanking {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Stocks that qualified before truncation to `top`.
    pub total: usize,
    pub entries: Vec<PriceChange>,
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Close on exactly `date`, if the stock has a bar then.
fn close_on<S: Storage + ?Sized>(
    store: &S,
    stock_id: &str,
    date: NaiveDate,
) -> Result<Option<f64>, StorageError> {
    Ok(store
        .fetch_bars(stock_id, date, 1)?
        .first()
        .filter(|b| b.date == date)
        .map(|b| b.close))
}

/// Rank non-negative price changes from `start` to `end`, highest first.
///
/// Stocks without a bar on either date, or with a zero price on either date,
/// are left out.
pub fn rank_price_changes<S: Storage + ?Sized>(
    store: &S,
    start: NaiveDate,
    end: NaiveDate,
    top: usize,
) -> Result<PriceRanking, StorageError> {
    let mut entries = Vec::new();
    let mut offset = 0;
    loop {
        let page = store.fetch_universe(offset, DEFAULT_PAGE_SIZE)?;
        for stock in &page {
            let (Some(start_price), Some(end_price)) = (
                close_on(store, &stock.id, start)?,
                close_on(store, &stock.id, end)?,
            ) else {
                continue;
            };
            if start_price == 0.0 || end_price == 0.0 {
                continue;
            }
            let diff = end_price - start_price;
            if diff < 0.0 {
                continue;
            }
            entries.push(PriceChange {
                stock_id: stock.id.clone(),
                stock_name: stock.name.clone(),
                start_price,
                end_price,
                increase_rate: round4(diff / start_price),
            });
        }
        if page.len() < DEFAULT_PAGE_SIZE {
            break;
        }
        offset += page.len();
    }

    entries.sort_by(|a, b| {
        b.increase_rate
            .total_cmp(&a.increase_rate)
            .then_with(|| a.stock_id.cmp(&b.stock_id))
    });
    let total = entries.len();
    entries.truncate(top);
    tracing::debug!(%start, %end, total, "price changes ranked");

    Ok(PriceRanking {
        start,
        end,
        total,
        entries,
    })
}

impl PriceRanking {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} -> {}: {} stocks qualified",
            self.start, self.end, self.total
        );
        let _ = writeln!(
            out,
            "{:<10}{:<12}{:>12}{:>12}{:>15}",
            "stock", "name", "start", "end", "increase_rate"
        );
        for e in &self.entries {
            let _ = writeln!(
                out,
                "{:<10}{:<12}{:>12.2}{:>12.2}{:>15.4}",
                e.stock_id, e.stock_name, e.start_price, e.end_price, e.increase_rate
            );
        }
        out
    }
}
