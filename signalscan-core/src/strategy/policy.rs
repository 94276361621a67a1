//! Window policy: which raw bars a family sees before adjustment.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

use crate::domain::DailyBar;

/// Caller-side filtering applied to a most-recent-first bar window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowPolicy {
    /// Drop halted days (zero change and zero turnover) from the window.
    pub drop_halted_days: bool,
    /// Skip the stock when its latest bar is a halted day.
    pub skip_halted_latest: bool,
    /// Drop bars with a zero close.
    pub drop_zero_close: bool,
    /// Skip the stock when its latest `change_pct` exceeds this value.
    pub max_latest_change_pct: Option<f64>,
}

impl WindowPolicy {
    /// Filter a window. `None` means the stock is screened out entirely.
    pub fn apply<'a, B: Borrow<DailyBar>>(&self, window: &'a [B]) -> Option<Vec<&'a DailyBar>> {
        if let Some(latest) = window.first().map(<B as Borrow<DailyBar>>::borrow) {
            if self.skip_halted_latest && latest.is_halted() {
                return None;
            }
            if let Some(cap) = self.max_latest_change_pct {
                if latest.change_pct > cap {
                    return None;
                }
            }
        }

        Some(
            window
                .iter()
                .map(<B as Borrow<DailyBar>>::borrow)
                .filter(|bar| !(self.drop_halted_days && bar.is_halted()))
                .filter(|bar| !(self.drop_zero_close && bar.close == 0.0))
                .collect(),
        )
    }
}
