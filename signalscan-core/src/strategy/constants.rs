//! Tunable windows and thresholds shared by every strategy family.

use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Named screening constants. Every field is optional in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConstants {
    /// Extra rows required beyond a family's longest lookback. At least one,
    /// so the row before the current one is past every warm-up.
    pub history_margin: usize,
    /// Year line window (SMA).
    pub year_window: usize,
    /// Half-year line window (SMA).
    pub half_year_window: usize,
    /// Minimum fetch window for EMA/KDJ-based families.
    pub ema_window: usize,
    /// Length of the half-year boot inspection range, counting the current
    /// row. The current row itself is excluded, so `window - 1` rows are read.
    pub inspect_window: usize,
    /// Stocks whose latest change exceeds this percentage are skipped.
    pub volatility_cap_pct: f64,
}

impl Default for ScanConstants {
    fn default() -> Self {
        Self {
            history_margin: 5,
            year_window: 250,
            half_year_window: 120,
            ema_window: 150,
            inspect_window: 30,
            volatility_cap_pct: 9.0,
        }
    }
}

impl ScanConstants {
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.history_margin == 0 {
            return Err(ScanError::InvalidConfig(
                "history_margin must be >= 1".into(),
            ));
        }
        if self.year_window == 0 || self.half_year_window == 0 {
            return Err(ScanError::InvalidConfig(
                "year and half-year windows must be >= 1".into(),
            ));
        }
        if self.inspect_window < 2 {
            return Err(ScanError::InvalidConfig(format!(
                "inspect_window must be >= 2, got {}",
                self.inspect_window
            )));
        }
        if !self.volatility_cap_pct.is_finite() || self.volatility_cap_pct <= 0.0 {
            return Err(ScanError::InvalidConfig(format!(
                "volatility_cap_pct must be positive, got {}",
                self.volatility_cap_pct
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = ScanConstants::default();
        assert_eq!(c.year_window, 250);
        assert_eq!(c.half_year_window, 120);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_input_keeps_other_defaults() {
        let c: ScanConstants = serde_json::from_str(r#"{"year_window": 200}"#).unwrap();
        assert_eq!(c.year_window, 200);
        assert_eq!(c.history_margin, 5);
    }

    #[test]
    fn zero_margin_is_rejected() {
        let c = ScanConstants {
            history_margin: 0,
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(ScanError::InvalidConfig(_))));
    }

    #[test]
    fn zero_cap_is_rejected() {
        let c = ScanConstants {
            volatility_cap_pct: 0.0,
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(ScanError::InvalidConfig(_))));
    }
}
