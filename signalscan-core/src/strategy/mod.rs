//! Strategy families and their parameters.
//!
//! A strategy is a tagged `StrategyConfig` validated at construction. The
//! config decides the strategy name written on every result, how much
//! history the family needs, and which window policy the caller applies
//! before adjustment.

pub mod constants;
pub mod factory;
pub mod policy;

pub use constants::ScanConstants;
pub use factory::create_signal;
pub use policy::WindowPolicy;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::adjust::MIN_WINDOW;
use crate::domain::Direction;
use crate::error::ScanError;
use crate::indicators::{KdjParams, MacdParams};

/// Strategy family tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyFamily {
    Ma,
    Macd,
    MacdKdj,
    MaMacd,
    #[serde(rename = "halfboot")]
    HalfBoot,
}

impl StrategyFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyFamily::Ma => "ma",
            StrategyFamily::Macd => "macd",
            StrategyFamily::MacdKdj => "macd_kdj",
            StrategyFamily::MaMacd => "ma_macd",
            StrategyFamily::HalfBoot => "halfboot",
        }
    }
}

impl fmt::Display for StrategyFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_fastk() -> usize {
    9
}

fn default_slowk() -> usize {
    3
}

fn default_slowd() -> usize {
    3
}

fn default_macd_short() -> usize {
    12
}

fn default_macd_long() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

/// Parameters of one strategy, tagged by family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// SMA crossover: `diff_ma` turns positive.
    Ma {
        short_window: usize,
        long_window: usize,
    },

    /// MACD histogram zero-line crossing, gated by the year line.
    Macd {
        short_span: usize,
        long_span: usize,
        signal_span: usize,
    },

    /// KDJ %K/%D golden cross while the MACD histogram stays positive.
    MacdKdj {
        short_span: usize,
        long_span: usize,
        signal_span: usize,
        #[serde(default = "default_fastk")]
        fastk: usize,
        #[serde(default = "default_slowk")]
        slowk: usize,
        #[serde(default = "default_slowd")]
        slowd: usize,
    },

    /// SMA crossover confirmed by the MACD line configuration.
    MaMacd {
        short_window: usize,
        long_window: usize,
        #[serde(default = "default_macd_short")]
        short_span: usize,
        #[serde(default = "default_macd_long")]
        long_span: usize,
        #[serde(default = "default_macd_signal")]
        signal_span: usize,
    },

    /// SMA crossover above a half-year line that held recently.
    #[serde(rename = "halfboot")]
    HalfBoot {
        short_window: usize,
        long_window: usize,
    },
}

impl StrategyConfig {
    pub fn ma(short_window: usize, long_window: usize) -> Self {
        StrategyConfig::Ma {
            short_window,
            long_window,
        }
    }

    pub fn macd(short_span: usize, long_span: usize, signal_span: usize) -> Self {
        StrategyConfig::Macd {
            short_span,
            long_span,
            signal_span,
        }
    }

    pub fn macd_kdj(short_span: usize, long_span: usize, signal_span: usize) -> Self {
        StrategyConfig::MacdKdj {
            short_span,
            long_span,
            signal_span,
            fastk: default_fastk(),
            slowk: default_slowk(),
            slowd: default_slowd(),
        }
    }

    pub fn ma_macd(short_window: usize, long_window: usize) -> Self {
        StrategyConfig::MaMacd {
            short_window,
            long_window,
            short_span: default_macd_short(),
            long_span: default_macd_long(),
            signal_span: default_macd_signal(),
        }
    }

    pub fn halfboot(short_window: usize, long_window: usize) -> Self {
        StrategyConfig::HalfBoot {
            short_window,
            long_window,
        }
    }

    pub fn family(&self) -> StrategyFamily {
        match self {
            StrategyConfig::Ma { .. } => StrategyFamily::Ma,
            StrategyConfig::Macd { .. } => StrategyFamily::Macd,
            StrategyConfig::MacdKdj { .. } => StrategyFamily::MacdKdj,
            StrategyConfig::MaMacd { .. } => StrategyFamily::MaMacd,
            StrategyConfig::HalfBoot { .. } => StrategyFamily::HalfBoot,
        }
    }

    /// MACD spans, for the families that use them.
    pub fn macd_params(&self) -> Option<MacdParams> {
        match *self {
            StrategyConfig::Macd {
                short_span,
                long_span,
                signal_span,
            }
            | StrategyConfig::MacdKdj {
                short_span,
                long_span,
                signal_span,
                ..
            }
            | StrategyConfig::MaMacd {
                short_span,
                long_span,
                signal_span,
                ..
            } => Some(MacdParams::new(short_span, long_span, signal_span)),
            _ => None,
        }
    }

    /// KDJ periods, for the KDJ family.
    pub fn kdj_params(&self) -> Option<KdjParams> {
        match *self {
            StrategyConfig::MacdKdj {
                fastk, slowk, slowd, ..
            } => Some(KdjParams::new(fastk, slowk, slowd)),
            _ => None,
        }
    }

    /// (short, long) SMA windows, for the MA-crossover families.
    pub fn ma_windows(&self) -> Option<(usize, usize)> {
        match *self {
            StrategyConfig::Ma {
                short_window,
                long_window,
            }
            | StrategyConfig::MaMacd {
                short_window,
                long_window,
                ..
            }
            | StrategyConfig::HalfBoot {
                short_window,
                long_window,
            } => Some((short_window, long_window)),
            _ => None,
        }
    }

    /// Direction fixed by the parameters, if the family has one.
    ///
    /// The MACD family derives its direction from the crossing itself.
    pub fn fixed_direction(&self) -> Option<Direction> {
        match self {
            StrategyConfig::Macd { .. } => None,
            StrategyConfig::MacdKdj { .. } => Some(Direction::Long),
            _ => self.ma_windows().map(|(s, l)| Direction::from_params(s, l)),
        }
    }

    /// Directions this strategy can emit.
    pub fn directions(&self) -> Vec<Direction> {
        match self.fixed_direction() {
            Some(direction) => vec![direction],
            None => vec![Direction::Long, Direction::Short],
        }
    }

    pub fn validate(&self) -> Result<(), ScanError> {
        if let Some((short, long)) = self.ma_windows() {
            if short == 0 || long == 0 {
                return Err(ScanError::InvalidConfig(format!(
                    "{}: moving-average windows must be >= 1",
                    self.family()
                )));
            }
            if short == long {
                return Err(ScanError::InvalidConfig(format!(
                    "{}: short and long windows are both {short}",
                    self.family()
                )));
            }
        }
        if let Some(p) = self.macd_params() {
            if p.short_span == 0 || p.long_span == 0 || p.signal_span == 0 {
                return Err(ScanError::InvalidConfig(format!(
                    "{}: MACD spans must be >= 1",
                    self.family()
                )));
            }
            if p.short_span >= p.long_span {
                return Err(ScanError::InvalidConfig(format!(
                    "{}: short span {} must be below long span {}",
                    self.family(),
                    p.short_span,
                    p.long_span
                )));
            }
        }
        if let Some(k) = self.kdj_params() {
            if k.fastk == 0 || k.slowk == 0 || k.slowd == 0 {
                return Err(ScanError::InvalidConfig(
                    "macd_kdj: KDJ periods must be >= 1".into(),
                ));
            }
        }
        Ok(())
    }

    /// Name written on results, e.g. `ma_long_5_20` or `macd_short_12_26_9`.
    pub fn strategy_name(&self, direction: Direction) -> String {
        match *self {
            StrategyConfig::Ma {
                short_window,
                long_window,
            } => format!("ma_{direction}_{short_window}_{long_window}"),
            StrategyConfig::Macd {
                short_span,
                long_span,
                signal_span,
            } => format!("macd_{direction}_{short_span}_{long_span}_{signal_span}"),
            StrategyConfig::MacdKdj {
                short_span,
                long_span,
                signal_span,
                ..
            } => format!("macd_kdj_long_{short_span}_{long_span}_{signal_span}"),
            StrategyConfig::MaMacd {
                short_window,
                long_window,
                ..
            } => format!("ma_macd_{direction}_{short_window}_{long_window}"),
            StrategyConfig::HalfBoot {
                short_window,
                long_window,
            } => format!("halfboot_{direction}_{short_window}_{long_window}"),
        }
    }

    /// Direction-free label used in reports and logs, e.g. `macd_12_26_9`.
    pub fn label(&self) -> String {
        match *self {
            StrategyConfig::Macd {
                short_span,
                long_span,
                signal_span,
            }
            | StrategyConfig::MacdKdj {
                short_span,
                long_span,
                signal_span,
                ..
            } => format!(
                "{}_{short_span}_{long_span}_{signal_span}",
                self.family()
            ),
            _ => match self.ma_windows() {
                Some((s, l)) => format!("{}_{s}_{l}", self.family()),
                None => self.family().to_string(),
            },
        }
    }

    /// Rows the adjusted window must hold before detection runs.
    pub fn required_history(&self, constants: &ScanConstants) -> usize {
        let margin = constants.history_margin;
        let required = match *self {
            StrategyConfig::Ma {
                short_window,
                long_window,
            } => short_window.max(long_window) + margin,
            StrategyConfig::Macd { long_span, .. } => long_span.max(constants.year_window) + margin,
            StrategyConfig::MacdKdj {
                long_span,
                signal_span,
                fastk,
                slowk,
                slowd,
                ..
            } => (long_span + signal_span).max(fastk + slowk + slowd) + margin,
            StrategyConfig::MaMacd {
                short_window,
                long_window,
                long_span,
                ..
            } => short_window
                .max(long_window)
                .max(long_span)
                .max(constants.year_window)
                + margin,
            StrategyConfig::HalfBoot {
                short_window,
                long_window,
            } => {
                let base = short_window.max(long_window) + margin;
                if base < constants.half_year_window {
                    base + constants.half_year_window
                } else {
                    base
                }
            }
        };
        required.max(MIN_WINDOW)
    }

    /// Bars to request from storage, leaving slack for days the window
    /// policy drops.
    pub fn fetch_limit(&self, constants: &ScanConstants) -> usize {
        let limit = self.required_history(constants) + constants.history_margin;
        match self {
            StrategyConfig::MacdKdj { .. } => limit.max(constants.ema_window),
            _ => limit,
        }
    }

    /// Window policy each family applies before adjustment.
    pub fn default_window_policy(&self, constants: &ScanConstants) -> WindowPolicy {
        let cap = Some(constants.volatility_cap_pct);
        match self {
            StrategyConfig::Ma { .. } => WindowPolicy {
                drop_halted_days: true,
                skip_halted_latest: true,
                drop_zero_close: true,
                max_latest_change_pct: None,
            },
            StrategyConfig::Macd { .. }
            | StrategyConfig::MacdKdj { .. }
            | StrategyConfig::MaMacd { .. } => WindowPolicy {
                drop_zero_close: true,
                max_latest_change_pct: cap,
                ..Default::default()
            },
            StrategyConfig::HalfBoot { .. } => WindowPolicy {
                drop_zero_close: true,
                ..Default::default()
            },
        }
    }
}
