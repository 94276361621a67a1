//! Factory: converts a `StrategyConfig` into its runtime crossover detector.

use crate::error::ScanError;
use crate::indicators::{KdjParams, MacdParams};
use crate::signal::{
    CrossoverSignal, HalfBootCross, MaCross, MaMacdCross, MacdCross, MacdKdjCross,
};

use super::{ScanConstants, StrategyConfig};

/// Validate `config` and build its detector.
pub fn create_signal(
    config: &StrategyConfig,
    constants: &ScanConstants,
) -> Result<Box<dyn CrossoverSignal>, ScanError> {
    config.validate()?;
    constants.validate()?;

    let signal: Box<dyn CrossoverSignal> = match *config {
        StrategyConfig::Ma {
            short_window,
            long_window,
        } => Box::new(MaCross::new(short_window, long_window)),
        StrategyConfig::Macd {
            short_span,
            long_span,
            signal_span,
        } => Box::new(MacdCross::new(
            MacdParams::new(short_span, long_span, signal_span),
            constants.year_window,
        )),
        StrategyConfig::MacdKdj {
            short_span,
            long_span,
            signal_span,
            fastk,
            slowk,
            slowd,
        } => Box::new(MacdKdjCross::new(
            MacdParams::new(short_span, long_span, signal_span),
            KdjParams::new(fastk, slowk, slowd),
        )),
        StrategyConfig::MaMacd {
            short_window,
            long_window,
            short_span,
            long_span,
            signal_span,
        } => Box::new(MaMacdCross::new(
            short_window,
            long_window,
            MacdParams::new(short_span, long_span, signal_span),
            constants.year_window,
        )),
        StrategyConfig::HalfBoot {
            short_window,
            long_window,
        } => Box::new(HalfBootCross::new(
            short_window,
            long_window,
            constants.half_year_window,
            constants.inspect_window,
        )),
    };
    Ok(signal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_family_builds() {
        let c = ScanConstants::default();
        let configs = [
            StrategyConfig::ma(5, 20),
            StrategyConfig::macd(12, 26, 9),
            StrategyConfig::macd_kdj(12, 26, 9),
            StrategyConfig::ma_macd(5, 10),
            StrategyConfig::halfboot(5, 10),
        ];
        for cfg in configs {
            let signal = create_signal(&cfg, &c).unwrap();
            assert_eq!(signal.name(), cfg.family().as_str());
            assert!(!signal.indicators().is_empty());
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = create_signal(&StrategyConfig::ma(7, 7), &ScanConstants::default()).unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig(_)));
    }
}
