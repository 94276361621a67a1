//! SignalScan CLI: scan, back-test, statistics and ranking commands.
//!
//! Commands:
//! - `scan`: run strategies for one date (batch, or real-time with quotes)
//! - `backtest`: fill 1/3/5-day outcomes of stored signals
//! - `stats`: per-date success statistics for one strategy
//! - `rank`: price-change ranking between two dates

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use signalscan_core::{ScanMode, StrategyConfig};
use signalscan_runner::{
    build_orchestrator, fill_outcomes, load_quotes, rank_price_changes, render_report,
    run_strategies, strategy_statistics, FileStore, ScanSettings, StrategyEntry,
    DEFAULT_STAT_DATES, DEFAULT_TOP,
};

#[derive(Parser)]
#[command(
    name = "signalscan",
    about = "SignalScan CLI: crossover-signal screening over daily equity bars"
)]
struct Cli {
    /// Settings file. Missing file means defaults.
    #[arg(long, global = true, default_value = "signalscan.toml")]
    config: PathBuf,

    /// Data directory; overrides `data_dir` from the settings file.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum FamilyArg {
    Ma,
    Macd,
    #[value(name = "macd_kdj")]
    MacdKdj,
    #[value(name = "ma_macd")]
    MaMacd,
    Halfboot,
}

#[derive(Subcommand)]
enum Commands {
    /// Run strategies for one date.
    Scan {
        /// TOML file whose [[strategies]] replace the configured ones.
        #[arg(long, conflicts_with = "family")]
        strategy_file: Option<PathBuf>,

        /// Run a single strategy of this family instead of the configured ones.
        #[arg(long, value_enum)]
        family: Option<FamilyArg>,

        /// Short window (ma, ma_macd, halfboot) or short EMA span (macd, macd_kdj).
        #[arg(long)]
        short: Option<usize>,

        /// Long window or long EMA span.
        #[arg(long)]
        long: Option<usize>,

        /// Signal span for macd and macd_kdj.
        #[arg(long)]
        signal: Option<usize>,

        /// Evaluation date (YYYY-MM-DD). Defaults to the latest stored trading
        /// date in batch mode and today in real-time mode.
        #[arg(long)]
        date: Option<String>,

        /// Preview signals from same-day quotes without storing them.
        #[arg(long, default_value_t = false)]
        real_time: bool,

        /// Quotes CSV (same columns as bars.csv) for real-time mode.
        #[arg(long, requires = "real_time")]
        quotes: Option<PathBuf>,

        /// Universe page size; overrides the settings file.
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Fill back-test outcomes of stored signals.
    Backtest {
        /// Only results of this strategy name.
        #[arg(long)]
        strategy: Option<String>,
    },
    /// Success statistics for one strategy name (e.g. ma_long_5_20).
    Stats {
        #[arg(long)]
        strategy: String,

        /// Number of most recent signal dates.
        #[arg(long, default_value_t = DEFAULT_STAT_DATES)]
        count: usize,
    },
    /// Rank price changes between two dates.
    Rank {
        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: String,

        /// End date (YYYY-MM-DD).
        #[arg(long)]
        end: String,

        #[arg(long, default_value_t = DEFAULT_TOP)]
        top: usize,
    },
}

fn main() -> Result<()> {
    init_tracing();
    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = ScanSettings::from_file(&cli.config)
        .with_context(|| format!("failed to load settings from {}", cli.config.display()))?;
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }
    tracing::debug!(
        data_dir = %settings.data_dir.display(),
        strategies = settings.strategies.len(),
        "settings loaded"
    );

    match cli.command {
        Commands::Scan {
            strategy_file,
            family,
            short,
            long,
            signal,
            date,
            real_time,
            quotes,
            page_size,
        } => {
            if let Some(page_size) = page_size {
                settings.page_size = page_size;
            }
            if let Some(path) = strategy_file {
                settings.strategies = ScanSettings::from_required_file(&path)
                    .with_context(|| format!("failed to load strategies from {}", path.display()))?
                    .strategies;
            }
            if let Some(family) = family {
                settings.strategies = vec![family_config(family, short, long, signal)?.into()];
            }
            run_scan(&settings, date.as_deref(), real_time, quotes)
        }
        Commands::Backtest { strategy } => run_backtest(&settings, strategy.as_deref()),
        Commands::Stats { strategy, count } => run_stats(&settings, &strategy, count),
        Commands::Rank { start, end, top } => run_rank(&settings, &start, &end, top),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}

fn open_store(settings: &ScanSettings) -> Result<FileStore> {
    FileStore::open(&settings.data_dir)
        .with_context(|| format!("failed to open data directory {}", settings.data_dir.display()))
}

fn family_config(
    family: FamilyArg,
    short: Option<usize>,
    long: Option<usize>,
    signal: Option<usize>,
) -> Result<StrategyConfig> {
    let windows = || match (short, long) {
        (Some(s), Some(l)) => Ok((s, l)),
        _ => bail!("--short and --long are required for this family"),
    };
    let spans = || (short.unwrap_or(12), long.unwrap_or(26), signal.unwrap_or(9));

    let config = match family {
        FamilyArg::Ma => {
            let (s, l) = windows()?;
            StrategyConfig::ma(s, l)
        }
        FamilyArg::MaMacd => {
            let (s, l) = windows()?;
            StrategyConfig::ma_macd(s, l)
        }
        FamilyArg::Halfboot => {
            let (s, l) = windows()?;
            StrategyConfig::halfboot(s, l)
        }
        FamilyArg::Macd => {
            let (s, l, g) = spans();
            StrategyConfig::macd(s, l, g)
        }
        FamilyArg::MacdKdj => {
            let (s, l, g) = spans();
            StrategyConfig::macd_kdj(s, l, g)
        }
    };
    config.validate()?;
    Ok(config)
}

fn run_scan(
    settings: &ScanSettings,
    date: Option<&str>,
    real_time: bool,
    quotes: Option<PathBuf>,
) -> Result<()> {
    let store = open_store(settings)?;

    let date = match date {
        Some(s) => parse_date(s)?,
        None if real_time => chrono::Local::now().date_naive(),
        None => match store.latest_trading_date() {
            Some(d) => d,
            None => bail!("no bars in {}; pass --date", settings.data_dir.display()),
        },
    };

    let mode = if real_time {
        let quotes = match quotes {
            Some(path) => load_quotes(&path)
                .with_context(|| format!("failed to load quotes from {}", path.display()))?,
            None => Default::default(),
        };
        ScanMode::RealTime { quotes }
    } else {
        ScanMode::Batch
    };

    let strategies: &[StrategyEntry] = &settings.strategies;
    let mut orchestrator = build_orchestrator(store, settings);
    let reports = run_strategies(&mut orchestrator, strategies, date, &mode)?;
    for report in &reports {
        print!("{}", render_report(report));
    }
    Ok(())
}

fn run_backtest(settings: &ScanSettings, strategy: Option<&str>) -> Result<()> {
    let mut store = open_store(settings)?;
    let summary = fill_outcomes(&mut store, strategy)?;
    println!(
        "examined {}, updated {}, failed {}",
        summary.examined, summary.updated, summary.failed
    );
    Ok(())
}

fn run_stats(settings: &ScanSettings, strategy: &str, count: usize) -> Result<()> {
    let store = open_store(settings)?;
    let stats = strategy_statistics(&store, strategy, count)?;
    print!("{}", stats.render());
    Ok(())
}

fn run_rank(settings: &ScanSettings, start: &str, end: &str, top: usize) -> Result<()> {
    let store = open_store(settings)?;
    let ranking = rank_price_changes(&store, parse_date(start)?, parse_date(end)?, top)?;
    print!("{}", ranking.render());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_scan_with_family() {
        let cli = Cli::try_parse_from([
            "signalscan", "scan", "--family", "ma", "--short", "5", "--long", "20", "--date",
            "2024-09-13",
        ])
        .unwrap();
        match cli.command {
            Commands::Scan {
                family: Some(FamilyArg::Ma),
                short: Some(5),
                long: Some(20),
                ..
            } => {}
            _ => panic!("unexpected parse"),
        }
    }

    #[test]
    fn quotes_require_real_time() {
        assert!(Cli::try_parse_from(["signalscan", "scan", "--quotes", "q.csv"]).is_err());
    }

    #[test]
    fn missing_strategy_file_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let cli = Cli::try_parse_from([
            "signalscan",
            "--config",
            dir.join("absent.toml").to_str().unwrap(),
            "scan",
            "--strategy-file",
            dir.join("strategies.toml").to_str().unwrap(),
        ])
        .unwrap();
        let err = run(cli).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load strategies from"), "{err:#}");
    }

    #[test]
    fn family_defaults_macd_spans() {
        let config = family_config(FamilyArg::MacdKdj, None, None, None).unwrap();
        assert_eq!(config, StrategyConfig::macd_kdj(12, 26, 9));
    }

    #[test]
    fn ma_family_needs_windows() {
        assert!(family_config(FamilyArg::Ma, Some(5), None, None).is_err());
        assert!(family_config(FamilyArg::Halfboot, Some(10), Some(10), None).is_err());
    }
}
