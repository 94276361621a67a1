//! FileStore: a directory of CSV and JSONL files behind the storage traits.
//!
//! Layout:
//! - `stocks.csv`: id,name,auditor,industry
//! - `bars.csv`: one `DailyBar` per row
//! - `results.jsonl`: one `StrategyResult` per line, append-only except for
//!   outcome updates, which rewrite the file
//!
//! Files are read eagerly into memory on `open`. Missing files are empty.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

use signalscan_core::{DailyBar, Stock, Storage, StorageError, StrategyResult};

use crate::store::ResultStore;

pub const STOCKS_FILE: &str = "stocks.csv";
pub const BARS_FILE: &str = "bars.csv";
pub const RESULTS_FILE: &str = "results.jsonl";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<StoreError> for StorageError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Io { source, .. } => StorageError::Io(source),
            other => StorageError::Corrupt(other.to_string()),
        }
    }
}

#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    stocks: Vec<Stock>,
    /// Per stock, ascending by date.
    bars: BTreeMap<String, Vec<DailyBar>>,
    trading_dates: BTreeSet<NaiveDate>,
    results: Vec<StrategyResult>,
}

impl FileStore {
    /// Load every file under `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        let stocks: Vec<Stock> = read_csv(&dir.join(STOCKS_FILE))?;

        let mut bars: BTreeMap<String, Vec<DailyBar>> = BTreeMap::new();
        let mut trading_dates = BTreeSet::new();
        for bar in read_csv::<DailyBar>(&dir.join(BARS_FILE))? {
            trading_dates.insert(bar.date);
            let series = bars.entry(bar.stock_id.clone()).or_default();
            match series.binary_search_by_key(&bar.date, |b| b.date) {
                Ok(i) => series[i] = bar,
                Err(i) => series.insert(i, bar),
            }
        }

        let results = read_jsonl(&dir.join(RESULTS_FILE))?;
        debug!(
            dir = %dir.display(),
            stocks = stocks.len(),
            series = bars.len(),
            results = results.len(),
            "file store opened"
        );
        Ok(Self {
            dir,
            stocks,
            bars,
            trading_dates,
            results,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn stocks(&self) -> &[Stock] {
        &self.stocks
    }

    /// Most recent date with any recorded bar.
    pub fn latest_trading_date(&self) -> Option<NaiveDate> {
        self.trading_dates.last().copied()
    }

    /// Bars of one stock, ascending by date.
    pub fn bars_for(&self, stock_id: &str) -> &[DailyBar] {
        self.bars.get(stock_id).map(Vec::as_slice).unwrap_or_default()
    }

    fn results_path(&self) -> PathBuf {
        self.dir.join(RESULTS_FILE)
    }

    fn append_result(&self, result: &StrategyResult) -> Result<(), StoreError> {
        let path = self.results_path();
        let json = serde_json::to_string(result).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(io_err)?;
        writeln!(file, "{json}").map_err(io_err)?;
        file.flush().map_err(io_err)
    }

    /// Rewrite the results file from memory through a temp file.
    fn rewrite_results(&self) -> Result<(), StoreError> {
        let path = self.results_path();
        let tmp = path.with_extension("jsonl.tmp");
        let mut out = String::new();
        for result in &self.results {
            let json = serde_json::to_string(result).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;
            out.push_str(&json);
            out.push('\n');
        }
        fs::write(&tmp, out).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path, source })
    }
}

fn read_csv<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let csv_err = |source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(csv_err)
}

/// Read a JSONL file, skipping malformed lines.
fn read_jsonl(path: &Path) -> Result<Vec<StrategyResult>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::open(path).map_err(io_err)?;
    let mut results = Vec::new();
    for (n, line) in io::BufReader::new(file).lines().enumerate() {
        let line = line.map_err(io_err)?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<StrategyResult>(&line) {
            Ok(result) => results.push(result),
            Err(e) => warn!(path = %path.display(), line = n + 1, error = %e, "skipping malformed result"),
        }
    }
    Ok(results)
}

impl Storage for FileStore {
    fn fetch_universe(&self, offset: usize, limit: usize) -> Result<Vec<Stock>, StorageError> {
        Ok(self.stocks.iter().skip(offset).take(limit).cloned().collect())
    }

    fn fetch_bars(
        &self,
        stock_id: &str,
        as_of: NaiveDate,
        limit: usize,
    ) -> Result<Vec<DailyBar>, StorageError> {
        Ok(self
            .bars_for(stock_id)
            .iter()
            .rev()
            .filter(|b| b.date <= as_of)
            .take(limit)
            .cloned()
            .collect())
    }

    fn bars_exist(&self, date: NaiveDate) -> Result<bool, StorageError> {
        Ok(self.trading_dates.contains(&date))
    }

    fn result_exists(
        &self,
        stock_id: &str,
        strategy_name: &str,
        date: NaiveDate,
    ) -> Result<bool, StorageError> {
        Ok(self.results.iter().any(|r| {
            r.stock_id == stock_id && r.strategy_name == strategy_name && r.date == date
        }))
    }

    fn persist(&mut self, result: &StrategyResult) -> Result<(), StorageError> {
        self.append_result(result)?;
        self.results.push(result.clone());
        Ok(())
    }
}

impl ResultStore for FileStore {
    fn fetch_bars_after(
        &self,
        stock_id: &str,
        after: NaiveDate,
        limit: usize,
    ) -> Result<Vec<DailyBar>, StorageError> {
        Ok(self
            .bars_for(stock_id)
            .iter()
            .filter(|b| b.date > after)
            .take(limit)
            .cloned()
            .collect())
    }

    fn results(&self, strategy_name: Option<&str>) -> Result<Vec<StrategyResult>, StorageError> {
        Ok(self
            .results
            .iter()
            .filter(|r| strategy_name.map_or(true, |name| r.strategy_name == name))
            .cloned()
            .collect())
    }

    fn update_result(&mut self, result: &StrategyResult) -> Result<(), StorageError> {
        let stored = self
            .results
            .iter_mut()
            .find(|r| r.same_key(result))
            .ok_or_else(|| {
                StorageError::NotFound(format!(
                    "{} {} {}",
                    result.stock_id, result.strategy_name, result.date
                ))
            })?;
        *stored = result.clone();
        self.rewrite_results()?;
        Ok(())
    }
}
