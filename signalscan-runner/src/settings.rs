//! Scan settings loaded from `signalscan.toml`.
//!
//! Every key is optional. A missing file yields the defaults; the CLI then
//! overrides individual fields from its flags.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use signalscan_core::scan::DEFAULT_PAGE_SIZE;
use signalscan_core::{ScanConstants, StrategyConfig, WindowPolicy};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// One configured strategy plus an optional window policy override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyEntry {
    #[serde(flatten)]
    pub config: StrategyConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowPolicy>,
}

impl From<StrategyConfig> for StrategyEntry {
    fn from(config: StrategyConfig) -> Self {
        Self {
            config,
            window: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Directory holding `stocks.csv`, `bars.csv` and `results.jsonl`.
    pub data_dir: PathBuf,
    pub page_size: usize,
    /// Auditor firm names (substring match) whose clients are never scanned.
    pub excluded_auditors: Vec<String>,
    pub constants: ScanConstants,
    pub strategies: Vec<StrategyEntry>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            page_size: DEFAULT_PAGE_SIZE,
            excluded_auditors: Vec::new(),
            constants: ScanConstants::default(),
            strategies: Vec::new(),
        }
    }
}

impl ScanSettings {
    /// Load settings from a TOML file. A missing file gives the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match Self::from_required_file(path) {
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Load settings from a TOML file the user named explicitly. A missing
    /// file is a read error.
    pub fn from_required_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate settings from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(format!("serialize: {e}")))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be >= 1".into()));
        }
        self.constants
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        for entry in &self.strategies {
            entry
                .config
                .validate()
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
data_dir = "/var/lib/signalscan"
page_size = 50
excluded_auditors = ["瑞华会计师"]

[constants]
year_window = 200

[[strategies]]
family = "macd"
short_span = 12
long_span = 26
signal_span = 9

[[strategies]]
family = "ma"
short_window = 5
long_window = 20

[strategies.window]
drop_halted_days = true
skip_halted_latest = true

[[strategies]]
family = "macd_kdj"
short_span = 12
long_span = 26
signal_span = 9

[[strategies]]
family = "halfboot"
short_window = 5
long_window = 10
"#;

    #[test]
    fn parses_full_file() {
        let settings = ScanSettings::from_toml(SAMPLE).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("/var/lib/signalscan"));
        assert_eq!(settings.page_size, 50);
        assert_eq!(settings.excluded_auditors, vec!["瑞华会计师".to_string()]);
        assert_eq!(settings.constants.year_window, 200);
        assert_eq!(settings.constants.half_year_window, 120);

        assert_eq!(settings.strategies.len(), 4);
        assert_eq!(settings.strategies[0].config, StrategyConfig::macd(12, 26, 9));
        assert_eq!(settings.strategies[0].window, None);
        assert_eq!(settings.strategies[1].config, StrategyConfig::ma(5, 20));
        let window = settings.strategies[1].window.unwrap();
        assert!(window.drop_halted_days && window.skip_halted_latest);
        assert!(!window.drop_zero_close);
        assert_eq!(
            settings.strategies[2].config,
            StrategyConfig::macd_kdj(12, 26, 9)
        );
        assert_eq!(settings.strategies[3].config, StrategyConfig::halfboot(5, 10));
    }

    #[test]
    fn empty_file_is_defaults() {
        let settings = ScanSettings::from_toml("").unwrap();
        assert_eq!(settings, ScanSettings::default());
    }

    #[test]
    fn missing_file_is_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ScanSettings::from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn required_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strategies.toml");
        let err = ScanSettings::from_required_file(&path).unwrap_err();
        assert!(
            matches!(&err, ConfigError::Read { source, .. } if source.kind() == io::ErrorKind::NotFound),
            "got {err:?}"
        );

        std::fs::write(&path, "[[strategies]]\nfamily = \"ma\"\nshort_window = 5\nlong_window = 20\n")
            .unwrap();
        let settings = ScanSettings::from_required_file(&path).unwrap();
        assert_eq!(settings.strategies.len(), 1);
    }

    #[test]
    fn invalid_strategy_is_rejected() {
        let err = ScanSettings::from_toml(
            "[[strategies]]\nfamily = \"ma\"\nshort_window = 5\nlong_window = 5\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err:?}");
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(matches!(
            ScanSettings::from_toml("page_size = 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn unknown_family_is_a_parse_error() {
        let err = ScanSettings::from_toml("[[strategies]]\nfamily = \"rsi\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let settings = ScanSettings::from_toml(SAMPLE).unwrap();
        let text = settings.to_toml().unwrap();
        assert_eq!(ScanSettings::from_toml(&text).unwrap(), settings);
    }
}
