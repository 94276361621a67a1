//! Error taxonomy for the scan engine.
//!
//! Errors split into two classes: per-stock errors, which the orchestrator
//! logs and recovers from by skipping the stock, and scan-level errors,
//! which abort the whole scan and surface to the caller.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by a storage collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Errors raised while evaluating a stock or running a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("insufficient history: need {required} bars, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0} is not a trading date (no bars recorded for it)")]
    NotATradingDate(NaiveDate),

    #[error("cannot enumerate the stock universe: {0}")]
    UniverseQuery(#[source] StorageError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("invalid strategy config: {0}")]
    InvalidConfig(String),
}

impl ScanError {
    /// True for errors that abort the whole scan rather than a single stock.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NotATradingDate(_) | Self::UniverseQuery(_) | Self::InvalidConfig(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_stock_errors_are_not_fatal() {
        let insufficient = ScanError::InsufficientHistory {
            required: 30,
            available: 12,
        };
        assert!(!insufficient.is_fatal());
        assert!(!ScanError::InvalidInput("zero reference".into()).is_fatal());
        assert!(!ScanError::Storage(StorageError::Backend("timeout".into())).is_fatal());
    }

    #[test]
    fn scan_level_errors_are_fatal() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        assert!(ScanError::NotATradingDate(date).is_fatal());
        assert!(ScanError::UniverseQuery(StorageError::Backend("down".into())).is_fatal());
    }

    #[test]
    fn insufficient_history_message_names_both_counts() {
        let err = ScanError::InsufficientHistory {
            required: 25,
            available: 20,
        };
        assert_eq!(err.to_string(), "insufficient history: need 25 bars, have 20");
    }
}
