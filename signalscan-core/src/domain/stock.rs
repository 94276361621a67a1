//! Stock: an entry in the investable universe.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: String,
    pub name: String,
    /// Accounting firm that audits the company, used to exclude stocks.
    #[serde(default)]
    pub auditor: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

impl Stock {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            auditor: None,
            industry: None,
        }
    }

    /// True if the auditor name contains any of the excluded firm names.
    pub fn is_audited_by_any(&self, firms: &[String]) -> bool {
        match self.auditor.as_deref() {
            Some(auditor) => firms.iter().any(|firm| auditor.contains(firm.as_str())),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excluded_auditor_matches_by_substring() {
        let mut stock = Stock::new("000001", "平安银行");
        stock.auditor = Some("瑞华会计师事务所(特殊普通合伙)".into());
        assert!(stock.is_audited_by_any(&["瑞华会计师".to_string()]));
        assert!(!stock.is_audited_by_any(&["普华永道".to_string()]));
    }

    #[test]
    fn missing_auditor_is_never_excluded() {
        let stock = Stock::new("000001", "平安银行");
        assert!(!stock.is_audited_by_any(&["瑞华会计师".to_string()]));
    }
}
