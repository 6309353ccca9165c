//! Instrument universe — sector-organized ticker lists, stored as TOML.

use super::provider::DataError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// The instrument universe the batch jobs walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Universe {
    pub sectors: BTreeMap<String, Vec<String>>,
}

impl Universe {
    /// Load a universe from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DataError::Universe(format!("read {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Parse a universe from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, DataError> {
        toml::from_str(content).map_err(|e| DataError::Universe(format!("parse TOML: {e}")))
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String, DataError> {
        toml::to_string_pretty(self).map_err(|e| DataError::Universe(format!("serialize: {e}")))
    }

    /// All tickers across all sectors, alphabetical within sector order.
    pub fn all_tickers(&self) -> Vec<&str> {
        self.sectors
            .values()
            .flat_map(|tickers| tickers.iter().map(|t| t.as_str()))
            .collect()
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.sectors.values().any(|v| v.iter().any(|t| t == ticker))
    }

    pub fn ticker_count(&self) -> usize {
        self.sectors.values().map(|v| v.len()).sum()
    }

    /// Built-in default US equity universe.
    pub fn default_us() -> Self {
        fn owned(tickers: &[&str]) -> Vec<String> {
            tickers.iter().map(|t| t.to_string()).collect()
        }

        let mut sectors = BTreeMap::new();
        sectors.insert(
            "Technology".into(),
            owned(&["AAPL", "ADBE", "ADI", "ADSK", "AKAM", "AMAT", "CSCO", "IBM", "INTC", "MSFT"]),
        );
        sectors.insert(
            "Healthcare".into(),
            owned(&["ABBV", "ABT", "AMGN", "BAX", "BIIB", "BMY", "JNJ", "LLY", "MRK", "PFE"]),
        );
        sectors.insert(
            "Finance".into(),
            owned(&["AXP", "BAC", "BK", "BLK", "C", "GS", "JPM", "MS", "USB", "WFC"]),
        );
        sectors.insert(
            "Energy".into(),
            owned(&["APA", "COP", "CVX", "EOG", "HAL", "OXY", "SLB", "XOM"]),
        );
        sectors.insert(
            "Consumer".into(),
            owned(&["CL", "COST", "HD", "KO", "MCD", "NKE", "PEP", "PG", "SBUX", "WMT"]),
        );
        sectors.insert(
            "Industrial".into(),
            owned(&["BA", "CAT", "DE", "EMR", "GD", "GE", "HON", "LMT", "MMM", "UNP"]),
        );
        Self { sectors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_universe_is_populated() {
        let u = Universe::default_us();
        assert!(u.contains("AAPL"));
        assert!(u.contains("XOM"));
        assert!(u.ticker_count() > 40);
    }

    #[test]
    fn toml_roundtrip() {
        let u = Universe::default_us();
        let parsed = Universe::from_toml(&u.to_toml().unwrap()).unwrap();
        assert_eq!(u.ticker_count(), parsed.ticker_count());
        assert!(parsed.contains("JPM"));
    }

    #[test]
    fn all_tickers_flattens_sectors() {
        let u = Universe::from_toml(
            r#"
            [sectors]
            ETFs = ["SPY", "QQQ"]
            Tech = ["AAPL"]
            "#,
        )
        .unwrap();
        let all = u.all_tickers();
        assert_eq!(all.len(), 3);
        assert!(all.contains(&"SPY"));
        assert!(all.contains(&"AAPL"));
    }

    #[test]
    fn malformed_toml_is_a_universe_error() {
        let err = Universe::from_toml("sectors = 3").unwrap_err();
        assert!(matches!(err, DataError::Universe(_)));
    }
}
