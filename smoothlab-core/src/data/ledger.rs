//! Listing ledger — first year with data, per instrument.
//!
//! The backward year walk discovers, for each instrument, the earliest
//! calendar year the provider has daily bars for. The ledger persists
//! those spans as CSV keyed by symbol, with an explicit
//! load/update/save cycle. Rows are written sorted descending by first
//! year, youngest listings first.

use super::provider::DataError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Inclusive span of years an instrument has daily data for.
///
/// Produced by the year walk as `[failed_year + 1, newest_year]`; an
/// instrument whose newest year already fails yields an empty span
/// (`first_year > last_year`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSpan {
    pub first_year: i32,
    pub last_year: i32,
}

impl ListingSpan {
    pub fn is_empty(&self) -> bool {
        self.first_year > self.last_year
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LedgerRow {
    instrument: String,
    first_year: i32,
    last_year: i32,
}

/// In-memory ledger keyed by instrument symbol.
#[derive(Debug, Clone, Default)]
pub struct ListingLedger {
    entries: BTreeMap<String, ListingSpan>,
}

impl ListingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a ledger from CSV. A missing file is an empty ledger.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| DataError::Ledger(format!("open {}: {e}", path.display())))?;
        let mut entries = BTreeMap::new();
        for row in reader.deserialize() {
            let row: LedgerRow =
                row.map_err(|e| DataError::Ledger(format!("parse ledger row: {e}")))?;
            entries.insert(
                row.instrument,
                ListingSpan {
                    first_year: row.first_year,
                    last_year: row.last_year,
                },
            );
        }
        Ok(Self { entries })
    }

    /// Insert or replace the span for an instrument.
    pub fn record(&mut self, symbol: impl Into<String>, span: ListingSpan) {
        self.entries.insert(symbol.into(), span);
    }

    pub fn get(&self, symbol: &str) -> Option<ListingSpan> {
        self.entries.get(symbol).copied()
    }

    /// Instruments whose first data year strictly precedes `year`,
    /// alphabetically.
    pub fn listed_before(&self, year: i32) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, span)| !span.is_empty() && span.first_year < year)
            .map(|(sym, _)| sym.as_str())
            .collect()
    }

    /// All entries, alphabetical by symbol.
    pub fn entries(&self) -> impl Iterator<Item = (&str, ListingSpan)> {
        self.entries.iter().map(|(sym, span)| (sym.as_str(), *span))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Persist as CSV, rows sorted descending by first year (ties
    /// alphabetical). Atomic write.
    pub fn save(&self, path: &Path) -> Result<(), DataError> {
        let mut rows: Vec<(&String, &ListingSpan)> = self.entries.iter().collect();
        rows.sort_by(|a, b| b.1.first_year.cmp(&a.1.first_year).then(a.0.cmp(b.0)));

        let mut writer = csv::Writer::from_writer(Vec::new());
        for (symbol, span) in rows {
            writer
                .serialize(LedgerRow {
                    instrument: symbol.clone(),
                    first_year: span.first_year,
                    last_year: span.last_year,
                })
                .map_err(|e| DataError::Ledger(format!("serialize ledger row: {e}")))?;
        }
        let encoded = writer
            .into_inner()
            .map_err(|e| DataError::Ledger(format!("flush ledger: {e}")))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| DataError::Ledger(format!("create {}: {e}", parent.display())))?;
        }
        let tmp = path.with_extension("csv.tmp");
        fs::write(&tmp, encoded)
            .map_err(|e| DataError::Ledger(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            DataError::Ledger(format!("atomic rename failed: {e}"))
        })
    }
}
