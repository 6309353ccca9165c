//! Year-partitioned CSV bar store.
//!
//! Layout: `{root}/symbol={SYMBOL}/{year}.csv` plus a `meta.json`
//! sidecar per symbol recording, for every stored year, the bar count
//! and a blake3 content hash. Writes are atomic (tmp + rename).

use super::provider::DataError;
use crate::domain::DailyBar;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-year entry in the metadata sidecar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearMeta {
    pub bar_count: usize,
    pub data_hash: String,
}

/// Metadata sidecar for a stored symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMeta {
    pub symbol: String,
    pub years: BTreeMap<i32, YearMeta>,
    pub written_at: chrono::NaiveDateTime,
}

/// The CSV bar store.
pub struct CsvBarStore {
    root: PathBuf,
}

impl CsvBarStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn symbol_dir(&self, symbol: &str) -> PathBuf {
        self.root.join(format!("symbol={symbol}"))
    }

    fn year_path(&self, symbol: &str, year: i32) -> PathBuf {
        self.symbol_dir(symbol).join(format!("{year}.csv"))
    }

    fn meta_path(&self, symbol: &str) -> PathBuf {
        self.symbol_dir(symbol).join("meta.json")
    }

    /// Write one calendar year of bars for a symbol.
    ///
    /// Every bar must fall inside `year`; callers partition multi-year
    /// fetches first. Replaces any existing partition for that year.
    pub fn write_year(&self, symbol: &str, year: i32, bars: &[DailyBar]) -> Result<(), DataError> {
        if bars.is_empty() {
            return Err(DataError::Store(format!(
                "no bars to store for {symbol} {year}"
            )));
        }
        if let Some(stray) = bars.iter().find(|b| b.date.year() != year) {
            return Err(DataError::Store(format!(
                "bar dated {} does not belong in partition {symbol}/{year}",
                stray.date
            )));
        }

        let dir = self.symbol_dir(symbol);
        fs::create_dir_all(&dir)
            .map_err(|e| DataError::Store(format!("create {}: {e}", dir.display())))?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        for bar in bars {
            writer
                .serialize(bar)
                .map_err(|e| DataError::Store(format!("serialize bar: {e}")))?;
        }
        let encoded = writer
            .into_inner()
            .map_err(|e| DataError::Store(format!("flush csv: {e}")))?;

        let path = self.year_path(symbol, year);
        let tmp = path.with_extension("csv.tmp");
        fs::write(&tmp, &encoded)
            .map_err(|e| DataError::Store(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            DataError::Store(format!("atomic rename failed: {e}"))
        })?;

        self.update_meta(symbol, year, bars)
    }

    fn update_meta(&self, symbol: &str, year: i32, bars: &[DailyBar]) -> Result<(), DataError> {
        let mut meta = self.load_meta(symbol)?.unwrap_or_else(|| StoreMeta {
            symbol: symbol.to_string(),
            years: BTreeMap::new(),
            written_at: chrono::Local::now().naive_local(),
        });

        let serialized = serde_json::to_vec(bars)
            .map_err(|e| DataError::Store(format!("hash serialization: {e}")))?;
        meta.years.insert(
            year,
            YearMeta {
                bar_count: bars.len(),
                data_hash: blake3::hash(&serialized).to_hex().to_string(),
            },
        );
        meta.written_at = chrono::Local::now().naive_local();

        let json = serde_json::to_string_pretty(&meta)
            .map_err(|e| DataError::Store(format!("meta serialization: {e}")))?;
        let path = self.meta_path(symbol);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| DataError::Store(format!("meta write: {e}")))?;
        fs::rename(&tmp, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            DataError::Store(format!("meta rename: {e}"))
        })
    }

    /// Load the metadata sidecar, if the symbol has one.
    pub fn load_meta(&self, symbol: &str) -> Result<Option<StoreMeta>, DataError> {
        let path = self.meta_path(symbol);
        if !path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(&path).map_err(|e| DataError::Store(format!("meta read: {e}")))?;
        let meta = serde_json::from_str(&content)
            .map_err(|e| DataError::Store(format!("meta parse: {e}")))?;
        Ok(Some(meta))
    }

    /// Years stored for a symbol, ascending.
    pub fn years(&self, symbol: &str) -> Result<Vec<i32>, DataError> {
        Ok(self
            .load_meta(symbol)?
            .map(|m| m.years.keys().copied().collect())
            .unwrap_or_default())
    }

    pub fn has_year(&self, symbol: &str, year: i32) -> bool {
        self.year_path(symbol, year).exists()
    }

    /// Read one year partition.
    pub fn read_year(&self, symbol: &str, year: i32) -> Result<Vec<DailyBar>, DataError> {
        let path = self.year_path(symbol, year);
        let mut reader = csv::Reader::from_path(&path)
            .map_err(|e| DataError::Store(format!("open {}: {e}", path.display())))?;
        let mut bars = Vec::new();
        for row in reader.deserialize() {
            let bar: DailyBar = row.map_err(|e| DataError::Store(format!("parse bar: {e}")))?;
            bars.push(bar);
        }
        if bars.is_empty() {
            return Err(DataError::Store(format!(
                "empty partition {symbol}/{year}"
            )));
        }
        Ok(bars)
    }

    /// Read all stored bars for a symbol across an inclusive year range,
    /// sorted by date. Missing partitions inside the range are skipped;
    /// a fully absent range is `NoData`.
    pub fn read_range(
        &self,
        symbol: &str,
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<DailyBar>, DataError> {
        let mut bars = Vec::new();
        for year in start_year..=end_year {
            if self.has_year(symbol, year) {
                bars.extend(self.read_year(symbol, year)?);
            }
        }
        if bars.is_empty() {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        }
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}
