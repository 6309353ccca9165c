//! Backfill orchestration — the batch acquisition job.
//!
//! `backfill_instrument` walks backward through calendar years from the
//! most recent known year, storing each year's daily bars, until the
//! provider reports no data; the year after the failed one is the
//! instrument's first listing year. `backfill_universe` runs the walk
//! over a whole instrument list, persisting the ledger after each
//! instrument.

use super::ledger::{ListingLedger, ListingSpan};
use super::provider::{DailyBarProvider, DataError, FetchProgress};
use super::store::CsvBarStore;
use crate::domain::DailyBar;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::path::Path;

/// Inclusive calendar bounds of a year.
fn year_bounds(year: i32) -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(year, 1, 1).expect("valid calendar year"),
        NaiveDate::from_ymd_opt(year, 12, 31).expect("valid calendar year"),
    )
}

/// Walk backward from `newest_year` one calendar year at a time,
/// storing each fetched year, until the provider reports no data.
///
/// Returns the discovered listing span `[failed_year + 1, newest_year]`.
/// If even `newest_year` has no data the span is empty
/// (`first_year > last_year`). Only `DataError::NoData` terminates the
/// walk; transport failures and breaker trips propagate so they are
/// never recorded as listing years.
pub fn backfill_instrument(
    provider: &dyn DailyBarProvider,
    store: &CsvBarStore,
    symbol: &str,
    newest_year: i32,
    progress: &dyn FetchProgress,
) -> Result<ListingSpan, DataError> {
    let mut year = newest_year;
    loop {
        let (start, end) = year_bounds(year);
        match provider.fetch(symbol, start, end) {
            Ok(result) => {
                store.write_year(symbol, year, &result.bars)?;
                progress.on_year(symbol, year, result.bars.len());
                year -= 1;
            }
            Err(DataError::NoData { .. }) => {
                return Ok(ListingSpan {
                    first_year: year + 1,
                    last_year: newest_year,
                });
            }
            Err(other) => return Err(other),
        }
    }
}

/// Fetch an explicit inclusive year range for one instrument and store
/// it, partitioned by year. Returns the number of bars stored.
pub fn fetch_range(
    provider: &dyn DailyBarProvider,
    store: &CsvBarStore,
    symbol: &str,
    start_year: i32,
    end_year: i32,
) -> Result<usize, DataError> {
    let (start, _) = year_bounds(start_year);
    let (_, end) = year_bounds(end_year);
    let result = provider.fetch(symbol, start, end)?;

    let mut by_year: BTreeMap<i32, Vec<DailyBar>> = BTreeMap::new();
    for bar in result.bars {
        by_year.entry(bar.date.year()).or_default().push(bar);
    }
    let mut stored = 0;
    for (year, bars) in &by_year {
        store.write_year(symbol, *year, bars)?;
        stored += bars.len();
    }
    Ok(stored)
}

/// Summary of a batch backfill run.
#[derive(Debug)]
pub struct BackfillSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<(String, DataError)>,
}

impl BackfillSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Run the backward walk for every instrument, recording each
/// discovered span in the ledger and persisting the ledger after each
/// instrument. A tripped provider fails the remaining instruments
/// without issuing requests.
pub fn backfill_universe(
    provider: &dyn DailyBarProvider,
    store: &CsvBarStore,
    ledger: &mut ListingLedger,
    ledger_path: &Path,
    symbols: &[&str],
    newest_year: i32,
    progress: &dyn FetchProgress,
) -> BackfillSummary {
    let total = symbols.len();
    let mut succeeded = 0;
    let mut failed = 0;
    let mut errors: Vec<(String, DataError)> = Vec::new();

    for (i, symbol) in symbols.iter().enumerate() {
        progress.on_start(symbol, i, total);

        let result = backfill_instrument(provider, store, symbol, newest_year, progress)
            .and_then(|span| {
                ledger.record(*symbol, span);
                ledger.save(ledger_path)
            });
        progress.on_complete(symbol, i, total, &result);

        match result {
            Ok(()) => succeeded += 1,
            Err(e) => {
                errors.push((symbol.to_string(), e));
                failed += 1;
            }
        }

        // Bail out early once the breaker refuses further requests
        if !provider.is_available() {
            for sym in &symbols[(i + 1)..total] {
                errors.push((sym.to_string(), DataError::BreakerTripped));
                failed += 1;
            }
            break;
        }
    }

    progress.on_batch_complete(succeeded, failed, total);

    BackfillSummary {
        total,
        succeeded,
        failed,
        errors,
    }
}
