//! Data provider trait and structured error types.
//!
//! `DailyBarProvider` abstracts over bar sources (Yahoo Finance, the
//! local store, scripted providers in tests) so the backfill job can be
//! exercised without a network.

use crate::domain::DailyBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    /// The provider has no daily bars for this symbol in the requested
    /// range. In the backfill walk this is the "not yet trading" signal.
    #[error("no daily bars for symbol '{symbol}' in the requested range")]
    NoData { symbol: String },

    #[error("provider requests are suspended (circuit breaker tripped)")]
    BreakerTripped,

    #[error("bar store error: {0}")]
    Store(String),

    #[error("ledger error: {0}")]
    Ledger(String),

    #[error("universe config error: {0}")]
    Universe(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Result of a successful fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<DailyBar>,
    pub source: BarSource,
}

/// Where a bar series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarSource {
    YahooFinance,
    Store,
    Scripted,
}

/// Trait for daily-bar providers.
pub trait DailyBarProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV bars for a symbol over a date range, in
    /// ascending date order.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError>;

    /// Whether the provider will currently accept requests.
    fn is_available(&self) -> bool;
}

/// Progress callback for multi-instrument acquisition runs.
pub trait FetchProgress: Send {
    /// Called when an instrument's walk or fetch begins.
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// Called after each stored year during a backward walk.
    fn on_year(&self, symbol: &str, year: i32, bar_count: usize);

    /// Called when an instrument completes (or fails).
    fn on_complete(&self, symbol: &str, index: usize, total: usize, result: &Result<(), DataError>);

    /// Called when the whole batch is done.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Progress reporter that prints to stdout.
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        println!("[{}/{}] {symbol}...", index + 1, total);
    }

    fn on_year(&self, symbol: &str, year: i32, bar_count: usize) {
        println!("  {symbol} {year}: {bar_count} bars");
    }

    fn on_complete(
        &self,
        symbol: &str,
        _index: usize,
        _total: usize,
        result: &Result<(), DataError>,
    ) {
        match result {
            Ok(()) => println!("  OK: {symbol}"),
            Err(e) => println!("  FAIL: {symbol}: {e}"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        println!("\nBackfill complete: {succeeded}/{total} succeeded, {failed} failed");
    }
}

/// Progress reporter that swallows everything (library callers that
/// don't care).
pub struct SilentProgress;

impl FetchProgress for SilentProgress {
    fn on_start(&self, _symbol: &str, _index: usize, _total: usize) {}
    fn on_year(&self, _symbol: &str, _year: i32, _bar_count: usize) {}
    fn on_complete(
        &self,
        _symbol: &str,
        _index: usize,
        _total: usize,
        _result: &Result<(), DataError>,
    ) {
    }
    fn on_batch_complete(&self, _succeeded: usize, _failed: usize, _total: usize) {}
}
