//! SmoothLab Core — windowed cascade filters over streaming price data.
//!
//! This crate contains:
//! - Domain types (timestamped samples, daily OHLCV bars)
//! - The windowed-filter engine: sliding window + cascaded FIR stages,
//!   with the five indicator presets (EMA, Derivative, ZeroBaseline,
//!   TRIX, Hull)
//! - The push-driven streaming adapter (fanout over an input series)
//! - Daily-bar acquisition: provider trait, Yahoo Finance client,
//!   CSV bar store, listing-year ledger, and the backward-walk
//!   backfill job

pub mod data;
pub mod domain;
pub mod filter;
pub mod stream;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types handed across threads stay Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Sample>();
        require_sync::<domain::Sample>();
        require_send::<domain::DailyBar>();
        require_sync::<domain::DailyBar>();

        require_send::<filter::Stage>();
        require_sync::<filter::Stage>();
        require_send::<filter::WindowedCascade>();
        require_sync::<filter::WindowedCascade>();

        require_send::<stream::TimeSeries>();
        require_sync::<stream::TimeSeries>();
        require_send::<stream::Fanout>();
        require_sync::<stream::Fanout>();

        require_send::<data::CircuitBreaker>();
        require_sync::<data::CircuitBreaker>();
        require_send::<data::CsvBarStore>();
        require_sync::<data::CsvBarStore>();
        require_send::<data::ListingLedger>();
        require_sync::<data::ListingLedger>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
    }
}
