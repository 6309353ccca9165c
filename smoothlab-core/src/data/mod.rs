//! Daily-bar acquisition: provider, store, ledger, and the backfill job.

pub mod backfill;
pub mod breaker;
pub mod ledger;
pub mod provider;
pub mod store;
pub mod universe;
pub mod yahoo;

pub use backfill::{backfill_instrument, backfill_universe, fetch_range, BackfillSummary};
pub use breaker::CircuitBreaker;
pub use ledger::{ListingLedger, ListingSpan};
pub use provider::{
    BarSource, DailyBarProvider, DataError, FetchProgress, FetchResult, SilentProgress,
    StdoutProgress,
};
pub use store::CsvBarStore;
pub use universe::Universe;
pub use yahoo::YahooProvider;
