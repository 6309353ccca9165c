//! Sample — a single timestamped observation on a value stream.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One observation on a time series: a timestamp and a real value.
///
/// Timestamps are strictly increasing within a stream; `TimeSeries::push`
/// enforces this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub at: NaiveDateTime,
    pub value: f64,
}

impl Sample {
    pub fn new(at: NaiveDateTime, value: f64) -> Self {
        Self { at, value }
    }
}
