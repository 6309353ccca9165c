//! Append-only time series with strictly increasing timestamps.

use crate::domain::Sample;
use chrono::NaiveDateTime;
use thiserror::Error;

/// Structured errors for stream delivery.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StreamError {
    #[error("non-monotonic timestamp on series '{series}': {at} does not follow {prev}")]
    NonMonotonicTimestamp {
        series: String,
        prev: NaiveDateTime,
        at: NaiveDateTime,
    },
}

/// A named, append-only log of samples.
///
/// Timestamps must be strictly increasing; a push that violates this
/// is rejected and leaves the series unchanged.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    name: String,
    samples: Vec<Sample>,
}

impl TimeSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            samples: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a sample. Fails if its timestamp does not strictly follow
    /// the previous one.
    pub fn push(&mut self, sample: Sample) -> Result<(), StreamError> {
        if let Some(last) = self.samples.last() {
            if sample.at <= last.at {
                return Err(StreamError::NonMonotonicTimestamp {
                    series: self.name.clone(),
                    prev: last.at,
                    at: sample.at,
                });
            }
        }
        self.samples.push(sample);
        Ok(())
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// The raw value sequence, in arrival order.
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn push_appends_in_order() {
        let mut ts = TimeSeries::new("close");
        ts.push(Sample::new(at(2), 100.0)).unwrap();
        ts.push(Sample::new(at(3), 101.0)).unwrap();
        assert_eq!(ts.len(), 2);
        assert_eq!(ts.values(), vec![100.0, 101.0]);
        assert_eq!(ts.last().unwrap().at, at(3));
    }

    #[test]
    fn push_rejects_equal_timestamp() {
        let mut ts = TimeSeries::new("close");
        ts.push(Sample::new(at(2), 100.0)).unwrap();
        let err = ts.push(Sample::new(at(2), 101.0)).unwrap_err();
        assert!(matches!(err, StreamError::NonMonotonicTimestamp { .. }));
        assert_eq!(ts.len(), 1);
    }

    #[test]
    fn push_rejects_backwards_timestamp() {
        let mut ts = TimeSeries::new("close");
        ts.push(Sample::new(at(5), 100.0)).unwrap();
        assert!(ts.push(Sample::new(at(4), 99.0)).is_err());
    }
}
