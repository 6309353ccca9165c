//! Fanout — the streaming adapter between an input series and windowed
//! cascades.
//!
//! Delivery is an explicit call, not an observer callback: the caller
//! pushes each new sample into the fanout, which feeds every subscribed
//! cascade synchronously, in subscription order, and republishes each
//! non-absent result on that subscription's output series with the
//! triggering sample's timestamp.

use super::series::{StreamError, TimeSeries};
use crate::domain::Sample;
use crate::filter::WindowedCascade;

/// Handle for one subscription on a [`Fanout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(pub usize);

struct Subscription {
    indicator: WindowedCascade,
    output: TimeSeries,
}

/// Push-driven fanout over one input series.
///
/// Each subscription exclusively owns its cascade and output series;
/// nothing is shared across subscriptions.
pub struct Fanout {
    input: TimeSeries,
    subscriptions: Vec<Subscription>,
}

impl Fanout {
    pub fn new(input_name: impl Into<String>) -> Self {
        Self {
            input: TimeSeries::new(input_name),
            subscriptions: Vec::new(),
        }
    }

    /// Subscribe a cascade; its results are published on a fresh output
    /// series with the given name. Subscriptions are served in the order
    /// they were added.
    pub fn subscribe(
        &mut self,
        output_name: impl Into<String>,
        indicator: WindowedCascade,
    ) -> SubscriptionId {
        self.subscriptions.push(Subscription {
            indicator,
            output: TimeSeries::new(output_name),
        });
        SubscriptionId(self.subscriptions.len() - 1)
    }

    /// Deliver one sample: record it on the input series, feed every
    /// subscription, and republish non-absent values timestamped with
    /// `sample.at`.
    pub fn deliver(&mut self, sample: Sample) -> Result<(), StreamError> {
        self.input.push(sample)?;
        for sub in &mut self.subscriptions {
            sub.indicator.push(sample.value);
            if let Some(value) = sub.indicator.current() {
                sub.output.push(Sample::new(sample.at, value))?;
            }
        }
        Ok(())
    }

    /// The recorded input series.
    pub fn input(&self) -> &TimeSeries {
        &self.input
    }

    /// Output series for a subscription.
    pub fn output(&self, id: SubscriptionId) -> Option<&TimeSeries> {
        self.subscriptions.get(id.0).map(|s| &s.output)
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}
