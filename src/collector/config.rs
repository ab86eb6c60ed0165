//! Collector configuration.

use std::time::Duration;

use crate::error::Error;
use crate::Result;

/// Comparison used to decide whether the buffer has reached the flush
/// threshold. The two policies differ by exactly one item's worth of
/// batching eagerness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdPolicy {
    /// Flush as soon as the buffer length reaches the threshold
    /// (`len >= size_threshold`). The default.
    #[default]
    AtLeast,
    /// Flush only once the buffer length exceeds the threshold
    /// (`len > size_threshold`).
    Exceeds,
}

impl ThresholdPolicy {
    pub(crate) fn is_met(self, len: usize, threshold: usize) -> bool {
        match self {
            ThresholdPolicy::AtLeast => len >= threshold,
            ThresholdPolicy::Exceeds => len > threshold,
        }
    }
}

/// Configuration for a [`Collector`](crate::Collector).
///
/// Immutable for the collector's lifetime.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Buffer length at which a flush is triggered immediately, without
    /// waiting for quiescence. Must be at least 1.
    pub size_threshold: usize,
    /// Idle time after the most recent submission before a sub-threshold
    /// buffer is flushed.
    pub quiescence: Duration,
    /// How `size_threshold` is compared against the buffer length.
    pub threshold_policy: ThresholdPolicy,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            size_threshold: 10,
            quiescence: Duration::from_millis(100),
            threshold_policy: ThresholdPolicy::default(),
        }
    }
}

impl CollectorConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_size_threshold(mut self, threshold: usize) -> Self {
        self.size_threshold = threshold;
        self
    }
    pub fn with_quiescence(mut self, quiescence: Duration) -> Self {
        self.quiescence = quiescence;
        self
    }
    pub fn with_threshold_policy(mut self, policy: ThresholdPolicy) -> Self {
        self.threshold_policy = policy;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.size_threshold == 0 {
            return Err(Error::configuration("size_threshold must be at least 1"));
        }
        Ok(())
    }
}
