//! Bounded FIFO of usage samples.

use std::collections::VecDeque;

use crate::sample::UsageSample;

/// The most recent samples, oldest first.
///
/// Pushing onto a full history evicts the oldest sample.
#[derive(Clone, Debug)]
pub struct UsageHistory {
    samples: VecDeque<UsageSample>,
    capacity: usize,
}

impl UsageHistory {
    /// One minute at one sample per second.
    pub const DEFAULT_CAPACITY: usize = 60;

    /// An empty history holding at most `capacity` samples (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest if full.
    pub fn push(&mut self, sample: UsageSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<&UsageSample> {
        self.samples.back()
    }

    /// Samples oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &UsageSample> {
        self.samples.iter()
    }

    /// Owned copy of the samples, oldest-first.
    pub fn to_vec(&self) -> Vec<UsageSample> {
        self.samples.iter().copied().collect()
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples are retained.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of retained samples.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every sample.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for UsageHistory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
