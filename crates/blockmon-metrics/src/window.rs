//! Fixed-capacity trailing window of finalized metrics

use crate::DEFAULT_WINDOW_CAPACITY;
use blockmon_types::FinalizedMetric;
use std::collections::VecDeque;

/// Trailing window of the most recent finalized metrics
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    capacity: usize,
    entries: VecDeque<FinalizedMetric>,
}

impl SlidingWindow {
    /// Create a window with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_WINDOW_CAPACITY)
    }

    /// Create a window holding at most `capacity` entries (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Append a metric, evicting the oldest once over capacity
    pub fn push(&mut self, metric: FinalizedMetric) {
        self.entries.push_back(metric);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Mean of the present values only. `None` when no entry has a value.
    pub fn mean<F>(&self, selector: F) -> Option<f64>
    where
        F: Fn(&FinalizedMetric) -> Option<f64>,
    {
        let (sum, count) = self
            .entries
            .iter()
            .filter_map(selector)
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        if count == 0 {
            return None;
        }
        Some(sum / count as f64)
    }

    /// Mean over every entry, counting absent values as zero. `None` when empty.
    pub fn mean_or_zero<F>(&self, selector: F) -> Option<f64>
    where
        F: Fn(&FinalizedMetric) -> Option<f64>,
    {
        if self.entries.is_empty() {
            return None;
        }
        let sum: f64 = self.entries.iter().map(|m| selector(m).unwrap_or(0.0)).sum();
        Some(sum / self.entries.len() as f64)
    }

    /// Most recently pushed metric
    pub fn latest(&self) -> Option<&FinalizedMetric> {
        self.entries.back()
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &FinalizedMetric> {
        self.entries.iter()
    }

    /// Number of metrics held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the window is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of metrics held
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for SlidingWindow {
    fn default() -> Self {
        Self::new()
    }
}
