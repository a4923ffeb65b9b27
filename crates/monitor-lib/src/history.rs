//! Bounded sample history
//!
//! Fixed-capacity, time-ordered ring buffer per metric. Insertion is
//! append-at-tail with FIFO eviction when full; aggregates are computed on
//! demand over the current contents only, never over evicted data.

use crate::error::MonitorError;
use crate::models::{AggregateStats, Sample};
use std::collections::VecDeque;

/// Ring buffer of samples for a single metric
#[derive(Debug)]
pub struct SampleHistory {
    metric: String,
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl SampleHistory {
    /// Create an empty history for the given metric
    ///
    /// Capacity must be non-zero; the controller validates this before any
    /// history is constructed.
    pub fn new(metric: impl Into<String>, capacity: usize) -> Self {
        Self {
            metric: metric.into(),
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a reading, evicting the oldest entry when at capacity
    pub fn record(&mut self, value: f64, timestamp: i64) {
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples
            .push_back(Sample::new(self.metric.clone(), value, timestamp));
    }

    /// Most recent sample
    pub fn latest(&self) -> Result<&Sample, MonitorError> {
        self.samples
            .back()
            .ok_or_else(|| MonitorError::empty_history(&self.metric))
    }

    /// Mean over the current contents
    pub fn mean(&self) -> Result<f64, MonitorError> {
        if self.samples.is_empty() {
            return Err(MonitorError::empty_history(&self.metric));
        }
        let sum: f64 = self.samples.iter().map(|s| s.value).sum();
        Ok(sum / self.samples.len() as f64)
    }

    /// Minimum over the current contents
    pub fn min(&self) -> Result<f64, MonitorError> {
        self.samples
            .iter()
            .map(|s| s.value)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .ok_or_else(|| MonitorError::empty_history(&self.metric))
    }

    /// Maximum over the current contents
    pub fn max(&self) -> Result<f64, MonitorError> {
        self.samples
            .iter()
            .map(|s| s.value)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .ok_or_else(|| MonitorError::empty_history(&self.metric))
    }

    /// All aggregates at once, or None when the history is empty
    pub fn aggregates(&self) -> Option<AggregateStats> {
        if self.samples.is_empty() {
            return None;
        }
        Some(AggregateStats {
            mean: self.mean().ok()?,
            min: self.min().ok()?,
            max: self.max().ok()?,
            count: self.samples.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Retained values in insertion order, oldest first
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(capacity: usize, values: &[f64]) -> SampleHistory {
        let mut history = SampleHistory::new("test_metric", capacity);
        for (i, v) in values.iter().enumerate() {
            history.record(*v, i as i64);
        }
        history
    }

    #[test]
    fn test_fifo_eviction_retains_last_n() {
        // Inject N+k samples and assert exactly the last N survive in order
        let history = filled(5, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(history.len(), 5);
        assert_eq!(history.values(), vec![4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_length_never_exceeds_capacity() {
        let mut history = SampleHistory::new("test_metric", 3);
        for i in 0..50 {
            history.record(i as f64, i);
            assert!(history.len() <= 3);
        }
    }

    #[test]
    fn test_aggregates_match_arithmetic() {
        let history = filled(10, &[2.0, 4.0, 6.0]);
        assert!((history.mean().unwrap() - 4.0).abs() < f64::EPSILON);
        assert!((history.min().unwrap() - 2.0).abs() < f64::EPSILON);
        assert!((history.max().unwrap() - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_aggregates_ignore_evicted_data() {
        // Capacity 3: the 100.0 outlier must fall out of the window
        let history = filled(3, &[100.0, 1.0, 2.0, 3.0]);
        assert!((history.max().unwrap() - 3.0).abs() < f64::EPSILON);
        assert!((history.mean().unwrap() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_history_errors_not_zero() {
        let history = SampleHistory::new("test_metric", 4);
        assert!(matches!(
            history.mean(),
            Err(MonitorError::EmptyHistory { .. })
        ));
        assert!(matches!(
            history.min(),
            Err(MonitorError::EmptyHistory { .. })
        ));
        assert!(matches!(
            history.max(),
            Err(MonitorError::EmptyHistory { .. })
        ));
        assert!(matches!(
            history.latest(),
            Err(MonitorError::EmptyHistory { .. })
        ));
        assert!(history.aggregates().is_none());
    }

    #[test]
    fn test_latest_is_most_recent() {
        let history = filled(5, &[1.0, 2.0, 3.0]);
        let latest = history.latest().unwrap();
        assert!((latest.value - 3.0).abs() < f64::EPSILON);
        assert_eq!(latest.timestamp, 2);
    }
}
