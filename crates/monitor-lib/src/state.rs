//! Shared monitor state
//!
//! One `MonitorState` exists per controller and is the single shared
//! mutable resource: the sampling cycle and remediation bookkeeping take
//! the write lock, snapshot reads take the read lock. No lock is held
//! across an await point and hold times are bounded to O(1) buffer work.

use crate::history::SampleHistory;
use crate::models::{AggregateStats, HealthClassification, RemediationAction, Sample};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

/// Handle to the per-controller state
pub type SharedState = Arc<RwLock<MonitorState>>;

/// Mutable state owned by one controller instance
#[derive(Debug)]
pub struct MonitorState {
    histories: HashMap<String, SampleHistory>,
    history_capacity: usize,
    last_classification: HealthClassification,
    last_actions: Vec<RemediationAction>,
    last_trigger: Option<Instant>,
}

impl MonitorState {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            histories: HashMap::new(),
            history_capacity,
            // Optimistic default before any data arrives
            last_classification: HealthClassification::Good,
            last_actions: Vec::new(),
            last_trigger: None,
        }
    }

    pub fn shared(history_capacity: usize) -> SharedState {
        Arc::new(RwLock::new(Self::new(history_capacity)))
    }

    /// Append one reading, creating the metric's history on first use
    pub fn record(&mut self, metric: &str, value: f64, timestamp: i64) {
        self.histories
            .entry(metric.to_string())
            .or_insert_with(|| SampleHistory::new(metric, self.history_capacity))
            .record(value, timestamp);
    }

    /// Aggregates for every metric that has at least one sample
    pub fn aggregates(&self) -> HashMap<String, AggregateStats> {
        self.histories
            .iter()
            .filter_map(|(name, history)| history.aggregates().map(|a| (name.clone(), a)))
            .collect()
    }

    /// Most recent sample per metric
    pub fn latest_samples(&self) -> HashMap<String, Sample> {
        self.histories
            .iter()
            .filter_map(|(name, history)| history.latest().ok().map(|s| (name.clone(), s.clone())))
            .collect()
    }

    pub fn history(&self, metric: &str) -> Option<&SampleHistory> {
        self.histories.get(metric)
    }

    pub fn last_classification(&self) -> HealthClassification {
        self.last_classification
    }

    pub fn last_actions(&self) -> &[RemediationAction] {
        &self.last_actions
    }

    /// Store the outcome of one policy evaluation
    pub fn apply_evaluation(
        &mut self,
        classification: HealthClassification,
        actions: Vec<RemediationAction>,
    ) {
        self.last_classification = classification;
        self.last_actions = actions;
    }

    pub fn last_trigger(&self) -> Option<Instant> {
        self.last_trigger
    }

    pub fn mark_triggered(&mut self) {
        self.last_trigger = Some(Instant::now());
    }
}

/// Read-lock a shared state, recovering from a poisoned lock
pub fn read(state: &SharedState) -> RwLockReadGuard<'_, MonitorState> {
    state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Write-lock a shared state, recovering from a poisoned lock
pub fn write(state: &SharedState) -> RwLockWriteGuard<'_, MonitorState> {
    state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
