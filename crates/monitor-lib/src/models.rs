//! Core data models for the performance monitor

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known metric names used by the threshold policy
pub mod metrics {
    pub const CPU_PERCENT: &str = "cpu_percent";
    pub const MEMORY_BYTES: &str = "memory_bytes";
    pub const FPS: &str = "fps";
}

/// Remediation action categories
pub mod categories {
    pub const CPU: &str = "cpu";
    pub const RENDERING: &str = "rendering";
    pub const MEMORY: &str = "memory";
}

/// One timestamped reading of a metric, immutable once recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub metric: String,
    pub value: f64,
    /// Unix timestamp in seconds
    pub timestamp: i64,
}

impl Sample {
    pub fn new(metric: impl Into<String>, value: f64, timestamp: i64) -> Self {
        Self {
            metric: metric.into(),
            value,
            timestamp,
        }
    }
}

/// Aggregates computed over the current contents of one history buffer
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AggregateStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Coarse health tier derived from aggregated metrics
///
/// Variants are declared best to worst; the derived ordering is used to
/// check that classifications only degrade monotonically as load rises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthClassification {
    Excellent,
    Good,
    Fair,
    NeedsOptimization,
}

impl HealthClassification {
    /// Returns true if the system does not currently need remediation
    pub fn is_healthy(&self) -> bool {
        matches!(
            self,
            HealthClassification::Excellent | HealthClassification::Good
        )
    }
}

impl std::fmt::Display for HealthClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthClassification::Excellent => write!(f, "excellent"),
            HealthClassification::Good => write!(f, "good"),
            HealthClassification::Fair => write!(f, "fair"),
            HealthClassification::NeedsOptimization => write!(f, "needs_optimization"),
        }
    }
}

/// Priority of a remediation action, highest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionPriority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for ActionPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionPriority::High => write!(f, "high"),
            ActionPriority::Medium => write!(f, "medium"),
            ActionPriority::Low => write!(f, "low"),
        }
    }
}

/// A recommended corrective action, produced fresh on each evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemediationAction {
    pub category: String,
    pub priority: ActionPriority,
    pub description: String,
}

impl RemediationAction {
    pub fn new(
        category: impl Into<String>,
        priority: ActionPriority,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            priority,
            description: description.into(),
        }
    }

    /// Action synthesized when the host reports critical memory pressure
    pub fn critical_pressure() -> Self {
        Self::new(
            categories::MEMORY,
            ActionPriority::High,
            "critical memory pressure reported by host; release caches and transient buffers",
        )
    }
}

/// Point-in-time snapshot of the monitor, assembled by the report generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Unix timestamp when the report was generated
    pub generated_at: i64,
    pub classification: HealthClassification,
    /// Most recent sample per metric
    pub current: HashMap<String, Sample>,
    /// Aggregates over the retained window per metric
    pub aggregates: HashMap<String, AggregateStats>,
    /// Recommendations from the most recent evaluation
    pub recommendations: Vec<RemediationAction>,
}
