//! Error types for the monitoring core
//!
//! Nothing in the sampling path is fatal to the host: probe failures skip a
//! sample, handler failures skip an action, and an empty history skips the
//! aggregate-dependent logic. Only configuration mistakes fail fast.

use thiserror::Error;

/// Errors produced by the monitoring core
#[derive(Debug, Error)]
pub enum MonitorError {
    /// No samples have been recorded yet for a metric
    #[error("no samples recorded for metric '{metric}'")]
    EmptyHistory { metric: String },

    /// A metric probe failed to produce a reading
    #[error("probe for metric '{metric}' failed: {source}")]
    Probe {
        metric: String,
        #[source]
        source: anyhow::Error,
    },

    /// A remediation handler failed; remaining handlers still run
    #[error("remediation handler for category '{category}' failed: {source}")]
    Remediation {
        category: String,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration rejected at construction time
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MonitorError {
    pub fn empty_history(metric: impl Into<String>) -> Self {
        Self::EmptyHistory {
            metric: metric.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
