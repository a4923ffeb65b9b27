//! Observability infrastructure
//!
//! Provides:
//! - Prometheus metrics for the sampling loop and remediation dispatch
//! - Structured logging for significant monitor events

use crate::models::HealthClassification;
use prometheus::{
    register_histogram, register_int_counter, register_int_gauge, Histogram, IntCounter, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for sampling-cycle latency (in seconds)
const CYCLE_LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<MonitorMetricsInner> = OnceLock::new();

struct MonitorMetricsInner {
    sample_cycle_latency_seconds: Histogram,
    samples_recorded: IntCounter,
    probe_errors: IntCounter,
    remediations_triggered: IntCounter,
    remediation_errors: IntCounter,
    current_classification: IntGauge,
    metrics_monitored: IntGauge,
}

impl MonitorMetricsInner {
    fn new() -> Self {
        Self {
            sample_cycle_latency_seconds: register_histogram!(
                "perfmon_sample_cycle_latency_seconds",
                "Time spent probing and recording one sampling cycle",
                CYCLE_LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register sample_cycle_latency_seconds"),

            samples_recorded: register_int_counter!(
                "perfmon_samples_recorded_total",
                "Total number of metric samples recorded"
            )
            .expect("Failed to register samples_recorded_total"),

            probe_errors: register_int_counter!(
                "perfmon_probe_errors_total",
                "Total number of probe readings that failed and were skipped"
            )
            .expect("Failed to register probe_errors_total"),

            remediations_triggered: register_int_counter!(
                "perfmon_remediations_triggered_total",
                "Total number of remediation passes dispatched"
            )
            .expect("Failed to register remediations_triggered_total"),

            remediation_errors: register_int_counter!(
                "perfmon_remediation_errors_total",
                "Total number of remediation handler failures"
            )
            .expect("Failed to register remediation_errors_total"),

            current_classification: register_int_gauge!(
                "perfmon_current_classification",
                "Current health classification (0=excellent 1=good 2=fair 3=needs_optimization)"
            )
            .expect("Failed to register current_classification"),

            metrics_monitored: register_int_gauge!(
                "perfmon_metrics_monitored",
                "Number of metrics with a registered probe"
            )
            .expect("Failed to register metrics_monitored"),
        }
    }
}

/// Monitor metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the
/// same underlying registry.
#[derive(Clone)]
pub struct MonitorMetrics {
    _private: (),
}

impl Default for MonitorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorMetrics {
    /// Create a metrics handle, initializing the global registry if needed
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(MonitorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &MonitorMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_cycle_latency(&self, duration_secs: f64) {
        self.inner().sample_cycle_latency_seconds.observe(duration_secs);
    }

    pub fn add_samples_recorded(&self, count: u64) {
        self.inner().samples_recorded.inc_by(count);
    }

    pub fn inc_probe_errors(&self) {
        self.inner().probe_errors.inc();
    }

    pub fn inc_remediations_triggered(&self) {
        self.inner().remediations_triggered.inc();
    }

    pub fn inc_remediation_errors(&self) {
        self.inner().remediation_errors.inc();
    }

    pub fn set_classification(&self, classification: HealthClassification) {
        let level = match classification {
            HealthClassification::Excellent => 0,
            HealthClassification::Good => 1,
            HealthClassification::Fair => 2,
            HealthClassification::NeedsOptimization => 3,
        };
        self.inner().current_classification.set(level);
    }

    pub fn set_metrics_monitored(&self, count: i64) {
        self.inner().metrics_monitored.set(count);
    }
}

/// Structured logger for monitor events
///
/// Consistent field-formatted logging for lifecycle, classification and
/// remediation events.
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    pub fn log_startup(&self, version: &str, sample_interval_ms: u64) {
        info!(
            event = "monitor_started",
            instance = %self.instance,
            version = %version,
            sample_interval_ms = sample_interval_ms,
            "Performance monitor started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "monitor_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Performance monitor shutting down"
        );
    }

    pub fn log_classification_change(
        &self,
        previous: HealthClassification,
        current: HealthClassification,
    ) {
        if current > previous {
            warn!(
                event = "classification_changed",
                instance = %self.instance,
                previous = %previous,
                current = %current,
                "Health classification degraded"
            );
        } else {
            info!(
                event = "classification_changed",
                instance = %self.instance,
                previous = %previous,
                current = %current,
                "Health classification improved"
            );
        }
    }

    pub fn log_remediation_triggered(&self, trigger: &str, action_count: usize) {
        warn!(
            event = "remediation_triggered",
            instance = %self.instance,
            trigger = %trigger,
            action_count = action_count,
            "Dispatching remediation pass"
        );
    }

    pub fn log_critical_pressure(&self) {
        warn!(
            event = "critical_memory_pressure",
            instance = %self.instance,
            "Host reported critical memory pressure"
        );
    }
}
