//! Monitor controller
//!
//! The explicitly constructed, explicitly owned facade over the sampling
//! loop, probe registry, remediation coordinator and report generator.
//! One controller is typically active per process by convention; nothing
//! enforces a singleton.

use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::models::Report;
use crate::observability::StructuredLogger;
use crate::probe::{MetricProbe, ProbeRegistry};
use crate::remediation::{RemediationCoordinator, RemediationHandler};
use crate::report;
use crate::scheduler::Sampler;
use crate::state::{self, MonitorState, SharedState};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Handle to the running sampling task
struct MonitorTask {
    shutdown_tx: broadcast::Sender<()>,
    handle: JoinHandle<()>,
}

/// A performance monitor controller
///
/// Construction validates the configuration; `start` and `stop` are
/// idempotent; `snapshot` and `notify_critical_pressure` are safe from any
/// task at any time, running or not.
pub struct PerformanceMonitor {
    config: MonitorConfig,
    state: SharedState,
    probes: Arc<ProbeRegistry>,
    coordinator: Arc<RemediationCoordinator>,
    logger: StructuredLogger,
    task: Mutex<Option<MonitorTask>>,
}

impl PerformanceMonitor {
    /// Create a controller with the given configuration
    pub fn new(config: MonitorConfig) -> Result<Self, MonitorError> {
        config.validate()?;

        let state = MonitorState::shared(config.history_capacity);
        let logger = StructuredLogger::new("perfmon");
        let coordinator = Arc::new(RemediationCoordinator::new(
            Arc::clone(&state),
            config.cooldown,
            logger.clone(),
        ));

        Ok(Self {
            config,
            state,
            probes: Arc::new(ProbeRegistry::new()),
            coordinator,
            logger,
            task: Mutex::new(None),
        })
    }

    /// Create a controller with the default configuration
    pub fn with_defaults() -> Result<Self, MonitorError> {
        Self::new(MonitorConfig::default())
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Register a probe under a metric name
    pub fn register_probe(
        &self,
        metric: impl Into<String>,
        probe: Arc<dyn MetricProbe>,
    ) -> Result<(), MonitorError> {
        self.probes.register(metric, probe)
    }

    /// Register a remediation handler for an action category
    pub fn register_remediation(
        &self,
        category: impl Into<String>,
        handler: Arc<dyn RemediationHandler>,
    ) -> Result<(), MonitorError> {
        self.coordinator.register(category, handler)
    }

    /// Start the periodic sampling task; a no-op if already running
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(running) = task.as_ref() {
            if !running.handle.is_finished() {
                debug!("Monitor already started; ignoring");
                return;
            }
        }

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let sampler = Sampler::new(
            Arc::clone(&self.probes),
            Arc::clone(&self.state),
            Arc::clone(&self.coordinator),
            self.config.clone(),
            self.logger.clone(),
        );
        let handle = tokio::spawn(sampler.run(shutdown_rx));

        self.logger
            .log_startup(VERSION, self.config.sample_interval.as_millis() as u64);
        *task = Some(MonitorTask {
            shutdown_tx,
            handle,
        });
    }

    /// Stop the periodic sampling task; a no-op if not running
    ///
    /// Returns immediately: the in-flight cycle is abandoned and any
    /// running remediation pass is left to finish on its own.
    pub fn stop(&self) {
        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(running) = task.take() {
            let _ = running.shutdown_tx.send(());
            running.handle.abort();
            self.logger.log_shutdown("stop requested");
        } else {
            debug!("Monitor not running; ignoring stop");
        }
    }

    /// Whether the sampling task is currently active
    pub fn is_running(&self) -> bool {
        let task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        task.as_ref().map(|t| !t.handle.is_finished()).unwrap_or(false)
    }

    /// Host signal for critical memory pressure; bypasses the cooldown
    pub fn notify_critical_pressure(&self) {
        self.coordinator.notify_critical_pressure();
    }

    /// Point-in-time report over the current state
    pub fn snapshot(&self) -> Report {
        let state = state::read(&self.state);
        report::generate(&state)
    }
}

impl Drop for PerformanceMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HealthClassification;
    use std::time::Duration;

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = MonitorConfig {
            history_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            PerformanceMonitor::new(config),
            Err(MonitorError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_snapshot_before_start() {
        let monitor = PerformanceMonitor::with_defaults().unwrap();
        let report = monitor.snapshot();
        assert_eq!(report.classification, HealthClassification::Good);
        assert!(report.current.is_empty());
    }

    #[tokio::test]
    async fn test_start_stop_lifecycle() {
        let monitor = PerformanceMonitor::new(MonitorConfig {
            sample_interval: Duration::from_millis(10),
            max_sample_interval: Duration::from_millis(40),
            ..Default::default()
        })
        .unwrap();

        assert!(!monitor.is_running());
        monitor.start();
        assert!(monitor.is_running());
        monitor.stop();
        assert!(!monitor.is_running());
    }

    #[tokio::test]
    async fn test_stop_without_start_is_noop() {
        let monitor = PerformanceMonitor::with_defaults().unwrap();
        monitor.stop();
        monitor.stop();
        assert!(!monitor.is_running());
    }

    #[tokio::test]
    async fn test_restart_after_stop() {
        let monitor = PerformanceMonitor::new(MonitorConfig {
            sample_interval: Duration::from_millis(10),
            max_sample_interval: Duration::from_millis(40),
            ..Default::default()
        })
        .unwrap();

        monitor.start();
        monitor.stop();
        monitor.start();
        assert!(monitor.is_running());
        monitor.stop();
    }
}
