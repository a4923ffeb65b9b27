//! Periodic sampling loop
//!
//! One background task per controller drives the full cycle: read every
//! registered probe, record the readings, run the threshold policy, hand
//! the evaluation to the remediation coordinator. Probe reads happen
//! outside the state lock so slow sensors never block snapshot readers.
//!
//! The interval adapts to health: while the system is classified
//! Excellent or Good it widens up to a configured maximum to reduce
//! overhead, and on NeedsOptimization it snaps back to the base interval.

use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::models::HealthClassification;
use crate::observability::{MonitorMetrics, StructuredLogger};
use crate::policy;
use crate::probe::ProbeRegistry;
use crate::remediation::RemediationCoordinator;
use crate::state::{self, SharedState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, info};

/// Factor by which the interval widens while the system stays healthy
const WIDEN_FACTOR: f64 = 1.5;

/// The sampling loop for one controller
pub struct Sampler {
    probes: Arc<ProbeRegistry>,
    state: SharedState,
    coordinator: Arc<RemediationCoordinator>,
    config: MonitorConfig,
    metrics: MonitorMetrics,
    logger: StructuredLogger,
}

impl Sampler {
    pub fn new(
        probes: Arc<ProbeRegistry>,
        state: SharedState,
        coordinator: Arc<RemediationCoordinator>,
        config: MonitorConfig,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            probes,
            state,
            coordinator,
            config,
            metrics: MonitorMetrics::new(),
            logger,
        }
    }

    /// Run until the shutdown channel fires
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        info!(
            interval_ms = self.config.sample_interval.as_millis() as u64,
            "Starting sampling loop"
        );

        let mut current_interval = self.config.sample_interval;

        loop {
            tokio::select! {
                _ = tokio::time::sleep(current_interval) => {
                    let start = Instant::now();
                    let classification = self.sample_cycle().await;
                    self.metrics.observe_cycle_latency(start.elapsed().as_secs_f64());

                    let next = self.next_interval(current_interval, classification);
                    if next != current_interval {
                        debug!(
                            from_ms = current_interval.as_millis() as u64,
                            to_ms = next.as_millis() as u64,
                            classification = %classification,
                            "Adjusting sampling interval"
                        );
                        current_interval = next;
                    }
                }
                _ = shutdown.recv() => {
                    info!("Shutting down sampling loop");
                    break;
                }
            }
        }
    }

    /// One full cycle: probe, record, evaluate, coordinate
    async fn sample_cycle(&self) -> HealthClassification {
        let probes = self.probes.list();
        self.metrics.set_metrics_monitored(probes.len() as i64);

        let mut readings = Vec::with_capacity(probes.len());
        for (metric, probe) in probes {
            match probe.read().await {
                Ok(value) => readings.push((metric, value)),
                Err(source) => {
                    self.metrics.inc_probe_errors();
                    let error = MonitorError::Probe { metric, source };
                    debug!(error = %error, "Probe read failed; skipping sample");
                }
            }
        }

        let timestamp = chrono::Utc::now().timestamp();
        let recorded = readings.len() as u64;

        let (previous, classification, actions) = {
            let mut state = state::write(&self.state);
            for (metric, value) in &readings {
                state.record(metric, *value, timestamp);
            }
            let aggregates = state.aggregates();
            let (classification, actions) = policy::evaluate(&self.config, &aggregates);
            let previous = state.last_classification();
            state.apply_evaluation(classification, actions.clone());
            (previous, classification, actions)
        };

        self.metrics.add_samples_recorded(recorded);
        self.metrics.set_classification(classification);
        if classification != previous {
            self.logger.log_classification_change(previous, classification);
        }

        self.coordinator.on_evaluation(classification, &actions);
        classification
    }

    fn next_interval(
        &self,
        current: Duration,
        classification: HealthClassification,
    ) -> Duration {
        match classification {
            HealthClassification::NeedsOptimization => self.config.sample_interval,
            HealthClassification::Fair => current,
            HealthClassification::Excellent | HealthClassification::Good => current
                .mul_f64(WIDEN_FACTOR)
                .min(self.config.max_sample_interval),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metrics;
    use crate::probe::{async_trait, MetricProbe};
    use crate::state::MonitorState;
    use anyhow::{anyhow, Result};

    struct FixedProbe(f64);

    #[async_trait]
    impl MetricProbe for FixedProbe {
        async fn read(&self) -> Result<f64> {
            Ok(self.0)
        }
    }

    struct BrokenProbe;

    #[async_trait]
    impl MetricProbe for BrokenProbe {
        async fn read(&self) -> Result<f64> {
            Err(anyhow!("sensor offline"))
        }
    }

    fn sampler(config: MonitorConfig, probes: Arc<ProbeRegistry>) -> (Sampler, SharedState) {
        let state = MonitorState::shared(config.history_capacity);
        let logger = StructuredLogger::new("test");
        let coordinator = Arc::new(RemediationCoordinator::new(
            Arc::clone(&state),
            config.cooldown,
            logger.clone(),
        ));
        let sampler = Sampler::new(probes, Arc::clone(&state), coordinator, config, logger);
        (sampler, state)
    }

    #[tokio::test]
    async fn test_cycle_records_all_probes() {
        let probes = Arc::new(ProbeRegistry::new());
        probes
            .register(metrics::CPU_PERCENT, Arc::new(FixedProbe(20.0)))
            .unwrap();
        probes
            .register(metrics::FPS, Arc::new(FixedProbe(58.0)))
            .unwrap();

        let (sampler, state) = sampler(MonitorConfig::default(), probes);
        let classification = sampler.sample_cycle().await;

        assert_eq!(classification, HealthClassification::Excellent);
        let state = state::read(&state);
        assert_eq!(state.history(metrics::CPU_PERCENT).unwrap().len(), 1);
        assert_eq!(state.history(metrics::FPS).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failing_probe_skips_only_its_metric() {
        let probes = Arc::new(ProbeRegistry::new());
        probes
            .register(metrics::CPU_PERCENT, Arc::new(BrokenProbe))
            .unwrap();
        probes
            .register(metrics::FPS, Arc::new(FixedProbe(58.0)))
            .unwrap();

        let (sampler, state) = sampler(MonitorConfig::default(), probes);
        sampler.sample_cycle().await;

        let state = state::read(&state);
        assert!(state.history(metrics::CPU_PERCENT).is_none());
        assert_eq!(state.history(metrics::FPS).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cycle_with_no_probes_stays_good() {
        let (sampler, _state) = sampler(MonitorConfig::default(), Arc::new(ProbeRegistry::new()));
        assert_eq!(sampler.sample_cycle().await, HealthClassification::Good);
    }

    #[tokio::test]
    async fn test_interval_widens_while_healthy_and_clamps() {
        let config = MonitorConfig {
            sample_interval: Duration::from_secs(2),
            max_sample_interval: Duration::from_secs(5),
            ..Default::default()
        };
        let (sampler, _state) = sampler(config, Arc::new(ProbeRegistry::new()));

        let widened =
            sampler.next_interval(Duration::from_secs(2), HealthClassification::Excellent);
        assert_eq!(widened, Duration::from_secs(3));

        let clamped = sampler.next_interval(Duration::from_secs(4), HealthClassification::Good);
        assert_eq!(clamped, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_interval_resets_on_needs_optimization() {
        let config = MonitorConfig {
            sample_interval: Duration::from_secs(2),
            max_sample_interval: Duration::from_secs(8),
            ..Default::default()
        };
        let (sampler, _state) = sampler(config, Arc::new(ProbeRegistry::new()));

        let reset = sampler.next_interval(
            Duration::from_secs(8),
            HealthClassification::NeedsOptimization,
        );
        assert_eq!(reset, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_interval_holds_on_fair() {
        let (sampler, _state) =
            sampler(MonitorConfig::default(), Arc::new(ProbeRegistry::new()));
        let held = sampler.next_interval(Duration::from_secs(3), HealthClassification::Fair);
        assert_eq!(held, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let (sampler, _state) =
            sampler(MonitorConfig::default(), Arc::new(ProbeRegistry::new()));
        let (tx, rx) = broadcast::channel(1);

        let handle = tokio::spawn(sampler.run(rx));
        tx.send(()).unwrap();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sampler did not stop on shutdown")
            .unwrap();
    }
}
