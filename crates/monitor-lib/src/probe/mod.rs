//! Metric probes
//!
//! Probes are pluggable sources of instantaneous scalar readings. The core
//! treats them as opaque sensors: a probe that fails skips that metric's
//! sample for the cycle and never aborts the loop.

mod system;

pub use system::{ProcCpuProbe, ProcMemoryProbe};

use crate::error::MonitorError;
use anyhow::Result;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub use async_trait::async_trait;

/// Trait for metric probe implementations
#[async_trait]
pub trait MetricProbe: Send + Sync {
    /// Produce one instantaneous reading for this probe's metric
    async fn read(&self) -> Result<f64>;
}

/// Registry of probes keyed by metric name
///
/// Names are validated at registration time; re-registering a name replaces
/// the previous probe.
#[derive(Default)]
pub struct ProbeRegistry {
    probes: DashMap<String, Arc<dyn MetricProbe>>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self {
            probes: DashMap::new(),
        }
    }

    /// Register a probe under a metric name
    pub fn register(
        &self,
        metric: impl Into<String>,
        probe: Arc<dyn MetricProbe>,
    ) -> Result<(), MonitorError> {
        let metric = metric.into();
        if metric.trim().is_empty() {
            return Err(MonitorError::invalid_config(
                "metric name must not be empty",
            ));
        }
        debug!(metric = %metric, "Registering probe");
        if self.probes.insert(metric.clone(), probe).is_some() {
            warn!(metric = %metric, "Replaced previously registered probe");
        }
        Ok(())
    }

    /// Remove a probe, returning whether one was registered
    pub fn unregister(&self, metric: &str) -> bool {
        self.probes.remove(metric).is_some()
    }

    /// Snapshot of all registered probes
    pub fn list(&self) -> Vec<(String, Arc<dyn MetricProbe>)> {
        self.probes
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ConstantProbe {
        value: f64,
        reads: AtomicUsize,
    }

    impl ConstantProbe {
        fn new(value: f64) -> Self {
            Self {
                value,
                reads: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MetricProbe for ConstantProbe {
        async fn read(&self) -> Result<f64> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.value)
        }
    }

    #[test]
    fn test_register_and_list() {
        let registry = ProbeRegistry::new();
        registry
            .register("cpu_percent", Arc::new(ConstantProbe::new(12.0)))
            .unwrap();
        registry
            .register("fps", Arc::new(ConstantProbe::new(60.0)))
            .unwrap();

        assert_eq!(registry.len(), 2);
        let names: Vec<String> = registry.list().into_iter().map(|(n, _)| n).collect();
        assert!(names.contains(&"cpu_percent".to_string()));
        assert!(names.contains(&"fps".to_string()));
    }

    #[test]
    fn test_empty_name_rejected() {
        let registry = ProbeRegistry::new();
        let result = registry.register("  ", Arc::new(ConstantProbe::new(1.0)));
        assert!(matches!(result, Err(MonitorError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_reregistration_replaces() {
        let registry = ProbeRegistry::new();
        registry
            .register("fps", Arc::new(ConstantProbe::new(30.0)))
            .unwrap();
        registry
            .register("fps", Arc::new(ConstantProbe::new(60.0)))
            .unwrap();

        assert_eq!(registry.len(), 1);
        let (_, probe) = registry.list().pop().unwrap();
        assert!((probe.read().await.unwrap() - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unregister() {
        let registry = ProbeRegistry::new();
        registry
            .register("fps", Arc::new(ConstantProbe::new(60.0)))
            .unwrap();
        assert!(registry.unregister("fps"));
        assert!(!registry.unregister("fps"));
        assert!(registry.is_empty());
    }
}
