//! perfmond - adaptive performance monitoring daemon
//!
//! Embeds the monitor controller, samples the daemon's own process via the
//! built-in procfs probes, and exposes health, metrics and snapshot
//! endpoints over HTTP. Hosts with a rendering loop or richer sensors
//! register their own probes and remediation handlers through monitor-lib.

use anyhow::Result;
use monitor_lib::probe::async_trait;
use monitor_lib::{
    categories, health::components, metrics, HealthRegistry, PerformanceMonitor, ProcCpuProbe,
    ProcMemoryProbe, RemediationAction, RemediationHandler,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

/// Default handler that surfaces recommended actions in the log stream
///
/// Real deployments replace this with handlers that actually release the
/// resources the action names.
struct LoggingRemediation;

#[async_trait]
impl RemediationHandler for LoggingRemediation {
    async fn remediate(&self, action: &RemediationAction) -> Result<()> {
        warn!(
            category = %action.category,
            priority = %action.priority,
            description = %action.description,
            "Remediation requested"
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting perfmond");

    // Load configuration
    let config = config::DaemonConfig::load()?;
    info!(
        api_port = config.api_port,
        sample_interval_secs = config.sample_interval_secs,
        "Daemon configured"
    );

    // Construct the controller; configuration errors fail fast here
    let monitor = Arc::new(PerformanceMonitor::new(config.monitor_config())?);

    // Built-in probes for this process; fps stays unregistered because a
    // daemon has no frame source, and the policy excludes it accordingly
    monitor.register_probe(metrics::CPU_PERCENT, Arc::new(ProcCpuProbe::new()))?;
    monitor.register_probe(metrics::MEMORY_BYTES, Arc::new(ProcMemoryProbe::new()))?;

    for category in [categories::CPU, categories::RENDERING, categories::MEMORY] {
        monitor.register_remediation(category, Arc::new(LoggingRemediation))?;
    }

    // Initialize health registry
    let health_registry = HealthRegistry::new();
    health_registry.register(components::SAMPLER).await;
    health_registry.register(components::PROBES).await;
    health_registry.register(components::REMEDIATION).await;

    // Start sampling and mark ready
    monitor.start();
    health_registry.set_ready(true).await;

    // Start health/metrics/snapshot server
    let app_state = Arc::new(api::AppState::new(
        Arc::clone(&monitor),
        health_registry.clone(),
    ));
    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("SIGINT received, shutting down");

    monitor.stop();
    api_handle.abort();

    Ok(())
}
