//! Daemon configuration

use anyhow::Result;
use monitor_lib::MonitorConfig;
use serde::Deserialize;
use std::time::Duration;

/// Daemon configuration, loaded from PERFMON_* environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    /// API server port for health/metrics/snapshot
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Base sampling interval in seconds
    #[serde(default = "default_sample_interval")]
    pub sample_interval_secs: u64,

    /// Maximum adaptive sampling interval in seconds
    #[serde(default = "default_max_sample_interval")]
    pub max_sample_interval_secs: u64,

    /// Cooldown between remediation triggers in seconds
    #[serde(default = "default_cooldown")]
    pub cooldown_secs: u64,

    /// Average CPU percent above which the cpu action fires
    #[serde(default = "default_cpu_threshold")]
    pub cpu_threshold_percent: f64,

    /// Average resident memory in MiB above which the memory action fires
    #[serde(default = "default_memory_threshold_mib")]
    pub memory_threshold_mib: u64,

    /// Target frame rate for the rendering action
    #[serde(default = "default_fps_target")]
    pub fps_target: f64,

    /// Samples retained per metric
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

fn default_api_port() -> u16 {
    8080
}

fn default_sample_interval() -> u64 {
    2
}

fn default_max_sample_interval() -> u64 {
    8
}

fn default_cooldown() -> u64 {
    30
}

fn default_cpu_threshold() -> f64 {
    70.0
}

fn default_memory_threshold_mib() -> u64 {
    200
}

fn default_fps_target() -> f64 {
    60.0
}

fn default_history_capacity() -> usize {
    100
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            sample_interval_secs: default_sample_interval(),
            max_sample_interval_secs: default_max_sample_interval(),
            cooldown_secs: default_cooldown(),
            cpu_threshold_percent: default_cpu_threshold(),
            memory_threshold_mib: default_memory_threshold_mib(),
            fps_target: default_fps_target(),
            history_capacity: default_history_capacity(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("PERFMON"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }

    /// Convert to the controller configuration
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            cpu_threshold_percent: self.cpu_threshold_percent,
            memory_threshold_bytes: self.memory_threshold_mib * 1024 * 1024,
            fps_target: self.fps_target,
            history_capacity: self.history_capacity,
            sample_interval: Duration::from_secs(self.sample_interval_secs),
            max_sample_interval: Duration::from_secs(self.max_sample_interval_secs),
            cooldown: Duration::from_secs(self.cooldown_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_produce_valid_monitor_config() {
        let config = DaemonConfig::default();
        assert!(config.monitor_config().validate().is_ok());
    }

    #[test]
    fn test_memory_threshold_converts_to_bytes() {
        let config = DaemonConfig {
            memory_threshold_mib: 200,
            ..Default::default()
        };
        assert_eq!(
            config.monitor_config().memory_threshold_bytes,
            200 * 1024 * 1024
        );
    }
}
