//! Monitor configuration
//!
//! Immutable after construction; validated once at controller creation so
//! programmer errors surface before any sampling starts.

use crate::error::MonitorError;
use std::time::Duration;

/// Default sampling interval
const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(2);

/// Default upper bound for the adaptive interval
const DEFAULT_MAX_SAMPLE_INTERVAL: Duration = Duration::from_secs(8);

/// Default cooldown between remediation triggers
const DEFAULT_COOLDOWN: Duration = Duration::from_secs(30);

/// Configuration for a monitor controller
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Average CPU percentage above which a CPU remediation action fires
    pub cpu_threshold_percent: f64,
    /// Average resident memory above which a memory action fires
    pub memory_threshold_bytes: u64,
    /// Target frame rate; the rendering action fires below 75% of it
    pub fps_target: f64,
    /// Samples retained per metric (FIFO eviction beyond this)
    pub history_capacity: usize,
    /// Base sampling interval
    pub sample_interval: Duration,
    /// Upper bound the adaptive scheduler may widen the interval to
    pub max_sample_interval: Duration,
    /// Minimum time between remediation triggers
    pub cooldown: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            cpu_threshold_percent: 70.0,
            memory_threshold_bytes: 200 * 1024 * 1024,
            fps_target: 60.0,
            history_capacity: 100,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            max_sample_interval: DEFAULT_MAX_SAMPLE_INTERVAL,
            cooldown: DEFAULT_COOLDOWN,
        }
    }
}

impl MonitorConfig {
    /// Validate the configuration, failing fast on programmer errors
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.sample_interval.is_zero() {
            return Err(MonitorError::invalid_config(
                "sample_interval must be positive",
            ));
        }
        if self.max_sample_interval < self.sample_interval {
            return Err(MonitorError::invalid_config(
                "max_sample_interval must be >= sample_interval",
            ));
        }
        if self.history_capacity == 0 {
            return Err(MonitorError::invalid_config(
                "history_capacity must be > 0",
            ));
        }
        if self.cpu_threshold_percent <= 0.0 {
            return Err(MonitorError::invalid_config(
                "cpu_threshold_percent must be positive",
            ));
        }
        if self.memory_threshold_bytes == 0 {
            return Err(MonitorError::invalid_config(
                "memory_threshold_bytes must be > 0",
            ));
        }
        if self.fps_target <= 0.0 {
            return Err(MonitorError::invalid_config("fps_target must be positive"));
        }
        Ok(())
    }

    /// FPS level below which the rendering action fires
    pub fn fps_floor(&self) -> f64 {
        self.fps_target * 0.75
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(MonitorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = MonitorConfig {
            sample_interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = MonitorConfig {
            history_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_interval_below_base_rejected() {
        let config = MonitorConfig {
            sample_interval: Duration::from_secs(5),
            max_sample_interval: Duration::from_secs(2),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fps_floor_at_default_target() {
        let config = MonitorConfig::default();
        assert!((config.fps_floor() - 45.0).abs() < f64::EPSILON);
    }
}
