//! Core library for the adaptive performance monitor
//!
//! This crate provides the monitoring-and-control loop:
//! - Periodic metric sampling via pluggable probes
//! - Bounded per-metric sample history with on-demand aggregates
//! - Threshold-based health classification
//! - Cooldown-guarded remediation dispatch
//! - Point-in-time snapshot reports
//! - Health checks and observability

pub mod config;
pub mod controller;
pub mod error;
pub mod health;
pub mod history;
pub mod models;
pub mod observability;
pub mod policy;
pub mod probe;
pub mod remediation;
pub mod report;
pub mod scheduler;
pub mod state;

pub use config::MonitorConfig;
pub use controller::PerformanceMonitor;
pub use error::MonitorError;
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use history::SampleHistory;
pub use models::*;
pub use observability::{MonitorMetrics, StructuredLogger};
pub use probe::{MetricProbe, ProbeRegistry, ProcCpuProbe, ProcMemoryProbe};
pub use remediation::{RemediationCoordinator, RemediationHandler};
