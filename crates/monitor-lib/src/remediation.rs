//! Remediation coordination
//!
//! Dispatches registered cleanup handlers when an evaluation comes back as
//! needing optimization. Two guards prevent thrash under sustained
//! pressure: a cooldown since the last trigger, and an at-most-one
//! in-flight pass (a trigger during a running pass is dropped, not queued).
//! The host's critical-memory-pressure signal bypasses the cooldown only.
//!
//! Handlers run on their own task so slow cleanup never blocks the
//! sampling loop, and a handler failure never prevents the remaining
//! handlers from running.

use crate::error::MonitorError;
use crate::models::{categories, HealthClassification, RemediationAction};
use crate::observability::{MonitorMetrics, StructuredLogger};
use crate::state::{self, SharedState};
use anyhow::Result;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub use async_trait::async_trait;

/// Trait for caller-supplied cleanup callbacks, keyed by action category
#[async_trait]
pub trait RemediationHandler: Send + Sync {
    /// Perform the cleanup described by `action`
    ///
    /// Idempotent by contract: a dropped trigger is acceptable because the
    /// next trigger performs the same cleanup.
    async fn remediate(&self, action: &RemediationAction) -> Result<()>;
}

/// Coordinates when and how remediation handlers fire
pub struct RemediationCoordinator {
    handlers: DashMap<String, Arc<dyn RemediationHandler>>,
    state: SharedState,
    cooldown: Duration,
    in_flight: Arc<AtomicBool>,
    metrics: MonitorMetrics,
    logger: StructuredLogger,
}

impl RemediationCoordinator {
    pub fn new(state: SharedState, cooldown: Duration, logger: StructuredLogger) -> Self {
        Self {
            handlers: DashMap::new(),
            state,
            cooldown,
            in_flight: Arc::new(AtomicBool::new(false)),
            metrics: MonitorMetrics::new(),
            logger,
        }
    }

    /// Register a handler for an action category
    pub fn register(
        &self,
        category: impl Into<String>,
        handler: Arc<dyn RemediationHandler>,
    ) -> Result<(), MonitorError> {
        let category = category.into();
        if category.trim().is_empty() {
            return Err(MonitorError::invalid_config(
                "remediation category must not be empty",
            ));
        }
        debug!(category = %category, "Registering remediation handler");
        if self.handlers.insert(category.clone(), handler).is_some() {
            warn!(category = %category, "Replaced previously registered remediation handler");
        }
        Ok(())
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Periodic path: fires only on NeedsOptimization, subject to both guards
    pub fn on_evaluation(
        &self,
        classification: HealthClassification,
        actions: &[RemediationAction],
    ) {
        if classification != HealthClassification::NeedsOptimization {
            return;
        }
        self.trigger(actions.to_vec(), false, "threshold");
    }

    /// Edge-triggered host signal: bypasses the cooldown, not the in-flight
    /// guard, and always carries a high-priority memory action
    pub fn notify_critical_pressure(&self) {
        let mut actions = vec![RemediationAction::critical_pressure()];
        {
            let state = state::read(&self.state);
            for action in state.last_actions() {
                if action.category != categories::MEMORY {
                    actions.push(action.clone());
                }
            }
        }
        self.logger.log_critical_pressure();
        self.trigger(actions, true, "critical_pressure");
    }

    fn trigger(&self, actions: Vec<RemediationAction>, bypass_cooldown: bool, trigger: &'static str) {
        if actions.is_empty() {
            debug!(trigger, "No actions to dispatch");
            return;
        }

        {
            // Cooldown check, in-flight claim and trigger timestamp all
            // happen under one exclusive acquisition so concurrent triggers
            // serialize against each other and against the sampling cycle.
            let mut state = state::write(&self.state);

            if !bypass_cooldown {
                if let Some(last) = state.last_trigger() {
                    if last.elapsed() < self.cooldown {
                        debug!(
                            trigger,
                            remaining_ms = (self.cooldown - last.elapsed()).as_millis() as u64,
                            "Trigger suppressed by cooldown"
                        );
                        return;
                    }
                }
            }

            if self.in_flight.swap(true, Ordering::SeqCst) {
                debug!(trigger, "Remediation pass already in flight; dropping trigger");
                return;
            }

            state.mark_triggered();
        }

        self.metrics.inc_remediations_triggered();
        self.logger.log_remediation_triggered(trigger, actions.len());
        self.dispatch(actions);
    }

    /// Run handlers on their own task, highest priority first
    fn dispatch(&self, mut actions: Vec<RemediationAction>) {
        actions.sort_by_key(|a| a.priority);

        // Resolve handlers up front so the task owns everything it needs
        let resolved: Vec<(RemediationAction, Option<Arc<dyn RemediationHandler>>)> = actions
            .into_iter()
            .map(|action| {
                let handler = self
                    .handlers
                    .get(&action.category)
                    .map(|entry| Arc::clone(entry.value()));
                (action, handler)
            })
            .collect();

        let in_flight = Arc::clone(&self.in_flight);
        let metrics = self.metrics.clone();

        tokio::spawn(async move {
            for (action, handler) in resolved {
                let Some(handler) = handler else {
                    debug!(category = %action.category, "No handler registered; skipping action");
                    continue;
                };
                if let Err(source) = handler.remediate(&action).await {
                    metrics.inc_remediation_errors();
                    let error = MonitorError::Remediation {
                        category: action.category.clone(),
                        source,
                    };
                    warn!(
                        priority = %action.priority,
                        error = %error,
                        "Remediation handler failed"
                    );
                }
            }
            in_flight.store(false, Ordering::SeqCst);
        });
    }
}
