//! Threshold policy
//!
//! Pure classification of aggregated metrics into health tiers plus
//! generation of recommended remediation actions. No side effects; the
//! scheduler calls this once per sampling cycle and the coordinator decides
//! whether anything fires.

use crate::config::MonitorConfig;
use crate::models::{
    categories, metrics, ActionPriority, AggregateStats, HealthClassification, RemediationAction,
};
use std::collections::HashMap;

const MIB: f64 = 1024.0 * 1024.0;

/// Tier thresholds: (cpu below, fps above, memory below)
const EXCELLENT: (f64, f64, f64) = (30.0, 55.0, 100.0 * MIB);
const GOOD: (f64, f64, f64) = (50.0, 45.0, 200.0 * MIB);
const FAIR: (f64, f64, f64) = (70.0, 30.0, 300.0 * MIB);

/// Evaluate aggregates into a classification and a fresh action list
///
/// Metrics with no data are excluded from both classification and action
/// generation; with no data at all the classification defaults to `Good` so
/// a cold start never looks like an emergency.
pub fn evaluate(
    config: &MonitorConfig,
    aggregates: &HashMap<String, AggregateStats>,
) -> (HealthClassification, Vec<RemediationAction>) {
    let avg_cpu = aggregates.get(metrics::CPU_PERCENT).map(|a| a.mean);
    let avg_fps = aggregates.get(metrics::FPS).map(|a| a.mean);
    let avg_memory = aggregates.get(metrics::MEMORY_BYTES).map(|a| a.mean);

    let classification = classify(avg_cpu, avg_fps, avg_memory);
    let actions = recommend(config, avg_cpu, avg_fps, avg_memory);

    (classification, actions)
}

/// First tier whose bounds all available metrics satisfy wins
fn classify(
    avg_cpu: Option<f64>,
    avg_fps: Option<f64>,
    avg_memory: Option<f64>,
) -> HealthClassification {
    if avg_cpu.is_none() && avg_fps.is_none() && avg_memory.is_none() {
        return HealthClassification::Good;
    }

    let tiers = [
        (HealthClassification::Excellent, EXCELLENT),
        (HealthClassification::Good, GOOD),
        (HealthClassification::Fair, FAIR),
    ];

    for (tier, (cpu_max, fps_min, mem_max)) in tiers {
        let cpu_ok = avg_cpu.map(|v| v < cpu_max).unwrap_or(true);
        let fps_ok = avg_fps.map(|v| v > fps_min).unwrap_or(true);
        let mem_ok = avg_memory.map(|v| v < mem_max).unwrap_or(true);
        if cpu_ok && fps_ok && mem_ok {
            return tier;
        }
    }

    HealthClassification::NeedsOptimization
}

/// Per-metric, additive action generation in cpu, rendering, memory order
fn recommend(
    config: &MonitorConfig,
    avg_cpu: Option<f64>,
    avg_fps: Option<f64>,
    avg_memory: Option<f64>,
) -> Vec<RemediationAction> {
    let mut actions = Vec::new();

    if let Some(cpu) = avg_cpu {
        if cpu > config.cpu_threshold_percent {
            actions.push(RemediationAction::new(
                categories::CPU,
                ActionPriority::High,
                format!(
                    "average CPU {:.1}% exceeds {:.1}%; shed or defer background work",
                    cpu, config.cpu_threshold_percent
                ),
            ));
        }
    }

    if let Some(fps) = avg_fps {
        if fps < config.fps_floor() {
            actions.push(RemediationAction::new(
                categories::RENDERING,
                ActionPriority::High,
                format!(
                    "average frame rate {:.1} below {:.1}; reduce render workload",
                    fps,
                    config.fps_floor()
                ),
            ));
        }
    }

    if let Some(memory) = avg_memory {
        if memory > config.memory_threshold_bytes as f64 {
            actions.push(RemediationAction::new(
                categories::MEMORY,
                ActionPriority::Medium,
                format!(
                    "average resident memory {:.1} MiB exceeds {:.1} MiB; release caches",
                    memory / MIB,
                    config.memory_threshold_bytes as f64 / MIB
                ),
            ));
        }
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(mean: f64) -> AggregateStats {
        AggregateStats {
            mean,
            min: mean,
            max: mean,
            count: 10,
        }
    }

    fn aggregates(cpu: f64, fps: f64, memory_mib: f64) -> HashMap<String, AggregateStats> {
        HashMap::from([
            (metrics::CPU_PERCENT.to_string(), stats(cpu)),
            (metrics::FPS.to_string(), stats(fps)),
            (metrics::MEMORY_BYTES.to_string(), stats(memory_mib * MIB)),
        ])
    }

    #[test]
    fn test_excellent_when_all_within_bounds() {
        let config = MonitorConfig::default();
        let (classification, actions) = evaluate(&config, &aggregates(20.0, 58.0, 80.0));
        assert_eq!(classification, HealthClassification::Excellent);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_tier_degrades_monotonically_with_cpu() {
        // Fixed FPS/memory: rising CPU must never improve the tier
        let config = MonitorConfig::default();
        let levels = [20.0, 40.0, 60.0, 80.0];
        let classifications: Vec<_> = levels
            .iter()
            .map(|cpu| evaluate(&config, &aggregates(*cpu, 58.0, 80.0)).0)
            .collect();

        assert_eq!(classifications[0], HealthClassification::Excellent);
        assert_eq!(classifications[1], HealthClassification::Good);
        assert_eq!(classifications[2], HealthClassification::Fair);
        assert_eq!(classifications[3], HealthClassification::NeedsOptimization);
        for pair in classifications.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_single_bad_metric_drags_tier_down() {
        let config = MonitorConfig::default();
        let (classification, _) = evaluate(&config, &aggregates(20.0, 58.0, 350.0));
        assert_eq!(classification, HealthClassification::NeedsOptimization);
    }

    #[test]
    fn test_cold_start_defaults_to_good() {
        let config = MonitorConfig::default();
        let (classification, actions) = evaluate(&config, &HashMap::new());
        assert_eq!(classification, HealthClassification::Good);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_missing_metric_excluded_from_tiers() {
        // Only CPU has data at 60%: Excellent and Good fail, Fair passes
        let config = MonitorConfig::default();
        let agg = HashMap::from([(metrics::CPU_PERCENT.to_string(), stats(60.0))]);
        let (classification, _) = evaluate(&config, &agg);
        assert_eq!(classification, HealthClassification::Fair);
    }

    #[test]
    fn test_actions_in_cpu_rendering_memory_order() {
        let config = MonitorConfig::default();
        let (classification, actions) = evaluate(&config, &aggregates(82.4, 21.0, 250.0));
        assert_eq!(classification, HealthClassification::NeedsOptimization);

        let cats: Vec<&str> = actions.iter().map(|a| a.category.as_str()).collect();
        assert_eq!(
            cats,
            vec![categories::CPU, categories::RENDERING, categories::MEMORY]
        );
        assert_eq!(actions[0].priority, ActionPriority::High);
        assert_eq!(actions[1].priority, ActionPriority::High);
        assert_eq!(actions[2].priority, ActionPriority::Medium);
    }

    #[test]
    fn test_actions_independent_per_metric() {
        let config = MonitorConfig::default();
        // Only memory breaches its action threshold
        let (_, actions) = evaluate(&config, &aggregates(40.0, 58.0, 250.0));
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].category, categories::MEMORY);
    }

    #[test]
    fn test_fresh_actions_each_evaluation() {
        let config = MonitorConfig::default();
        let agg = aggregates(82.0, 20.0, 250.0);
        let (_, first) = evaluate(&config, &agg);
        let (_, second) = evaluate(&config, &agg);
        // Same inputs regenerate the same list, never accumulate
        assert_eq!(first.len(), second.len());
    }
}
