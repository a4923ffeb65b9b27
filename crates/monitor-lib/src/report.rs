//! Report generation
//!
//! A report is a pure read over the monitor state: latest sample and
//! aggregates per metric, the last classification and its recommendations,
//! stamped with the generation time. The caller decides how to serialize
//! it; `Report` derives serde for that purpose.

use crate::models::Report;
use crate::state::MonitorState;

/// Assemble a point-in-time report from the given state
///
/// Called under the state read lock, so the snapshot is internally
/// consistent: every aggregate was computed from the same buffer contents
/// as the samples it accompanies.
pub fn generate(state: &MonitorState) -> Report {
    Report {
        generated_at: chrono::Utc::now().timestamp(),
        classification: state.last_classification(),
        current: state.latest_samples(),
        aggregates: state.aggregates(),
        recommendations: state.last_actions().to_vec(),
    }
}
