//! Engine tuning surface.

use serde::{Deserialize, Serialize};

/// Tuning values for a Monte-Carlo search engine.
///
/// Plain configuration, consumed by the engine behind the
/// [`SearchEngine`](crate::SearchEngine) contract; the coordination core
/// never reads these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum rollout depth in game ticks.
    pub simulation_depth: u32,
    /// Exploration coefficient of the selection policy.
    pub exploration_coef: f64,
    /// Penalty weight applied to rollouts ending in a unit's death.
    pub death_weight: f64,
    /// Probability of choosing a uniformly random move during rollout.
    pub random_rollout_prob: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            simulation_depth: 120,
            exploration_coef: 0.3,
            death_weight: 0.25,
            random_rollout_prob: 1.0,
        }
    }
}
