//! Agent-level configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a consensus agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Minimum time between two state broadcasts from the same agent.
    ///
    /// Applies to strategies that publish on a timer (vote exchange); the
    /// root-statistics strategy instead publishes whenever the tree shape
    /// permits and supersedes its own unsent state.
    pub min_broadcast_interval: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            min_broadcast_interval: Duration::from_millis(10),
        }
    }
}
