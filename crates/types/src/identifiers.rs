//! Agent identity.

use serde::{Deserialize, Serialize};

/// Identifies one unit of the team.
///
/// Ids are dense: a team of `n` agents uses ids `0..n`, so an id can index
/// per-agent vectors directly via [`AgentId::index`]. The derived `Ord` is
/// load-bearing: consensus tie-breaks resolve to the smallest id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct AgentId(pub u8);

impl AgentId {
    /// Position of this agent in team-indexed storage.
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// The ids of a team of `size` agents, in order.
    pub fn team(size: u8) -> Vec<AgentId> {
        (0..size).map(AgentId).collect()
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "agent-{}", self.0)
    }
}
