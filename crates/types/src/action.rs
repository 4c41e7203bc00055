//! Per-unit moves and the team's combined action.

use crate::AgentId;
use serde::{Deserialize, Serialize};

/// One unit's move on the grid for a single tick.
///
/// `Neutral` is the defined no-op and the fallback when consensus has no
/// data to work with.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
    #[default]
    Neutral,
}

impl Direction {
    /// All moves, in a fixed order.
    pub const ALL: [Direction; 5] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Neutral,
    ];
}

/// The combined set of per-unit moves the team commits to for one tick.
///
/// One entry per team member, indexed by [`AgentId`]. `Ord` and `Hash` let a
/// joint action key vote tallies and snapshot maps; the derived lexicographic
/// order keeps map iteration deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JointAction(Vec<Direction>);

impl JointAction {
    /// The all-neutral joint action for a team of `size` units.
    pub fn neutral(size: usize) -> Self {
        JointAction(vec![Direction::Neutral; size])
    }

    /// Build from explicit per-unit moves, ordered by agent id.
    pub fn from_moves(moves: Vec<Direction>) -> Self {
        JointAction(moves)
    }

    /// Number of units this action covers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The move assigned to `agent`, `Neutral` if the id is out of range.
    pub fn get(&self, agent: AgentId) -> Direction {
        self.0.get(agent.index()).copied().unwrap_or_default()
    }

    /// Assign a move to `agent`. Out-of-range ids are ignored.
    pub fn set(&mut self, agent: AgentId, direction: Direction) {
        if let Some(slot) = self.0.get_mut(agent.index()) {
            *slot = direction;
        }
    }

    /// Iterate `(agent, move)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, Direction)> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(i, d)| (AgentId(i as u8), *d))
    }
}
