//! Visit-count digest of a search root.

use crate::{Direction, JointAction};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A lightweight digest of local search progress, grouped by anticipated
/// opponent move: `anticipated move → (joint action → visit count)`.
///
/// This is what agents exchange instead of full trees. Merging snapshots
/// sums visit counts per `(anticipated, action)` pair, which is tolerant of
/// loss and staleness: every use of peer data takes "most recently
/// received" rather than requiring acknowledgment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootSnapshot {
    branches: BTreeMap<Direction, BTreeMap<JointAction, u64>>,
}

impl RootSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `visits` to the count for `action` under `anticipated`.
    pub fn record(&mut self, anticipated: Direction, action: JointAction, visits: u64) {
        *self
            .branches
            .entry(anticipated)
            .or_default()
            .entry(action)
            .or_default() += visits;
    }

    /// Sum another snapshot into this one, pairwise.
    pub fn merge(&mut self, other: &RootSnapshot) {
        for (anticipated, actions) in &other.branches {
            let branch = self.branches.entry(*anticipated).or_default();
            for (action, visits) in actions {
                *branch.entry(action.clone()).or_default() += visits;
            }
        }
    }

    /// The anticipated move with the greatest summed visits, and within it
    /// the joint action with the greatest count. `None` when empty.
    ///
    /// Ties resolve to the smaller key (strict-greater scan over ordered
    /// maps), keeping the choice deterministic across agents.
    pub fn best(&self) -> Option<(Direction, JointAction)> {
        let mut best_branch: Option<(Direction, u64)> = None;
        for (anticipated, actions) in &self.branches {
            let total: u64 = actions.values().sum();
            if best_branch.map_or(true, |(_, t)| total > t) {
                best_branch = Some((*anticipated, total));
            }
        }
        let (anticipated, _) = best_branch?;

        let mut best_action: Option<(&JointAction, u64)> = None;
        for (action, visits) in self.branches.get(&anticipated)? {
            if best_action.map_or(true, |(_, v)| *visits > v) {
                best_action = Some((action, *visits));
            }
        }
        best_action.map(|(action, _)| (anticipated, action.clone()))
    }

    /// Total visits recorded across all branches.
    pub fn total_visits(&self) -> u64 {
        self.branches
            .values()
            .flat_map(|actions| actions.values())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Iterate branches in anticipated-move order.
    pub fn branches(
        &self,
    ) -> impl Iterator<Item = (Direction, &BTreeMap<JointAction, u64>)> + '_ {
        self.branches.iter().map(|(d, m)| (*d, m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(moves: &[Direction]) -> JointAction {
        JointAction::from_moves(moves.to_vec())
    }

    #[test]
    fn test_merge_sums_pairwise() {
        let a = action(&[Direction::Up, Direction::Up]);
        let b = action(&[Direction::Down, Direction::Down]);

        let mut left = RootSnapshot::new();
        left.record(Direction::Neutral, a.clone(), 5);
        left.record(Direction::Neutral, b.clone(), 3);

        let mut right = RootSnapshot::new();
        right.record(Direction::Neutral, a.clone(), 2);
        right.record(Direction::Neutral, b.clone(), 4);

        left.merge(&right);
        let branch: Vec<u64> = left
            .branches()
            .flat_map(|(_, actions)| actions.values().copied().collect::<Vec<_>>())
            .collect();
        assert_eq!(branch, vec![7, 7]);
    }

    #[test]
    fn test_best_prefers_highest_summed_branch() {
        let a = action(&[Direction::Up]);
        let b = action(&[Direction::Down]);

        // Left branch totals 4, Up branch totals 9.
        let mut snap = RootSnapshot::new();
        snap.record(Direction::Left, a.clone(), 4);
        snap.record(Direction::Up, a.clone(), 3);
        snap.record(Direction::Up, b.clone(), 6);

        let (anticipated, chosen) = snap.best().unwrap();
        assert_eq!(anticipated, Direction::Up);
        assert_eq!(chosen, b);
    }

    #[test]
    fn test_best_of_empty_is_none() {
        assert!(RootSnapshot::new().best().is_none());
        assert_eq!(RootSnapshot::new().total_visits(), 0);
    }
}
