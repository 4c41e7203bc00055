//! Detached view of a search root's shape and statistics.

use packmind_types::{Direction, JointAction, RootSnapshot};
use serde::{Deserialize, Serialize};

/// What the search root looks like right now.
///
/// A digest, not a tree reference: engines build it from the root's
/// immediate children, and agents read it without holding any lock on the
/// tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RootView {
    /// The opponent decides next; team statistics would be premature.
    OpponentTurn,
    /// The team decides next: candidate joint actions with visit counts.
    TeamTurn { actions: Vec<(JointAction, u64)> },
    /// The root straddles the opponent's decision and the team's reply
    /// within a single game tick.
    HalfStep { branches: Vec<HalfStepBranch> },
}

/// One child of a half-step root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HalfStepBranch {
    /// The opponent's move in this subtree is still undecided; nothing under
    /// it is safe to publish yet.
    Undecided,
    /// The opponent's move is committed and the team's replies are
    /// enumerated below it.
    Decided {
        anticipated: Direction,
        actions: Vec<(JointAction, u64)>,
    },
}

impl RootView {
    /// Whether the upcoming turn is this team's to decide (team-turn root or
    /// half-step root). Simulations run against such roots contribute to the
    /// statistics worth exchanging.
    pub fn is_team_decision(&self) -> bool {
        matches!(self, RootView::TeamTurn { .. } | RootView::HalfStep { .. })
    }

    /// Extract the visit-count digest agents broadcast, if the tree shape
    /// permits.
    ///
    /// - Team-turn root: a single branch keyed by the neutral anticipated
    ///   move: the opponent's decision is already behind us.
    /// - Half-step root: one branch per decided opponent move. If any child
    ///   is still undecided the whole snapshot is withheld; partial digests
    ///   would misweight the merge on the receiving side.
    /// - Opponent-turn root: withheld.
    pub fn to_snapshot(&self) -> Option<RootSnapshot> {
        match self {
            RootView::OpponentTurn => None,
            RootView::TeamTurn { actions } => {
                let mut snapshot = RootSnapshot::new();
                for (action, visits) in actions {
                    snapshot.record(Direction::Neutral, action.clone(), *visits);
                }
                Some(snapshot)
            }
            RootView::HalfStep { branches } => {
                let mut snapshot = RootSnapshot::new();
                for branch in branches {
                    match branch {
                        HalfStepBranch::Undecided => return None,
                        HalfStepBranch::Decided {
                            anticipated,
                            actions,
                        } => {
                            for (action, visits) in actions {
                                snapshot.record(*anticipated, action.clone(), *visits);
                            }
                        }
                    }
                }
                Some(snapshot)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(mv: Direction) -> JointAction {
        JointAction::from_moves(vec![mv, mv])
    }

    #[test]
    fn test_opponent_turn_withholds() {
        assert!(RootView::OpponentTurn.to_snapshot().is_none());
    }

    #[test]
    fn test_team_turn_snapshots_under_neutral() {
        let view = RootView::TeamTurn {
            actions: vec![(action(Direction::Up), 7), (action(Direction::Down), 3)],
        };
        let snapshot = view.to_snapshot().unwrap();
        assert_eq!(snapshot.total_visits(), 10);
        let (anticipated, best) = snapshot.best().unwrap();
        assert_eq!(anticipated, Direction::Neutral);
        assert_eq!(best, action(Direction::Up));
    }

    #[test]
    fn test_half_step_snapshots_per_anticipated_move() {
        let view = RootView::HalfStep {
            branches: vec![
                HalfStepBranch::Decided {
                    anticipated: Direction::Left,
                    actions: vec![(action(Direction::Up), 4)],
                },
                HalfStepBranch::Decided {
                    anticipated: Direction::Right,
                    actions: vec![(action(Direction::Down), 9)],
                },
            ],
        };
        let snapshot = view.to_snapshot().unwrap();
        let (anticipated, best) = snapshot.best().unwrap();
        assert_eq!(anticipated, Direction::Right);
        assert_eq!(best, action(Direction::Down));
    }

    #[test]
    fn test_any_undecided_branch_withholds_everything() {
        let view = RootView::HalfStep {
            branches: vec![
                HalfStepBranch::Decided {
                    anticipated: Direction::Left,
                    actions: vec![(action(Direction::Up), 4)],
                },
                HalfStepBranch::Undecided,
            ],
        };
        assert!(view.to_snapshot().is_none());
    }

    #[test]
    fn test_team_decision_shapes() {
        assert!(!RootView::OpponentTurn.is_team_decision());
        assert!(RootView::TeamTurn { actions: vec![] }.is_team_decision());
        assert!(RootView::HalfStep { branches: vec![] }.is_team_decision());
    }
}
