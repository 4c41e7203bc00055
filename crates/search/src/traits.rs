//! The engine contract.

use crate::RootView;
use packmind_types::JointAction;

/// Narrow contract between an agent and its local Monte-Carlo engine.
///
/// Synchronous and deterministic from the agent's point of view: one
/// [`iterate`](SearchEngine::iterate) call is one unit of search work, run
/// inline on the agent's tick.
pub trait SearchEngine: Send {
    /// Advance the search by one unit of work.
    ///
    /// Returns the rollout's quality signal, or `NaN` when no playout was
    /// actually performed this call; callers must not count a `NaN` return
    /// toward simulation totals.
    fn iterate(&mut self) -> f64;

    /// The current shape and statistics of the search root.
    fn root(&self) -> RootView;

    /// The locally best joint action under current statistics.
    fn best_move(&self) -> JointAction;
}
