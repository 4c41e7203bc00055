//! The contract a strategy exposes upward.

use packmind_types::{AgentId, JointAction};

/// One unit's decision loop, driven by an external scheduler.
///
/// `step` and `decide` are callable repeatedly under an external real-time
/// or simulated-time budget; `decide` is independent of the tick loop and
/// may be called at any point between steps.
pub trait TeamAgent: Send {
    fn id(&self) -> AgentId;

    /// Advance one tick: drain inbound channels, run one unit of search
    /// work, conditionally publish updated state.
    fn step(&mut self);

    /// The full joint action this agent currently commits to.
    fn decide(&mut self) -> JointAction;

    /// Drop transient caches and statistics for an episode reset.
    fn clear(&mut self);

    /// Playouts actually performed so far (iterations that returned `NaN`
    /// are excluded).
    fn total_simulations(&self) -> u64;
}
