//! Search-engine contract consumed by packmind agents.
//!
//! The Monte-Carlo engine itself (node expansion, selection, rollout,
//! backpropagation) is an external collaborator. Agents consume it through
//! the narrow [`SearchEngine`] trait and read the root's shape through
//! [`RootView`], a detached digest rather than a reference into the tree.
//!
//! [`SearchConfig`] carries the engine tuning surface; it is consumed by the
//! experiment harness and passed through, never interpreted here.

mod config;
mod traits;
mod view;

pub use config::SearchConfig;
pub use traits::SearchEngine;
pub use view::{HalfStepBranch, RootView};
