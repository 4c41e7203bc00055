//! Per-unit decision loops and the consensus strategies they run.
//!
//! Each agent owns a local search engine, a message dispatch table resolved
//! once at construction, and references to its incoming/outgoing channels.
//! The tick loop is the same for every strategy:
//!
//! ```text
//! receive_messages() → one unit of search work → conditionally publish
//! ```
//!
//! Two strategies reconcile independently computed search results into one
//! joint decision:
//!
//! - [`VoteExchangeAgent`]: peers exchange their locally best joint action
//!   and the team commits to the most-proposed one
//! - [`RootExchangeAgent`]: peers exchange root visit-count digests and the
//!   team commits to the action with the greatest merged support
//!
//! Both are asynchronous, best-effort forms of distributed consensus with no
//! coordinator, tolerant of message loss and staleness because every use of
//! peer data takes the most recently received state.

mod agent;
mod config;
mod controller;
mod dispatch;
mod root;
mod vote;

pub use agent::TeamAgent;
pub use config::AgentConfig;
pub use controller::TeamController;
pub use dispatch::{CommsEndpoint, Handler, MessageDispatch};
pub use root::RootExchangeAgent;
pub use vote::VoteExchangeAgent;
