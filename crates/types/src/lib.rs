//! Foundation types for the packmind joint-decision protocol.
//!
//! This crate provides the types shared by every layer:
//!
//! - **Identifiers**: [`AgentId`], whose total order doubles as the
//!   consensus tie-break
//! - **Actions**: [`Direction`], [`JointAction`]
//! - **Transport**: [`Priority`] levels for the sending queues
//! - **Statistics**: [`RootSnapshot`], the visit-count digest agents exchange
//! - **Time**: the [`Clock`] capability with system and virtual sources
//!
//! # Design Philosophy
//!
//! This crate is self-contained with minimal dependencies. It does not depend
//! on any other workspace crates, making it the foundation layer.

mod action;
mod clock;
mod identifiers;
mod priority;
mod snapshot;

pub use action::{Direction, JointAction};
pub use clock::{Clock, SystemClock, VirtualClock};
pub use identifiers::AgentId;
pub use priority::Priority;
pub use snapshot::RootSnapshot;
