//! Bandwidth-limited simulated communication substrate.
//!
//! Models a fixed, known set of peers connected by independent point-to-point
//! simulated links. Each link has finite byte throughput and a bounded,
//! priority-aware send buffer that evicts on overflow, making each link a
//! lossy, best-effort transport by design. There is no retransmission and no backpressure;
//! reliability is the responsibility of "use latest received state" semantics
//! in the layers above.
//!
//! - [`Message`]: tagged payload plus a byte length used only for bandwidth
//!   accounting
//! - [`PrioritySendingQueue`]: bounded multi-level send buffer
//! - [`Channel`]: one directional link, lazily advanced to the current time
//! - [`Network`]: one channel per ordered agent pair plus the shared clock
//!
//! No async runtime dependency. Channel state advances on demand (the
//! catch-up step) whenever any operation touches the channel.

mod channel;
mod message;
mod network;
mod queue;

pub use channel::Channel;
pub use message::{Message, MessageKind, Payload};
pub use network::{CommsConfig, CommsError, Network};
pub use queue::PrioritySendingQueue;
