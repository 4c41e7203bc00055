//! The set of links between every agent pair, plus the shared clock.

use crate::{Channel, Message};
use packmind_types::{AgentId, Clock, Priority};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Link parameters applied to every channel in a network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommsConfig {
    /// Channel throughput in bytes per second.
    pub transmission_speed: u64,
    /// Sending buffer capacity in bytes.
    pub buffer_capacity: u64,
}

impl Default for CommsConfig {
    fn default() -> Self {
        CommsConfig {
            transmission_speed: 1024,
            buffer_capacity: 8192,
        }
    }
}

/// Error returned when a network operation names an unknown link.
///
/// This is the only erroneous misuse of the substrate; everything else
/// (overflow eviction, undeliverable stale state) is lossy by design and
/// not surfaced as an error.
#[derive(Debug, thiserror::Error)]
pub enum CommsError {
    #[error("no channel from {from} to {to}")]
    UnknownChannel { from: AgentId, to: AgentId },
}

/// One directional channel per ordered agent pair, plus one shared clock so
/// every link advances on a consistent time basis.
///
/// Constructed once per episode; [`Network::clear`] resets all channels
/// between episodes. Channels are handed out as `Arc`s so agents can hold
/// their own incoming/outgoing references; every channel operation is
/// internally serialized, so no further coordination is needed.
pub struct Network {
    team: Vec<AgentId>,
    channels: BTreeMap<(AgentId, AgentId), Arc<Channel>>,
    clock: Arc<dyn Clock>,
}

impl Network {
    /// Build a fully connected network over `team`.
    pub fn new(team: &[AgentId], config: &CommsConfig, clock: Arc<dyn Clock>) -> Self {
        let mut channels = BTreeMap::new();
        for &from in team {
            for &to in team {
                if from == to {
                    continue;
                }
                let channel = Channel::new(
                    format!("{from}->{to}"),
                    config.transmission_speed,
                    config.buffer_capacity,
                    clock.clone(),
                );
                channels.insert((from, to), Arc::new(channel));
            }
        }
        Network {
            team: team.to_vec(),
            channels,
            clock,
        }
    }

    pub fn team(&self) -> &[AgentId] {
        &self.team
    }

    /// The clock every channel in this network reads.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// The channel carrying messages from `from` to `to`, if it exists.
    pub fn channel(&self, from: AgentId, to: AgentId) -> Option<Arc<Channel>> {
        self.channels.get(&(from, to)).cloned()
    }

    /// All channels leaving `from`, in peer-id order.
    pub fn outgoing(&self, from: AgentId) -> Vec<(AgentId, Arc<Channel>)> {
        self.channels
            .iter()
            .filter(|((f, _), _)| *f == from)
            .map(|((_, t), ch)| (*t, ch.clone()))
            .collect()
    }

    /// All channels arriving at `to`, in peer-id order.
    pub fn incoming(&self, to: AgentId) -> Vec<(AgentId, Arc<Channel>)> {
        self.channels
            .iter()
            .filter(|((_, t), _)| *t == to)
            .map(|((f, _), ch)| (*f, ch.clone()))
            .collect()
    }

    /// Point-to-point send.
    pub fn send(
        &self,
        from: AgentId,
        to: AgentId,
        priority: Priority,
        message: Message,
    ) -> Result<(), CommsError> {
        let channel = self
            .channel(from, to)
            .ok_or(CommsError::UnknownChannel { from, to })?;
        channel.send(priority, message);
        Ok(())
    }

    /// Fan out to every peer channel of `from`.
    ///
    /// Not atomic as a whole: each per-channel send is its own serialized
    /// operation, and some peers' buffers may evict while others accept.
    pub fn broadcast(
        &self,
        from: AgentId,
        priority: Priority,
        message: Message,
    ) -> Result<(), CommsError> {
        if !self.team.contains(&from) {
            return Err(CommsError::UnknownChannel { from, to: from });
        }
        for (_, channel) in self.outgoing(from) {
            channel.send(priority, message.clone());
        }
        Ok(())
    }

    /// Reset every channel. Used between episodes.
    pub fn clear(&self) {
        for channel in self.channels.values() {
            channel.clear();
        }
    }
}

impl std::fmt::Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network")
            .field("team", &self.team)
            .field("channels", &self.channels.len())
            .finish()
    }
}
