//! Kind-keyed message dispatch.
//!
//! Each agent resolves a table from [`MessageKind`] to a handler once at
//! construction. Dispatch is a plain map lookup on the message's tag; no
//! runtime type inspection anywhere.

use packmind_comms::{Channel, Message, MessageKind, Network, Payload};
use packmind_types::{AgentId, Priority};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// A typed handler: mutates the agent with the sender's identity and the
/// message payload.
pub type Handler<A> = fn(&mut A, AgentId, Payload);

/// An agent's attachment to the network: its channel references and its
/// dispatch table.
///
/// Channels are `Arc`s into the owning [`Network`]; every channel operation
/// is internally serialized, so the endpoint itself needs no locking.
pub struct CommsEndpoint<A> {
    id: AgentId,
    team_size: usize,
    outgoing: Vec<(AgentId, Arc<Channel>)>,
    incoming: Vec<(AgentId, Arc<Channel>)>,
    handlers: HashMap<MessageKind, Handler<A>>,
}

impl<A> CommsEndpoint<A> {
    /// Wire an endpoint for `id` against `network`.
    pub fn new(id: AgentId, network: &Network) -> Self {
        CommsEndpoint {
            id,
            team_size: network.team().len(),
            outgoing: network.outgoing(id),
            incoming: network.incoming(id),
            handlers: HashMap::new(),
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Team size including this agent.
    pub fn team_size(&self) -> usize {
        self.team_size
    }

    /// Register the handler for a message kind. Later registrations replace
    /// earlier ones.
    pub fn register(&mut self, kind: MessageKind, handler: Handler<A>) {
        self.handlers.insert(kind, handler);
    }

    /// Look up the handler for a kind.
    pub fn handler(&self, kind: MessageKind) -> Option<Handler<A>> {
        self.handlers.get(&kind).copied()
    }

    /// Drain every currently delivered message from every incoming channel,
    /// in peer-id order, FIFO per channel.
    pub fn drain_inbound(&self) -> Vec<(AgentId, Message)> {
        let mut inbound = Vec::new();
        for (peer, channel) in &self.incoming {
            while let Some(message) = channel.receive() {
                inbound.push((*peer, message));
            }
        }
        inbound
    }

    /// Send `message` to every peer.
    ///
    /// With `flush_stale` set, any not-yet-transmitted message of the same
    /// kind is first purged from every outgoing channel's send queue,
    /// superseding stale unsent state before publishing fresher state.
    pub fn broadcast(&self, priority: Priority, message: Message, flush_stale: bool) {
        for (_, channel) in &self.outgoing {
            if flush_stale {
                channel.flush_unsent(message.kind());
            }
            channel.send(priority, message.clone());
        }
    }
}

/// Inbound pump shared by every strategy.
///
/// Implementors provide access to their endpoint; the default
/// `receive_messages` drains all delivered messages and dispatches each by
/// kind. A message whose kind has no registered handler is silently dropped
/// and trace-logged for diagnostics, not treated as an error.
pub trait MessageDispatch: Sized {
    fn endpoint(&self) -> &CommsEndpoint<Self>;

    fn receive_messages(&mut self) {
        let inbound = self.endpoint().drain_inbound();
        for (from, message) in inbound {
            let kind = message.kind();
            match self.endpoint().handler(kind) {
                Some(handler) => handler(self, from, message.into_payload()),
                None => trace!(
                    agent = %self.endpoint().id(),
                    kind = kind.name(),
                    "dropping message with no registered handler"
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packmind_comms::CommsConfig;
    use packmind_types::{JointAction, RootSnapshot, VirtualClock};

    struct Recorder {
        endpoint: CommsEndpoint<Self>,
        seen: Vec<(AgentId, MessageKind)>,
    }

    impl Recorder {
        fn new(id: AgentId, network: &Network) -> Self {
            let mut endpoint = CommsEndpoint::new(id, network);
            endpoint.register(MessageKind::MoveVote, Self::on_vote);
            Recorder {
                endpoint,
                seen: Vec::new(),
            }
        }

        fn on_vote(&mut self, from: AgentId, payload: Payload) {
            assert!(matches!(payload, Payload::MoveVote(_)));
            self.seen.push((from, MessageKind::MoveVote));
        }
    }

    impl MessageDispatch for Recorder {
        fn endpoint(&self) -> &CommsEndpoint<Self> {
            &self.endpoint
        }
    }

    fn setup(size: u8) -> (Network, Arc<VirtualClock>) {
        let clock = Arc::new(VirtualClock::new());
        let team = AgentId::team(size);
        let network = Network::new(&team, &CommsConfig::default(), clock.clone());
        (network, clock)
    }

    #[test]
    fn test_registered_kind_is_dispatched_with_sender() {
        let (network, clock) = setup(2);
        let mut recorder = Recorder::new(AgentId(1), &network);

        network
            .send(
                AgentId(0),
                AgentId(1),
                Priority::Medium,
                Message::new(Payload::MoveVote(JointAction::neutral(2))),
            )
            .unwrap();
        clock.advance_millis(1000);

        recorder.receive_messages();
        assert_eq!(recorder.seen, vec![(AgentId(0), MessageKind::MoveVote)]);
    }

    #[test]
    fn test_unregistered_kind_is_silently_dropped() {
        let (network, clock) = setup(2);
        let mut recorder = Recorder::new(AgentId(1), &network);

        network
            .send(
                AgentId(0),
                AgentId(1),
                Priority::Medium,
                Message::new(Payload::RootStats(RootSnapshot::new())),
            )
            .unwrap();
        clock.advance_millis(1000);

        recorder.receive_messages();
        assert!(recorder.seen.is_empty());
    }

    #[test]
    fn test_broadcast_flush_stale_supersedes_unsent() {
        let (network, _clock) = setup(2);
        let recorder = Recorder::new(AgentId(0), &network);
        let vote = || Message::sized(Payload::MoveVote(JointAction::neutral(2)), 600);

        // First broadcast: goes in flight. Second and third: queue up, but
        // flushing supersedes the queued (not the in-flight) copy.
        recorder.endpoint.broadcast(Priority::Medium, vote(), true);
        recorder.endpoint.broadcast(Priority::Medium, vote(), true);
        recorder.endpoint.broadcast(Priority::Medium, vote(), true);

        let channel = network.channel(AgentId(0), AgentId(1)).unwrap();
        assert_eq!(channel.send_queue_items_count(), 2);
    }
}
