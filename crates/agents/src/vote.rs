//! Strategy A: move-vote exchange.

use crate::{AgentConfig, CommsEndpoint, MessageDispatch, TeamAgent};
use packmind_comms::{Message, MessageKind, Network, Payload};
use packmind_search::SearchEngine;
use packmind_types::{AgentId, Clock, JointAction, Priority};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Agent that periodically broadcasts its locally best full joint action and
/// commits to the most-proposed one at decision time.
///
/// Each broadcast carries one candidate move per team member, not just this
/// agent's own; peers vote on whole joint actions. Votes are kept
/// last-writer-wins per peer, so a lost or stale broadcast just means a peer
/// votes with its previous proposal.
pub struct VoteExchangeAgent {
    endpoint: CommsEndpoint<Self>,
    engine: Box<dyn SearchEngine>,
    clock: Arc<dyn Clock>,
    /// Most recent proposal per peer (and own, folded in at decision time).
    received_votes: BTreeMap<AgentId, JointAction>,
    min_broadcast_interval_ms: u64,
    last_broadcast_ms: u64,
    total_simulations: u64,
}

impl VoteExchangeAgent {
    pub fn new(
        id: AgentId,
        network: &Network,
        engine: Box<dyn SearchEngine>,
        config: &AgentConfig,
    ) -> Self {
        let mut endpoint = CommsEndpoint::new(id, network);
        endpoint.register(MessageKind::MoveVote, Self::on_move_vote);
        VoteExchangeAgent {
            endpoint,
            engine,
            clock: network.clock().clone(),
            received_votes: BTreeMap::new(),
            min_broadcast_interval_ms: config.min_broadcast_interval.as_millis() as u64,
            last_broadcast_ms: 0,
            total_simulations: 0,
        }
    }

    fn on_move_vote(&mut self, from: AgentId, payload: Payload) {
        if let Payload::MoveVote(action) = payload {
            debug!(agent = %self.endpoint.id(), %from, "received move vote");
            self.received_votes.insert(from, action);
        }
    }

    /// Broadcast the current best joint action, at most once per configured
    /// minimum interval.
    fn publish_vote(&mut self) {
        let now = self.clock.now_millis();
        if now - self.last_broadcast_ms <= self.min_broadcast_interval_ms {
            return;
        }
        let best = self.engine.best_move();
        debug!(agent = %self.endpoint.id(), "broadcasting move vote");
        self.endpoint
            .broadcast(Priority::Medium, Message::new(Payload::MoveVote(best)), false);
        self.last_broadcast_ms = now;
    }
}

impl MessageDispatch for VoteExchangeAgent {
    fn endpoint(&self) -> &CommsEndpoint<Self> {
        &self.endpoint
    }
}

impl TeamAgent for VoteExchangeAgent {
    fn id(&self) -> AgentId {
        self.endpoint.id()
    }

    fn step(&mut self) {
        self.receive_messages();
        if !self.engine.iterate().is_nan() {
            self.total_simulations += 1;
        }
        self.publish_vote();
    }

    /// Commit to the joint action with the highest vote count.
    ///
    /// Ties break toward the proposal whose earliest proposer has the
    /// smallest id: vote counts are compared first, identity order second.
    fn decide(&mut self) -> JointAction {
        let own = self.engine.best_move();
        self.received_votes.insert(self.endpoint.id(), own);

        // Per distinct joint action: vote count and the smallest proposer id
        // (peers iterate in id order, so the first insert wins).
        let mut tally: BTreeMap<&JointAction, (u64, AgentId)> = BTreeMap::new();
        for (proposer, action) in &self.received_votes {
            tally
                .entry(action)
                .and_modify(|(count, _)| *count += 1)
                .or_insert((1, *proposer));
        }

        let mut best: Option<(&JointAction, u64, AgentId)> = None;
        for (action, (count, proposer)) in tally {
            let better = match best {
                None => true,
                Some((_, best_count, best_proposer)) => {
                    count > best_count || (count == best_count && proposer < best_proposer)
                }
            };
            if better {
                best = Some((action, count, proposer));
            }
        }

        match best {
            Some((action, ..)) => action.clone(),
            None => JointAction::neutral(self.endpoint.team_size()),
        }
    }

    fn clear(&mut self) {
        self.received_votes.clear();
        self.last_broadcast_ms = 0;
        self.total_simulations = 0;
    }

    fn total_simulations(&self) -> u64 {
        self.total_simulations
    }
}
