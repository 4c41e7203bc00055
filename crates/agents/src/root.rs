//! Strategy B: root-statistics exchange.

use crate::{CommsEndpoint, MessageDispatch, TeamAgent};
use packmind_comms::{Message, MessageKind, Network, Payload};
use packmind_search::SearchEngine;
use packmind_types::{AgentId, JointAction, Priority, RootSnapshot};
use std::collections::BTreeMap;
use tracing::debug;

/// Agent that exchanges root visit-count digests and commits to the joint
/// action with the greatest merged support.
///
/// Richer than vote exchange: instead of a single proposal, each broadcast
/// carries the root's whole visit distribution grouped by anticipated
/// opponent move. Snapshots are published only when the tree shape indicates
/// the upcoming turn is this team's to decide; otherwise the information is
/// premature and withheld. Stale unsent snapshots are superseded on every
/// publish, so a slow link always carries the freshest digest it can.
pub struct RootExchangeAgent {
    endpoint: CommsEndpoint<Self>,
    engine: Box<dyn SearchEngine>,
    /// Most recent digest per peer (and own, folded in at decision time).
    received_snapshots: BTreeMap<AgentId, RootSnapshot>,
    total_simulations: u64,
    /// Simulations performed while the root was a team decision, the ones
    /// whose statistics were worth exchanging.
    root_simulations: u64,
    /// Running sum of peer visit counts observed at decision time.
    received_visits_total: u64,
}

impl RootExchangeAgent {
    pub fn new(id: AgentId, network: &Network, engine: Box<dyn SearchEngine>) -> Self {
        let mut endpoint = CommsEndpoint::new(id, network);
        endpoint.register(MessageKind::RootStats, Self::on_root_stats);
        RootExchangeAgent {
            endpoint,
            engine,
            received_snapshots: BTreeMap::new(),
            total_simulations: 0,
            root_simulations: 0,
            received_visits_total: 0,
        }
    }

    fn on_root_stats(&mut self, from: AgentId, payload: Payload) {
        if let Payload::RootStats(snapshot) = payload {
            debug!(
                agent = %self.endpoint.id(),
                %from,
                visits = snapshot.total_visits(),
                "received root snapshot"
            );
            self.received_snapshots.insert(from, snapshot);
        }
    }

    /// Broadcast a fresh digest if the tree shape permits, superseding any
    /// stale unsent one.
    fn publish_snapshot(&mut self) {
        let Some(snapshot) = self.engine.root().to_snapshot() else {
            return;
        };
        debug!(
            agent = %self.endpoint.id(),
            visits = snapshot.total_visits(),
            "broadcasting root snapshot"
        );
        self.endpoint.broadcast(
            Priority::Medium,
            Message::new(Payload::RootStats(snapshot)),
            true,
        );
    }

    /// Visit counts currently held from peers (own digest excluded).
    fn peer_visits(&self) -> u64 {
        self.received_snapshots
            .iter()
            .filter(|(peer, _)| **peer != self.endpoint.id())
            .map(|(_, snapshot)| snapshot.total_visits())
            .sum()
    }

    /// Simulations performed while the root was a team decision.
    pub fn root_simulations(&self) -> u64 {
        self.root_simulations
    }

    /// Total peer visit counts observed across decisions.
    pub fn received_visits_total(&self) -> u64 {
        self.received_visits_total
    }
}

impl MessageDispatch for RootExchangeAgent {
    fn endpoint(&self) -> &CommsEndpoint<Self> {
        &self.endpoint
    }
}

impl TeamAgent for RootExchangeAgent {
    fn id(&self) -> AgentId {
        self.endpoint.id()
    }

    fn step(&mut self) {
        self.receive_messages();
        if !self.engine.iterate().is_nan() {
            self.total_simulations += 1;
            if self.engine.root().is_team_decision() {
                self.root_simulations += 1;
            }
        }
        self.publish_snapshot();
    }

    /// Merge own and received digests, then pick the anticipated opponent
    /// move with the greatest summed visits and the joint action with the
    /// greatest sum within it. With no data at all, fall back to neutral.
    fn decide(&mut self) -> JointAction {
        self.received_visits_total += self.peer_visits();

        if let Some(own) = self.engine.root().to_snapshot() {
            self.received_snapshots.insert(self.endpoint.id(), own);
        }

        let mut merged = RootSnapshot::new();
        for snapshot in self.received_snapshots.values() {
            merged.merge(snapshot);
        }

        match merged.best() {
            Some((_, action)) => action,
            None => JointAction::neutral(self.endpoint.team_size()),
        }
    }

    fn clear(&mut self) {
        self.received_snapshots.clear();
        self.total_simulations = 0;
        self.root_simulations = 0;
        self.received_visits_total = 0;
    }

    fn total_simulations(&self) -> u64 {
        self.total_simulations
    }
}
