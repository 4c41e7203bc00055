//! Scheduler-facing surface over a team of agents.

use crate::TeamAgent;
use packmind_comms::Network;
use packmind_types::JointAction;

/// Owns the network and the agents, and exposes the upward contract the
/// experiment harness drives: tick everyone, then ask for the committed
/// team decision.
///
/// Each agent commits to a full joint action; the controller assembles the
/// team decision by taking each unit's move from its own agent's commitment.
/// When consensus has converged the per-agent commitments agree and the
/// assembly is just a projection; when it has not, each unit still moves
/// according to its own best information.
pub struct TeamController {
    network: Network,
    agents: Vec<Box<dyn TeamAgent>>,
}

impl TeamController {
    pub fn new(network: Network, agents: Vec<Box<dyn TeamAgent>>) -> Self {
        TeamController { network, agents }
    }

    /// Tick every agent once, in id order.
    pub fn step(&mut self) {
        for agent in &mut self.agents {
            agent.step();
        }
    }

    /// Assemble the team's committed joint action for the current tick.
    pub fn decide(&mut self) -> JointAction {
        let mut team = JointAction::neutral(self.agents.len());
        for agent in &mut self.agents {
            let choice = agent.decide();
            team.set(agent.id(), choice.get(agent.id()));
        }
        team
    }

    /// Reset channel and agent state between episodes.
    pub fn reset(&mut self) {
        self.network.clear();
        for agent in &mut self.agents {
            agent.clear();
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn agents(&self) -> &[Box<dyn TeamAgent>] {
        &self.agents
    }
}
