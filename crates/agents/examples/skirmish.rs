//! Minimal end-to-end run: a three-unit team reaching a joint decision over
//! bandwidth-limited links on a virtual clock.
//!
//! Run with logging to watch the exchange:
//!
//! ```sh
//! RUST_LOG=debug cargo run -p packmind-agents --example skirmish
//! ```

use packmind_agents::{AgentConfig, TeamAgent, TeamController, VoteExchangeAgent};
use packmind_comms::{CommsConfig, Network};
use packmind_test_helpers::ScriptedEngine;
use packmind_types::{AgentId, Direction, JointAction, VirtualClock};
use std::sync::Arc;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let clock = Arc::new(VirtualClock::new());
    let team = AgentId::team(3);
    let network = Network::new(&team, &CommsConfig::default(), clock.clone());

    // Two units' local searches favor a joint push upward, one favors left.
    let bests = [
        JointAction::from_moves(vec![Direction::Up; 3]),
        JointAction::from_moves(vec![Direction::Up; 3]),
        JointAction::from_moves(vec![Direction::Left; 3]),
    ];
    let agents: Vec<Box<dyn TeamAgent>> = bests
        .iter()
        .enumerate()
        .map(|(i, best)| {
            let engine = Box::new(ScriptedEngine::new(3).with_best(best.clone()));
            Box::new(VoteExchangeAgent::new(
                AgentId(i as u8),
                &network,
                engine,
                &AgentConfig::default(),
            )) as Box<dyn TeamAgent>
        })
        .collect();

    let mut controller = TeamController::new(network, agents);

    // One simulated decision window: tick at 5 ms granularity for 100 ms.
    for _ in 0..20 {
        controller.step();
        clock.advance(std::time::Duration::from_millis(5));
    }

    let decision = controller.decide();
    for (agent, direction) in decision.iter() {
        println!("{agent} -> {direction:?}");
    }
}
