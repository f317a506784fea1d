//! Trial Setup
//!
//! Builds the agent population and the random interaction topology for one
//! trial. Runs before anything else touches the shared RNG for the trial.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::components::agent::Agent;
use crate::components::network::InteractionNetwork;
use crate::config::TrialConfig;

/// Spawns the population for the configured variant. Every agent starts
/// ignorant: an empty relation, or the uniform distribution.
pub fn build_agents(config: &TrialConfig) -> Vec<Agent> {
    (0..config.agents)
        .map(|id| {
            if config.agent_variant.is_probabilistic() {
                Agent::probabilistic(id, config.states)
            } else {
                Agent::ordinal(id)
            }
        })
        .collect()
}

/// Erdős–Rényi G(n, p) edge set over agent indices: every unordered pair is
/// an edge with probability `connectivity`. The network type does not
/// depend on this choice of generator.
pub fn random_edges(agents: usize, connectivity: f64, rng: &mut SmallRng) -> Vec<(usize, usize)> {
    let mut edges = Vec::new();
    for a in 0..agents {
        for b in (a + 1)..agents {
            if rng.gen::<f64>() < connectivity {
                edges.push((a, b));
            }
        }
    }
    edges
}

/// A fresh network for one trial: new agents, new random topology.
pub fn build_network(config: &TrialConfig, rng: &mut SmallRng) -> InteractionNetwork {
    let agents = build_agents(config);
    let edges = random_edges(config.agents, config.connectivity, rng);
    tracing::debug!(
        agents = config.agents,
        edges = edges.len(),
        "built interaction network"
    );
    InteractionNetwork::new(agents, &edges)
}
