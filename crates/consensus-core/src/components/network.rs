//! Interaction Network
//!
//! The agent population plus the undirected topology saying who may
//! interact. The topology is fixed for a trial; each round the scheduler
//! takes a working copy and consumes it so no agent interacts twice.

use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::components::agent::Agent;

/// The agents of one trial and the edges along which they may interact.
#[derive(Debug)]
pub struct InteractionNetwork {
    agents: Vec<Agent>,
    topology: StableUnGraph<usize, ()>,
}

impl InteractionNetwork {
    /// Assembles a network from agents and undirected edges over their
    /// indices. Node `i` of the topology carries agent index `i`.
    pub fn new(agents: Vec<Agent>, edges: &[(usize, usize)]) -> Self {
        let mut topology = StableUnGraph::with_capacity(agents.len(), edges.len());
        for index in 0..agents.len() {
            topology.add_node(index);
        }
        for &(a, b) in edges {
            topology.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
        }
        Self { agents, topology }
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn edge_count(&self) -> usize {
        self.topology.edge_count()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, index: usize) -> &Agent {
        &self.agents[index]
    }

    pub fn agent_mut(&mut self, index: usize) -> &mut Agent {
        &mut self.agents[index]
    }

    /// Disjoint mutable access to two distinct agents.
    pub fn agent_pair_mut(&mut self, a: usize, b: usize) -> (&mut Agent, &mut Agent) {
        debug_assert_ne!(a, b);
        if a < b {
            let (left, right) = self.agents.split_at_mut(b);
            (&mut left[a], &mut right[0])
        } else {
            let (left, right) = self.agents.split_at_mut(a);
            (&mut right[0], &mut left[b])
        }
    }

    /// A consumable copy of the topology for one round of edge selection.
    pub fn working_topology(&self) -> WorkingTopology {
        WorkingTopology {
            graph: self.topology.clone(),
        }
    }
}

/// One round's working copy of the topology. Selecting an interaction
/// removes both endpoints, so selection is without replacement at the
/// agent level, not just the edge level.
#[derive(Debug)]
pub struct WorkingTopology {
    graph: StableUnGraph<usize, ()>,
}

impl WorkingTopology {
    /// Picks one remaining edge uniformly at random, or `None` when the
    /// copy is exhausted (a normal end-of-round condition).
    pub fn select_edge(&self, rng: &mut SmallRng) -> Option<(usize, usize)> {
        let edges: Vec<_> = self.graph.edge_indices().collect();
        let &edge = edges.choose(rng)?;
        let (a, b) = self.graph.edge_endpoints(edge)?;
        Some((self.graph[a], self.graph[b]))
    }

    /// Removes both endpoints of a selected interaction, along with every
    /// edge touching them.
    pub fn remove_pair(&mut self, a: usize, b: usize) {
        self.graph.remove_node(NodeIndex::new(a));
        self.graph.remove_node(NodeIndex::new(b));
    }

    pub fn remaining_edges(&self) -> usize {
        self.graph.edge_count()
    }
}
