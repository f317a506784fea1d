//! Round Scheduler
//!
//! One round = an evidence phase over the whole population, then a fusion
//! phase over selected edges. Draw order against the shared RNG is fixed:
//! agents in index order first, then edge selection. Reordering draws
//! changes results and is a compatibility break.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::components::agent::{Agent, BeliefUpdate};
use crate::components::ground_truth::GroundTruth;
use crate::components::network::InteractionNetwork;
use crate::config::{AgentVariant, FusionMode, TrialConfig};
use crate::noise::ComparisonErrorTable;
use crate::systems::evidence::{find_ordinal_evidence, quality_evidence};
use crate::systems::fusion::{
    combine_average, combine_bandwidth, combine_product, combine_relations, FusionOutcome,
};

/// What the scheduler decided at the end of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Keep running.
    Continue,
    /// Every agent was in steady state at the fusion decision; the trial is
    /// over and no fusion ran this round.
    Stop,
}

/// Runs one round over the population.
pub fn run_round(
    network: &mut InteractionNetwork,
    truth: &GroundTruth,
    noise_table: Option<&ComparisonErrorTable>,
    config: &TrialConfig,
    rng: &mut SmallRng,
) -> RoundOutcome {
    // Evidence phase: every agent, in index order, may receive one piece of
    // evidence. Convergence is observed after each agent's possible update.
    let mut reached_convergence = true;
    for index in 0..network.agent_count() {
        if rng.gen::<f64>() <= config.evidence_rate {
            apply_evidence(network.agent_mut(index), truth, noise_table, config, rng);
        }
        reached_convergence &= network
            .agent(index)
            .steady_state(config.steady_state_threshold);
    }

    if reached_convergence {
        return RoundOutcome::Stop;
    }
    if config.evidence_only {
        return RoundOutcome::Continue;
    }

    // Fusion phase: consume edges from a working copy so no agent interacts
    // twice in the same round.
    match config.fusion_mode {
        FusionMode::Symmetric => {
            let mut working = network.working_topology();
            for _ in 0..fusion_quota(config, network.agent_count()) {
                let Some((a, b)) = working.select_edge(rng) else {
                    // Edge set exhausted before the quota was filled.
                    return RoundOutcome::Continue;
                };
                fuse_pair(network, a, b, config, rng);
                working.remove_pair(a, b);
            }
        }
    }

    RoundOutcome::Continue
}

/// Edges fused per round: a configured fraction of the population, or the
/// default single edge.
fn fusion_quota(config: &TrialConfig, population: usize) -> usize {
    match config.fusion_rate {
        Some(rate) => (population as f64 * rate) as usize,
        None => 1,
    }
}

fn apply_evidence(
    agent: &mut Agent,
    truth: &GroundTruth,
    noise_table: Option<&ComparisonErrorTable>,
    config: &TrialConfig,
    rng: &mut SmallRng,
) {
    match config.agent_variant {
        AgentVariant::Ordinal | AgentVariant::Bandwidth => {
            let evidence = find_ordinal_evidence(agent.preferences(), truth, noise_table, rng);
            let combined = combine_relations(agent.preferences(), &evidence, config.closure);
            agent.evidential_update(BeliefUpdate::Relation(combined));
        }
        AgentVariant::Probabilistic | AgentVariant::Averaging => {
            let evidence = quality_evidence(truth, config.noise_level, rng);
            if let Some(belief) = agent.belief() {
                let combined = if config.agent_variant == AgentVariant::Probabilistic {
                    combine_product(belief, &evidence)
                } else {
                    combine_average(belief, &evidence)
                };
                agent.evidential_update(BeliefUpdate::Distribution(combined));
            }
        }
    }
}

fn fuse_pair(
    network: &mut InteractionNetwork,
    a: usize,
    b: usize,
    config: &TrialConfig,
    rng: &mut SmallRng,
) {
    match config.agent_variant {
        AgentVariant::Ordinal => {
            let combined = combine_relations(
                network.agent(a).preferences(),
                network.agent(b).preferences(),
                config.closure,
            );
            let (agent_a, agent_b) = network.agent_pair_mut(a, b);
            agent_a.interaction_update(BeliefUpdate::Relation(combined.clone()));
            agent_b.interaction_update(BeliefUpdate::Relation(combined));
        }
        AgentVariant::Bandwidth => {
            let outcome = combine_bandwidth(
                network.agent(a).preferences(),
                network.agent(b).preferences(),
                config.bandwidth_limit,
                config.closure,
                rng,
            );
            let (agent_a, agent_b) = network.agent_pair_mut(a, b);
            match outcome {
                FusionOutcome::Shared(combined) => {
                    agent_a.interaction_update(BeliefUpdate::Relation(combined.clone()));
                    agent_b.interaction_update(BeliefUpdate::Relation(combined));
                }
                FusionOutcome::Split(for_a, for_b) => {
                    agent_a.interaction_update(BeliefUpdate::Relation(for_a));
                    agent_b.interaction_update(BeliefUpdate::Relation(for_b));
                }
            }
        }
        AgentVariant::Probabilistic | AgentVariant::Averaging => {
            let combined = match (network.agent(a).belief(), network.agent(b).belief()) {
                (Some(belief_a), Some(belief_b)) => {
                    if config.agent_variant == AgentVariant::Probabilistic {
                        combine_product(belief_a, belief_b)
                    } else {
                        combine_average(belief_a, belief_b)
                    }
                }
                _ => None,
            };
            let (agent_a, agent_b) = network.agent_pair_mut(a, b);
            agent_a.interaction_update(BeliefUpdate::Distribution(combined.clone()));
            agent_b.interaction_update(BeliefUpdate::Distribution(combined));
        }
    }
}
