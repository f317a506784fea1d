//! Trial Driver
//!
//! Runs rounds until the scheduler signals stop or the iteration cap is
//! reached, recording the round-0 snapshot, optional per-round trajectories,
//! and every agent's terminal state for the evaluator.

use rand::rngs::SmallRng;

use consensus_eval::{metrics, AgentRecord, BatchRecord, ParameterStamp, RoundRecord, TrialRecord};

use crate::components::agent::Agent;
use crate::components::ground_truth::GroundTruth;
use crate::components::network::InteractionNetwork;
use crate::config::{ConfigError, TrialConfig};
use crate::noise::ComparisonErrorTable;
use crate::setup;
use crate::systems::round::{run_round, RoundOutcome};

/// Runs one trial to convergence or the iteration cap.
pub fn run_trial(config: &TrialConfig, trial: usize, rng: &mut SmallRng) -> TrialRecord {
    let truth = GroundTruth::new(config.states);
    let noise_table = config
        .noise_level
        .map(|noise| ComparisonErrorTable::build(config.states, noise));
    let mut network = setup::build_network(config, rng);

    let mut record = TrialRecord::new(trial);
    let log_trajectory = config.log_trajectory();

    // Round-0 snapshot of the freshly initialized population.
    if log_trajectory {
        record.trajectory.push(population_record(0, &network, &truth));
    }

    for round in 1..=config.iteration_limit {
        record.rounds_run = round;
        let outcome = run_round(&mut network, &truth, noise_table.as_ref(), config, rng);

        if log_trajectory {
            record
                .trajectory
                .push(population_record(round, &network, &truth));
        }

        if outcome == RoundOutcome::Stop {
            record.converged_at = Some(round);
            tracing::debug!(trial, round, "population reached steady state");
            break;
        }
    }

    // Terminal states, handed over once; nothing mutates after this.
    record.agents = network
        .agents()
        .iter()
        .map(|agent| agent_record(agent, &truth, config.steady_state_threshold))
        .collect();
    record
}

/// Runs the configured number of independent trials on the shared RNG
/// stream. The configuration is validated before any agent is created.
pub fn run_batch(config: &TrialConfig, seed: Option<u64>, rng: &mut SmallRng) -> Result<BatchRecord, ConfigError> {
    config.validate()?;

    let mut batch = BatchRecord::new(parameter_stamp(config, seed));
    for trial in 0..config.num_trials {
        let record = run_trial(config, trial, rng);
        tracing::info!(
            trial,
            rounds = record.rounds_run,
            converged = record.converged_at.is_some(),
            mean_error = record.mean_error(),
            "trial finished"
        );
        batch.trials.push(record);
    }
    Ok(batch)
}

fn parameter_stamp(config: &TrialConfig, seed: Option<u64>) -> ParameterStamp {
    ParameterStamp {
        agents: config.agents,
        states: config.states,
        connectivity: config.connectivity,
        evidence_rate: config.evidence_rate,
        noise_level: config.noise_level,
        fusion_rate: config.fusion_rate,
        variant: config.agent_variant.name().to_string(),
        closure: config.closure,
        evidence_only: config.evidence_only,
        num_trials: config.num_trials,
        seed,
    }
}

fn agent_record(agent: &Agent, truth: &GroundTruth, threshold: u64) -> AgentRecord {
    AgentRecord {
        agent: agent.id,
        error: metrics::error(agent.preferences().pairs(), truth.relation().pairs()),
        uncertainty: metrics::uncertainty(agent.preferences().pairs(), truth.relation().pairs()),
        preferences: agent.preferences().to_vec(),
        belief: agent.belief().map(|b| b.as_slice().to_vec()),
        evidence_count: agent.evidence_count,
        interaction_count: agent.interaction_count,
        rounds_since_change: agent.rounds_since_change,
        converged: agent.steady_state(threshold),
    }
}

fn population_record(round: u64, network: &InteractionNetwork, truth: &GroundTruth) -> RoundRecord {
    let population = network.agent_count() as f64;
    let mut mean_error = 0.0;
    let mut mean_uncertainty = 0.0;
    let mut mean_belief: Option<Vec<f64>> = None;

    for agent in network.agents() {
        mean_error += metrics::error(agent.preferences().pairs(), truth.relation().pairs());
        mean_uncertainty +=
            metrics::uncertainty(agent.preferences().pairs(), truth.relation().pairs());

        if let Some(belief) = agent.belief() {
            let sums = mean_belief.get_or_insert_with(|| vec![0.0; belief.len()]);
            for (sum, mass) in sums.iter_mut().zip(belief.iter()) {
                *sum += mass;
            }
        }
    }

    mean_error /= population;
    mean_uncertainty /= population;
    if let Some(sums) = mean_belief.as_mut() {
        for sum in sums.iter_mut() {
            *sum /= population;
        }
    }

    RoundRecord {
        round,
        mean_error,
        mean_uncertainty,
        mean_belief,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentVariant;
    use rand::SeedableRng;

    fn fast_config() -> TrialConfig {
        TrialConfig {
            states: 3,
            agents: 10,
            connectivity: 1.0,
            evidence_rate: 1.0,
            steady_state_threshold: 5,
            iteration_limit: 300,
            num_trials: 2,
            ..TrialConfig::default()
        }
    }

    #[test]
    fn test_trial_converges_and_records_terminal_states() {
        let config = fast_config();
        let mut rng = SmallRng::seed_from_u64(128);

        let record = run_trial(&config, 0, &mut rng);

        assert!(record.converged_at.is_some());
        assert_eq!(record.agents.len(), 10);
        assert!(record.fully_converged());
        // Noise-free evidence at rate 1 drives everyone to the exact truth.
        for agent in &record.agents {
            assert_eq!(agent.error, 0.0);
            assert_eq!(agent.uncertainty, 0.0);
        }
    }

    #[test]
    fn test_trajectory_starts_at_round_zero_fully_ignorant() {
        let config = fast_config();
        assert!(config.log_trajectory());
        let mut rng = SmallRng::seed_from_u64(9);

        let record = run_trial(&config, 0, &mut rng);

        let first = &record.trajectory[0];
        assert_eq!(first.round, 0);
        assert_eq!(first.mean_error, 0.5);
        assert_eq!(first.mean_uncertainty, 1.0);
        assert_eq!(record.trajectory.len() as u64, record.rounds_run + 1);
    }

    #[test]
    fn test_trajectory_skipped_for_unlogged_population() {
        let config = TrialConfig {
            agents: 7,
            ..fast_config()
        };
        let mut rng = SmallRng::seed_from_u64(9);

        let record = run_trial(&config, 0, &mut rng);
        assert!(record.trajectory.is_empty());
    }

    #[test]
    fn test_probabilistic_trial_records_mean_belief() {
        let config = TrialConfig {
            agent_variant: AgentVariant::Probabilistic,
            iteration_limit: 50,
            ..fast_config()
        };
        let mut rng = SmallRng::seed_from_u64(70);

        let record = run_trial(&config, 0, &mut rng);

        let first = &record.trajectory[0];
        let mean = first.mean_belief.as_ref().unwrap();
        assert_eq!(mean.len(), 3);
        // Round 0: every agent uniform.
        for mass in mean {
            assert!((mass - 1.0 / 3.0).abs() < 1e-9);
        }
        for agent in &record.agents {
            assert!(agent.belief.is_some());
        }
    }

    #[test]
    fn test_batch_rejects_invalid_config_before_running() {
        let config = TrialConfig {
            states: 1,
            ..fast_config()
        };
        let mut rng = SmallRng::seed_from_u64(1);

        assert!(run_batch(&config, Some(1), &mut rng).is_err());
    }

    #[test]
    fn test_batch_runs_every_trial() {
        let config = fast_config();
        let mut rng = SmallRng::seed_from_u64(128);

        let batch = run_batch(&config, Some(128), &mut rng).unwrap();

        assert_eq!(batch.trials.len(), 2);
        assert_eq!(batch.parameters.variant, "ordinal");
        assert_eq!(batch.converged_trials(), 2);
    }
}
