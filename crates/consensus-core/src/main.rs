//! Consensus Simulation
//!
//! Agents with uncertain beliefs about a true ranking receive noisy evidence
//! and fuse beliefs pairwise over a random interaction network until the
//! population reaches steady state.

use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use consensus_core::config::{AgentVariant, TrialConfig};
use consensus_core::output::write_batch;
use consensus_core::systems::run_batch;

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "consensus_sim")]
#[command(about = "Preference-based consensus formation over a random interaction network")]
struct Args {
    /// Number of alternatives to rank
    states: usize,

    /// Number of agents in the population
    agents: usize,

    /// Edge probability of the random interaction graph, in [0, 1]
    #[arg(short, long, default_value_t = 1.0)]
    connectivity: f64,

    /// Per-agent per-round probability of receiving evidence
    #[arg(long, default_value_t = 0.01)]
    evidence_rate: f64,

    /// Evidence noise level (comparison noise or quality-perturbation sigma)
    #[arg(long)]
    noise: Option<f64>,

    /// Agent variant to simulate
    #[arg(long, value_enum, default_value_t = AgentVariant::Ordinal)]
    variant: AgentVariant,

    /// Pairs transmitted per side for the bandwidth variant
    #[arg(long)]
    bandwidth_limit: Option<usize>,

    /// Transitively close relations after every fusion
    #[arg(long)]
    closure: bool,

    /// Run the evidence phase only, skipping all fusion
    #[arg(long)]
    evidence_only: bool,

    /// Fraction of the population fused per round (default: one edge)
    #[arg(long)]
    fusion_rate: Option<f64>,

    /// Maximum rounds per trial
    #[arg(long, default_value_t = 10_000)]
    iterations: u64,

    /// Unchanged rounds before an agent counts as converged
    #[arg(long, default_value_t = 100)]
    threshold: u64,

    /// Independent trials to run
    #[arg(long, default_value_t = 100)]
    trials: usize,

    /// Seed for the shared RNG
    #[arg(long, default_value_t = 128)]
    seed: u64,

    /// Seed from entropy instead of the fixed default
    #[arg(long)]
    random_seed: bool,

    /// Directory for result files
    #[arg(long, default_value = "output/results")]
    output_dir: PathBuf,

    /// Optional TOML file supplying the remaining configuration
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match TrialConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Could not load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => TrialConfig::default(),
    };

    config.states = args.states;
    config.agents = args.agents;
    config.connectivity = args.connectivity;
    config.evidence_rate = args.evidence_rate;
    config.noise_level = args.noise;
    config.agent_variant = args.variant;
    config.bandwidth_limit = args.bandwidth_limit;
    config.closure = args.closure;
    config.evidence_only = args.evidence_only;
    config.fusion_rate = args.fusion_rate;
    config.iteration_limit = args.iterations;
    config.steady_state_threshold = args.threshold;
    config.num_trials = args.trials;

    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    println!("Consensus Simulation");
    println!("====================");
    println!("Variant: {}", config.agent_variant.name());
    println!("States: {}  Agents: {}", config.states, config.agents);
    println!("Connectivity: {}", config.connectivity);
    println!("Evidence rate: {}", config.evidence_rate);
    match config.noise_level {
        Some(noise) => println!("Noise level: {}", noise),
        None => println!("Noise level: disabled"),
    }
    println!("Closure: {}", config.closure);
    if let Some(rate) = config.fusion_rate {
        println!("Fusion rate: {}", rate);
    }
    if let Some(limit) = config.bandwidth_limit {
        println!("Bandwidth limit: {}", limit);
    }
    println!("Trials: {}", config.num_trials);

    let (seed, mut rng) = if args.random_seed {
        (None, SmallRng::from_entropy())
    } else {
        (Some(args.seed), SmallRng::seed_from_u64(args.seed))
    };
    match seed {
        Some(seed) => println!("Seed: {}", seed),
        None => println!("Seed: entropy"),
    }
    println!();

    let batch = match run_batch(&config, seed, &mut rng) {
        Ok(batch) => batch,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Finished {} trials: {} converged, mean steady-state error {:.4}",
        batch.trials.len(),
        batch.converged_trials(),
        batch.mean_error()
    );

    match write_batch(&args.output_dir, &batch) {
        Ok(path) => {
            println!("Wrote {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Could not write results: {}", e);
            ExitCode::FAILURE
        }
    }
}
