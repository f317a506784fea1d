//! Core simulation logic: beliefs, fusion, noise, networks, scheduling.

pub mod components;
pub mod config;
pub mod noise;
pub mod output;
pub mod setup;
pub mod systems;

pub use components::{
    Agent, BeliefDistribution, BeliefState, BeliefUpdate, GroundTruth, InteractionNetwork,
    PreferenceRelation,
};
pub use config::{AgentVariant, ConfigError, FusionMode, TrialConfig};
pub use systems::{run_batch, run_round, run_trial, FusionOutcome, RoundOutcome};
