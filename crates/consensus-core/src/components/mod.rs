//! Simulation Components
//!
//! The data an agent holds and the structures a trial is built from.

pub mod agent;
pub mod distribution;
pub mod ground_truth;
pub mod network;
pub mod relation;

pub use agent::{Agent, BeliefState, BeliefUpdate};
pub use distribution::BeliefDistribution;
pub use ground_truth::GroundTruth;
pub use network::{InteractionNetwork, WorkingTopology};
pub use relation::{Alternative, Pair, PreferenceRelation};
