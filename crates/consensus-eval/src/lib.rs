//! Evaluation metrics and result serialization for the consensus simulation.
//!
//! This crate contains pure data structures and scoring functions with no
//! simulation logic. It is a dependency of the engine crate, which hands it
//! agent beliefs at snapshot points.

pub mod metrics;
pub mod record;

// Re-export scoring functions
pub use metrics::{error, uncertainty, Pair};

// Re-export record types
pub use record::{
    generate_trial_id, AgentRecord, BatchRecord, ParameterStamp, RoundRecord, TrialRecord,
};
