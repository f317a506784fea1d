//! Simulation Systems
//!
//! The behavior layered over the components: evidence generation, fusion
//! operators, the round scheduler, and the trial driver.

pub mod evidence;
pub mod fusion;
pub mod round;
pub mod trial;

pub use evidence::{find_ordinal_evidence, quality_evidence};
pub use fusion::{
    combine_average, combine_bandwidth, combine_product, combine_relations, FusionOutcome,
    DAMPENING_LAMBDA,
};
pub use round::{run_round, RoundOutcome};
pub use trial::{run_batch, run_trial};
