//! Evidence Generation
//!
//! Draws one piece of (possibly noisy) evidence per call: an unknown true
//! pair for ordinal agents, a peaked quality distribution for probabilistic
//! ones. Running out of unknown pairs is a normal terminal condition, not
//! an error.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::distribution::BeliefDistribution;
use crate::components::ground_truth::GroundTruth;
use crate::components::relation::{Pair, PreferenceRelation};
use crate::noise::{flips, perturbed_quality, ComparisonErrorTable};

/// One true pair the agent does not yet hold in either direction, sampled
/// uniformly and possibly reversed by the noise model keyed on the rank
/// distance between the two alternatives. Empty when everything is known.
pub fn find_ordinal_evidence(
    current: &PreferenceRelation,
    truth: &GroundTruth,
    noise: Option<&ComparisonErrorTable>,
    rng: &mut SmallRng,
) -> PreferenceRelation {
    let unknown: Vec<Pair> = truth
        .relation()
        .iter()
        .filter(|&&(x, y)| !current.contains((x, y)) && !current.contains((y, x)))
        .copied()
        .collect();

    let Some(&(better, worse)) = unknown.choose(rng) else {
        return PreferenceRelation::new();
    };

    let mut evidence = PreferenceRelation::new();
    match noise {
        None => {
            evidence.insert((better, worse));
        }
        Some(table) => {
            let distance = truth.rank_distance(better, worse);
            if flips(rng, table.error_at(distance)) {
                evidence.insert((worse, better));
            } else {
                evidence.insert((better, worse));
            }
        }
    }
    evidence
}

/// A sharply peaked distribution around one uniformly chosen alternative,
/// built from its (optionally perturbed) quality value `q`: the observed
/// alternative carries `((states-1)q + 1)/states`, every other one
/// `(1-q)/states`.
pub fn quality_evidence(
    truth: &GroundTruth,
    noise_level: Option<f64>,
    rng: &mut SmallRng,
) -> BeliefDistribution {
    let states = truth.states();
    let observed = rng.gen_range(0..states);

    let quality = match noise_level {
        None => truth.quality(observed),
        Some(noise) => perturbed_quality(truth.quality(observed), noise, rng),
    };

    let floor = (1.0 - quality) / states as f64;
    let mut masses = vec![floor; states];
    masses[observed] = ((states as f64 - 1.0) * quality + 1.0) / states as f64;
    BeliefDistribution::from_masses(masses)
}
