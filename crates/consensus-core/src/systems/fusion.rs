//! Fusion Operators
//!
//! Combines two beliefs into one shared result or two per-endpoint results.
//! Each agent variant selects its operator; the round scheduler applies the
//! outcome to both endpoints.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::components::distribution::BeliefDistribution;
use crate::components::relation::{Pair, PreferenceRelation};

/// Mixing weight of the uniform dampening blend applied after product
/// fusion.
pub const DAMPENING_LAMBDA: f64 = 0.1;

/// What a relational fusion produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FusionOutcome {
    /// One result adopted by both endpoints.
    Shared(PreferenceRelation),
    /// Independent per-endpoint results from a bandwidth-limited exchange.
    Split(PreferenceRelation, PreferenceRelation),
}

/// Canonical ordinal fusion: union, drop direct contradictions, optionally
/// close transitively. Used both for folding evidence into a belief and for
/// pairwise interaction.
pub fn combine_relations(
    a: &PreferenceRelation,
    b: &PreferenceRelation,
    closure: bool,
) -> PreferenceRelation {
    finish(a.union(b), closure)
}

/// Bandwidth-limited ordinal fusion. With no limit this is
/// [`combine_relations`] returning `Shared`. With a limit, each side
/// receives at most `limit` pairs sampled without replacement from the
/// other side's relation, merges them into its own full relation, and
/// finishes independently, yielding `Split`.
pub fn combine_bandwidth(
    a: &PreferenceRelation,
    b: &PreferenceRelation,
    bandwidth_limit: Option<usize>,
    closure: bool,
    rng: &mut SmallRng,
) -> FusionOutcome {
    let Some(limit) = bandwidth_limit else {
        return FusionOutcome::Shared(combine_relations(a, b, closure));
    };

    let sent_by_a = subsample(a, limit, rng);
    let sent_by_b = subsample(b, limit, rng);

    let result_a = finish(a.union(&sent_by_b), closure);
    let result_b = finish(b.union(&sent_by_a), closure);
    FusionOutcome::Split(result_a, result_b)
}

/// Dampened product fusion over two distributions. `None` when the
/// normalization denominator is (near) zero — the operator is undefined for
/// beliefs with disjoint support, and callers record an unchanged round.
pub fn combine_product(
    a: &BeliefDistribution,
    b: &BeliefDistribution,
) -> Option<BeliefDistribution> {
    let product_sum = a.dot(b);
    if !product_sum.is_finite() || product_sum <= f64::EPSILON {
        return None;
    }

    let states = a.len() as f64;
    let masses: Vec<f64> = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let normalized = (x * y) / product_sum;
            DAMPENING_LAMBDA / states + (1.0 - DAMPENING_LAMBDA) * normalized
        })
        .collect();

    let result = BeliefDistribution::from_masses(masses);
    result.is_valid().then_some(result)
}

/// Element-wise mean of two distributions. Kept on the same `Option`
/// contract as [`combine_product`] even though averaging two valid
/// distributions cannot normally degenerate.
pub fn combine_average(
    a: &BeliefDistribution,
    b: &BeliefDistribution,
) -> Option<BeliefDistribution> {
    let masses: Vec<f64> = a.iter().zip(b.iter()).map(|(x, y)| (x + y) / 2.0).collect();

    let result = BeliefDistribution::from_masses(masses);
    result.is_valid().then_some(result)
}

fn finish(combined: PreferenceRelation, closure: bool) -> PreferenceRelation {
    let filtered = combined.filter_consistent();
    if closure {
        filtered.transitive_closure()
    } else {
        filtered
    }
}

fn subsample(relation: &PreferenceRelation, limit: usize, rng: &mut SmallRng) -> PreferenceRelation {
    if limit >= relation.len() {
        return relation.clone();
    }
    let pairs: Vec<Pair> = relation.to_vec();
    pairs
        .choose_multiple(rng, limit)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_combine_without_closure() {
        let a = PreferenceRelation::from_pairs([(2, 1)]);
        let b = PreferenceRelation::from_pairs([(1, 0)]);

        let combined = combine_relations(&a, &b, false);
        assert_eq!(combined, PreferenceRelation::from_pairs([(2, 1), (1, 0)]));
    }

    #[test]
    fn test_combine_with_closure_adds_implied_pair() {
        let a = PreferenceRelation::from_pairs([(2, 1)]);
        let b = PreferenceRelation::from_pairs([(1, 0)]);

        let combined = combine_relations(&a, &b, true);
        assert_eq!(
            combined,
            PreferenceRelation::from_pairs([(2, 1), (1, 0), (2, 0)])
        );
    }

    #[test]
    fn test_combine_filters_contradictions() {
        let a = PreferenceRelation::from_pairs([(0, 1), (2, 1)]);
        let b = PreferenceRelation::from_pairs([(1, 0)]);

        let combined = combine_relations(&a, &b, false);
        assert_eq!(combined, PreferenceRelation::from_pairs([(2, 1)]));
        assert!(combined.is_asymmetric());
    }

    #[test]
    fn test_bandwidth_without_limit_is_shared() {
        let a = PreferenceRelation::from_pairs([(2, 1)]);
        let b = PreferenceRelation::from_pairs([(1, 0)]);
        let mut rng = SmallRng::seed_from_u64(1);

        let outcome = combine_bandwidth(&a, &b, None, false, &mut rng);
        assert_eq!(
            outcome,
            FusionOutcome::Shared(PreferenceRelation::from_pairs([(2, 1), (1, 0)]))
        );
    }

    #[test]
    fn test_bandwidth_limit_splits_results() {
        // Two fully opposed three-state relations: each side can only keep
        // pairs in its own direction, so the halves always differ.
        let a = PreferenceRelation::from_pairs([(2, 1), (2, 0), (1, 0)]);
        let b = PreferenceRelation::from_pairs([(1, 2), (0, 2), (0, 1)]);
        let mut rng = SmallRng::seed_from_u64(42);

        match combine_bandwidth(&a, &b, Some(1), false, &mut rng) {
            FusionOutcome::Split(result_a, result_b) => {
                assert_ne!(result_a, result_b);
                assert_eq!(result_a.len(), 2);
                assert_eq!(result_b.len(), 2);
                assert!(result_a.is_asymmetric());
                assert!(result_b.is_asymmetric());
                // Each half keeps only its own side's direction.
                assert!(result_a.iter().all(|&pair| a.contains(pair)));
                assert!(result_b.iter().all(|&pair| b.contains(pair)));
            }
            FusionOutcome::Shared(_) => panic!("limit set, expected split outcome"),
        }
    }

    #[test]
    fn test_bandwidth_limit_above_size_sends_everything() {
        let a = PreferenceRelation::from_pairs([(2, 1)]);
        let b = PreferenceRelation::from_pairs([(1, 0)]);
        let mut rng = SmallRng::seed_from_u64(4);

        match combine_bandwidth(&a, &b, Some(10), false, &mut rng) {
            FusionOutcome::Split(result_a, result_b) => {
                // Both sides received the other's whole relation.
                assert_eq!(result_a, result_b);
                assert_eq!(result_a.len(), 2);
            }
            FusionOutcome::Shared(_) => panic!("limit set, expected split outcome"),
        }
    }

    #[test]
    fn test_product_fusion_reference_values() {
        let a = BeliefDistribution::from_masses(vec![0.6, 0.4]);
        let b = BeliefDistribution::from_masses(vec![0.3, 0.7]);

        let fused = combine_product(&a, &b).unwrap();
        assert!((fused.mass(0) - 0.402_173_913).abs() < 1e-6);
        assert!((fused.mass(1) - 0.597_826_087).abs() < 1e-6);
        assert!(fused.is_valid());
    }

    #[test]
    fn test_product_fusion_disjoint_support_is_undefined() {
        let a = BeliefDistribution::from_masses(vec![1.0, 0.0]);
        let b = BeliefDistribution::from_masses(vec![0.0, 1.0]);

        assert!(combine_product(&a, &b).is_none());
    }

    #[test]
    fn test_product_fusion_sharpens_agreement() {
        let a = BeliefDistribution::from_masses(vec![0.7, 0.3]);
        let fused = combine_product(&a, &a).unwrap();

        assert!(fused.mass(0) > a.mass(0));
        assert!(fused.is_valid());
    }

    #[test]
    fn test_average_fusion_is_midpoint() {
        let a = BeliefDistribution::from_masses(vec![1.0, 0.0]);
        let b = BeliefDistribution::from_masses(vec![0.0, 1.0]);

        let fused = combine_average(&a, &b).unwrap();
        assert_eq!(fused.as_slice(), &[0.5, 0.5]);
    }
}
