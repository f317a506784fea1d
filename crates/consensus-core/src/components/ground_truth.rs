//! Ground Truth
//!
//! The true ordering of the alternatives, fixed for a whole trial: the
//! order itself, its transitively closed preference relation, and the
//! per-alternative quality values probabilistic evidence is drawn from.

use serde::{Deserialize, Serialize};

use crate::components::relation::{Alternative, PreferenceRelation};

/// The true state of the world. Read-only input to evidence generation and
/// evaluation; agents never see it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundTruth {
    /// Alternatives from best to worst.
    order: Vec<Alternative>,
    /// The order as a transitively closed preference relation.
    relation: PreferenceRelation,
    /// `rank[alternative]` = position in `order` (0 = best).
    rank: Vec<usize>,
    /// `quality[alternative]` in (0, 1), evenly spaced.
    quality: Vec<f64>,
}

impl GroundTruth {
    /// Builds the reference ground truth over `states` alternatives: the
    /// descending index order `states-1 > ... > 0`, so that alternative `i`
    /// has quality `(i+1)/(states+1)`.
    pub fn new(states: usize) -> Self {
        let order: Vec<Alternative> = (0..states).rev().collect();

        let mut relation = PreferenceRelation::new();
        for window in order.windows(2) {
            relation.insert((window[0], window[1]));
        }
        let relation = relation.transitive_closure();

        let mut rank = vec![0; states];
        for (position, &alternative) in order.iter().enumerate() {
            rank[alternative] = position;
        }

        let quality = (1..=states)
            .map(|i| i as f64 / (states + 1) as f64)
            .collect();

        Self {
            order,
            relation,
            rank,
            quality,
        }
    }

    pub fn states(&self) -> usize {
        self.order.len()
    }

    /// Alternatives from best to worst.
    pub fn order(&self) -> &[Alternative] {
        &self.order
    }

    /// The complete true preference relation.
    pub fn relation(&self) -> &PreferenceRelation {
        &self.relation
    }

    /// How many ranks apart two alternatives sit in the true order.
    pub fn rank_distance(&self, a: Alternative, b: Alternative) -> usize {
        self.rank[a].abs_diff(self.rank[b])
    }

    /// The true quality of an alternative, in (0, 1).
    pub fn quality(&self, alternative: Alternative) -> f64 {
        self.quality[alternative]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_descending_indices() {
        let truth = GroundTruth::new(4);
        assert_eq!(truth.order(), &[3, 2, 1, 0]);
    }

    #[test]
    fn test_relation_is_closed_and_complete() {
        let truth = GroundTruth::new(3);

        assert_eq!(
            *truth.relation(),
            PreferenceRelation::from_pairs([(2, 1), (2, 0), (1, 0)])
        );
        assert!(truth.relation().is_asymmetric());
    }

    #[test]
    fn test_rank_distance() {
        let truth = GroundTruth::new(5);
        assert_eq!(truth.rank_distance(4, 0), 4);
        assert_eq!(truth.rank_distance(2, 3), 1);
        assert_eq!(truth.rank_distance(1, 1), 0);
    }

    #[test]
    fn test_quality_is_evenly_spaced_and_order_consistent() {
        let truth = GroundTruth::new(4);

        assert!((truth.quality(0) - 0.2).abs() < 1e-12);
        assert!((truth.quality(3) - 0.8).abs() < 1e-12);
        // The best-ranked alternative carries the highest quality.
        assert!(truth.quality(truth.order()[0]) > truth.quality(truth.order()[3]));
    }
}
