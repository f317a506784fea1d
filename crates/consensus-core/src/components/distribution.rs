//! Belief Distributions
//!
//! The probabilistic belief representation: a probability distribution over
//! the alternatives, where index `i` is the believed probability that
//! alternative `i` is best.

use serde::{Deserialize, Serialize};

use crate::components::relation::PreferenceRelation;

/// Sum tolerance when checking that a distribution is normalized.
pub const SUM_TOLERANCE: f64 = 1e-9;

/// A probability distribution over the alternatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefDistribution {
    masses: Vec<f64>,
}

impl BeliefDistribution {
    /// The maximally uncertain belief: equal mass on every alternative.
    pub fn uniform(states: usize) -> Self {
        Self {
            masses: vec![1.0 / states as f64; states],
        }
    }

    pub fn from_masses(masses: Vec<f64>) -> Self {
        Self { masses }
    }

    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    pub fn mass(&self, alternative: usize) -> f64 {
        self.masses[alternative]
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.masses.iter()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.masses
    }

    /// Dot product with another distribution of the same length.
    pub fn dot(&self, other: &Self) -> f64 {
        self.masses
            .iter()
            .zip(other.masses.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Whether every mass is a finite value in [0, 1] and the total is 1
    /// within tolerance.
    pub fn is_valid(&self) -> bool {
        if self.masses.is_empty() {
            return false;
        }
        let in_range = self
            .masses
            .iter()
            .all(|&m| m.is_finite() && (0.0..=1.0).contains(&m));
        let total: f64 = self.masses.iter().sum();
        in_range && (total - 1.0).abs() <= SUM_TOLERANCE
    }

    /// The preference relation implied by the belief: `(x, y)` whenever `x`
    /// carries strictly more mass than `y`. Ties contribute nothing.
    pub fn derive_preferences(&self) -> PreferenceRelation {
        let mut preferences = PreferenceRelation::new();
        for x in 0..self.masses.len() {
            for y in (x + 1)..self.masses.len() {
                if self.masses[x] > self.masses[y] {
                    preferences.insert((x, y));
                } else if self.masses[y] > self.masses[x] {
                    preferences.insert((y, x));
                }
            }
        }
        preferences
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_is_valid() {
        let belief = BeliefDistribution::uniform(4);
        assert!(belief.is_valid());
        assert_eq!(belief.mass(2), 0.25);
    }

    #[test]
    fn test_uniform_derives_no_preferences() {
        let belief = BeliefDistribution::uniform(5);
        assert!(belief.derive_preferences().is_empty());
    }

    #[test]
    fn test_derive_preferences_orders_by_mass() {
        let belief = BeliefDistribution::from_masses(vec![0.2, 0.5, 0.3]);
        let preferences = belief.derive_preferences();

        assert_eq!(
            preferences,
            PreferenceRelation::from_pairs([(1, 2), (1, 0), (2, 0)])
        );
        assert!(preferences.is_asymmetric());
    }

    #[test]
    fn test_derive_preferences_skips_ties() {
        let belief = BeliefDistribution::from_masses(vec![0.4, 0.4, 0.2]);
        let preferences = belief.derive_preferences();

        assert!(!preferences.contains((0, 1)));
        assert!(!preferences.contains((1, 0)));
        assert!(preferences.contains((0, 2)));
        assert!(preferences.contains((1, 2)));
    }

    #[test]
    fn test_is_valid_rejects_bad_distributions() {
        assert!(!BeliefDistribution::from_masses(vec![0.5, 0.6]).is_valid());
        assert!(!BeliefDistribution::from_masses(vec![1.2, -0.2]).is_valid());
        assert!(!BeliefDistribution::from_masses(vec![f64::NAN, 1.0]).is_valid());
        assert!(!BeliefDistribution::from_masses(Vec::new()).is_valid());
    }

    #[test]
    fn test_dot_product() {
        let a = BeliefDistribution::from_masses(vec![0.6, 0.4]);
        let b = BeliefDistribution::from_masses(vec![0.3, 0.7]);
        assert!((a.dot(&b) - 0.46).abs() < 1e-12);
    }
}
