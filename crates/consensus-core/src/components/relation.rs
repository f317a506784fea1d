//! Preference Relations
//!
//! The ordinal belief representation: a set of "better-than" pairs over
//! alternatives, plus the relational algebra that keeps it consistent after
//! a merge (pairwise contradiction filtering and transitive closure).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Index of one alternative in the fixed set being ranked.
pub type Alternative = usize;

/// An ordered pair read as "first is preferred to second".
pub type Pair = (Alternative, Alternative);

/// An asymmetric set of preference pairs over alternatives.
///
/// Backed by an ordered set so that iteration, and therefore uniform
/// sampling during evidence generation, is deterministic for a fixed seed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRelation {
    pairs: BTreeSet<Pair>,
}

impl PreferenceRelation {
    /// An empty ("ignorant") relation.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = Pair>) -> Self {
        Self {
            pairs: pairs.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains(&self, pair: Pair) -> bool {
        self.pairs.contains(&pair)
    }

    pub fn insert(&mut self, pair: Pair) {
        self.pairs.insert(pair);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pair> {
        self.pairs.iter()
    }

    /// The underlying pair set, in sorted order.
    pub fn pairs(&self) -> &BTreeSet<Pair> {
        &self.pairs
    }

    pub fn to_vec(&self) -> Vec<Pair> {
        self.pairs.iter().copied().collect()
    }

    /// Set union with another relation. The result may contain direct
    /// contradictions until filtered.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            pairs: self.pairs.union(&other.pairs).copied().collect(),
        }
    }

    /// Drops every pair whose reverse is also present. This resolves direct
    /// contradictions from merging two relations; cycles longer than 2 pass
    /// through untouched.
    pub fn filter_consistent(&self) -> Self {
        Self {
            pairs: self
                .pairs
                .iter()
                .filter(|&&(x, y)| !self.pairs.contains(&(y, x)))
                .copied()
                .collect(),
        }
    }

    /// Smallest loop-free transitive superset: `(x,y)` and `(y,z)` present
    /// implies `(x,z)` present, with `x == z` never added.
    ///
    /// No cycle detection is performed. Closing a relation that still holds
    /// a cycle longer than 2 after [`filter_consistent`](Self::filter_consistent)
    /// produces symmetric pairs; callers that need asymmetry must filter
    /// again or avoid such inputs.
    pub fn transitive_closure(&self) -> Self {
        let mut closed = self.pairs.clone();
        loop {
            let mut additions = BTreeSet::new();
            for &(x, y) in &closed {
                for &(mid, z) in closed.range((y, 0)..=(y, usize::MAX)) {
                    debug_assert_eq!(mid, y);
                    if x != z && !closed.contains(&(x, z)) {
                        additions.insert((x, z));
                    }
                }
            }
            if additions.is_empty() {
                break;
            }
            closed.extend(additions);
        }
        Self { pairs: closed }
    }

    /// Whether no pair is present together with its reverse.
    pub fn is_asymmetric(&self) -> bool {
        self.pairs.iter().all(|&(x, y)| !self.pairs.contains(&(y, x)))
    }
}

impl FromIterator<Pair> for PreferenceRelation {
    fn from_iter<I: IntoIterator<Item = Pair>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
