//! Belief Scoring
//!
//! Scalar error and uncertainty of a preference relation measured against the
//! ground-truth relation. Both are normalized to [0, 1] by the number of true
//! pairs.

use std::collections::BTreeSet;

/// An ordered pair read as "first is preferred to second".
pub type Pair = (usize, usize);

/// Mean per-pair error of a belief relation against the true relation.
///
/// Each true pair `(better, worse)` scores 1 when the belief holds the
/// reversed pair, 1/2 when the belief holds neither direction, and 0 when it
/// agrees with the truth. A fully ignorant relation therefore scores 1/2.
pub fn error(preferences: &BTreeSet<Pair>, true_preferences: &BTreeSet<Pair>) -> f64 {
    if true_preferences.is_empty() {
        return 0.0;
    }

    let mut total = 0.0;
    for &(better, worse) in true_preferences {
        if preferences.contains(&(worse, better)) {
            total += 1.0;
        } else if !preferences.contains(&(better, worse)) {
            total += 0.5;
        }
    }

    total / true_preferences.len() as f64
}

/// Fraction of true pairs the belief leaves undetermined (neither direction
/// present). A fully ignorant relation scores 1, a complete one 0.
pub fn uncertainty(preferences: &BTreeSet<Pair>, true_preferences: &BTreeSet<Pair>) -> f64 {
    if true_preferences.is_empty() {
        return 0.0;
    }

    let undetermined = true_preferences
        .iter()
        .filter(|&&(better, worse)| {
            !preferences.contains(&(better, worse)) && !preferences.contains(&(worse, better))
        })
        .count();

    undetermined as f64 / true_preferences.len() as f64
}
