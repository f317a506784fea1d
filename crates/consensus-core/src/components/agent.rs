//! Agents
//!
//! An agent owns exactly one belief plus its lifecycle counters. All
//! cross-agent effects arrive through update calls carrying a fusion result;
//! no agent touches another's state directly.

use serde::{Deserialize, Serialize};

use crate::components::distribution::BeliefDistribution;
use crate::components::relation::PreferenceRelation;

/// The belief an agent holds. Ordinal variants keep a preference relation;
/// probabilistic variants keep a distribution plus the relation it implies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BeliefState {
    Ordinal(PreferenceRelation),
    Probabilistic {
        belief: BeliefDistribution,
        preferences: PreferenceRelation,
    },
}

/// A fusion or evidence result to fold into an agent.
///
/// `Distribution(None)` is the undefined-operator outcome of product fusion
/// over disjoint beliefs: the agent records an unchanged round and keeps its
/// current belief.
#[derive(Debug, Clone)]
pub enum BeliefUpdate {
    Relation(PreferenceRelation),
    Distribution(Option<BeliefDistribution>),
}

enum UpdateKind {
    Evidence,
    Interaction,
}

/// One agent: identity, belief, and lifecycle counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: usize,
    belief: BeliefState,
    pub evidence_count: u64,
    pub interaction_count: u64,
    pub rounds_since_change: u64,
}

impl Agent {
    /// An ordinal agent starting from the ignorant (empty) relation.
    pub fn ordinal(id: usize) -> Self {
        Self {
            id,
            belief: BeliefState::Ordinal(PreferenceRelation::new()),
            evidence_count: 0,
            interaction_count: 0,
            rounds_since_change: 0,
        }
    }

    /// A probabilistic agent starting from the uniform distribution.
    pub fn probabilistic(id: usize, states: usize) -> Self {
        Self {
            id,
            belief: BeliefState::Probabilistic {
                belief: BeliefDistribution::uniform(states),
                preferences: PreferenceRelation::new(),
            },
            evidence_count: 0,
            interaction_count: 0,
            rounds_since_change: 0,
        }
    }

    /// The agent's current preference relation. For probabilistic agents
    /// this is the relation derived from the distribution at its last change.
    pub fn preferences(&self) -> &PreferenceRelation {
        match &self.belief {
            BeliefState::Ordinal(relation) => relation,
            BeliefState::Probabilistic { preferences, .. } => preferences,
        }
    }

    /// The agent's distribution, if it holds one.
    pub fn belief(&self) -> Option<&BeliefDistribution> {
        match &self.belief {
            BeliefState::Ordinal(_) => None,
            BeliefState::Probabilistic { belief, .. } => Some(belief),
        }
    }

    /// Whether the belief has been unchanged for at least `threshold`
    /// consecutive rounds.
    pub fn steady_state(&self, threshold: u64) -> bool {
        self.rounds_since_change >= threshold
    }

    /// Folds in an evidence-phase result and bumps the evidence counter.
    pub fn evidential_update(&mut self, update: BeliefUpdate) {
        self.apply_update(update, UpdateKind::Evidence);
    }

    /// Folds in a fusion-phase result and bumps the interaction counter.
    pub fn interaction_update(&mut self, update: BeliefUpdate) {
        self.apply_update(update, UpdateKind::Interaction);
    }

    fn apply_update(&mut self, update: BeliefUpdate, kind: UpdateKind) {
        match (&mut self.belief, update) {
            (BeliefState::Ordinal(current), BeliefUpdate::Relation(next)) => {
                if next == *current {
                    self.rounds_since_change += 1;
                } else {
                    self.rounds_since_change = 0;
                }
                *current = next;
                self.bump_counter(kind);
            }
            // Undefined fusion result: an unchanged round, belief untouched,
            // counter not incremented.
            (BeliefState::Probabilistic { .. }, BeliefUpdate::Distribution(None)) => {
                self.rounds_since_change += 1;
            }
            (
                BeliefState::Probabilistic {
                    belief,
                    preferences,
                },
                BeliefUpdate::Distribution(Some(next)),
            ) => {
                if next == *belief {
                    self.rounds_since_change += 1;
                } else {
                    self.rounds_since_change = 0;
                }
                *belief = next;
                *preferences = belief.derive_preferences();
                self.bump_counter(kind);
            }
            _ => {
                debug_assert!(false, "belief update does not match the agent's representation");
            }
        }
    }

    fn bump_counter(&mut self, kind: UpdateKind) {
        match kind {
            UpdateKind::Evidence => self.evidence_count += 1,
            UpdateKind::Interaction => self.interaction_count += 1,
        }
    }
}
