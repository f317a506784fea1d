//! Result Records
//!
//! Serialization structs for trial results: terminal per-agent states,
//! per-round population trajectories, and whole-batch output.

use serde::{Deserialize, Serialize};

use crate::metrics::Pair;

/// Generates a trial ID with the given sequence number.
pub fn generate_trial_id(sequence: usize) -> String {
    format!("trial_{:04}", sequence)
}

/// Terminal state of a single agent at the end of a trial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    pub agent: usize,
    pub error: f64,
    pub uncertainty: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferences: Vec<Pair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub belief: Option<Vec<f64>>,
    pub evidence_count: u64,
    pub interaction_count: u64,
    pub rounds_since_change: u64,
    pub converged: bool,
}

/// Population-mean metrics for one round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u64,
    pub mean_error: f64,
    pub mean_uncertainty: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_belief: Option<Vec<f64>>,
}

/// Outcome of a single trial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialRecord {
    pub trial_id: String,
    pub trial: usize,
    pub rounds_run: u64,
    /// Round at which the whole population was in steady state, if any.
    pub converged_at: Option<u64>,
    pub agents: Vec<AgentRecord>,
    /// Per-round trajectory; recorded only for logged population sizes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trajectory: Vec<RoundRecord>,
}

impl TrialRecord {
    /// Creates an empty record for the given trial sequence number.
    pub fn new(trial: usize) -> Self {
        Self {
            trial_id: generate_trial_id(trial),
            trial,
            rounds_run: 0,
            converged_at: None,
            agents: Vec::new(),
            trajectory: Vec::new(),
        }
    }

    /// Mean terminal error over the population.
    pub fn mean_error(&self) -> f64 {
        if self.agents.is_empty() {
            return 0.0;
        }
        self.agents.iter().map(|a| a.error).sum::<f64>() / self.agents.len() as f64
    }

    /// Whether every agent was in steady state at the end of the trial.
    pub fn fully_converged(&self) -> bool {
        !self.agents.is_empty() && self.agents.iter().all(|a| a.converged)
    }
}

/// The parameter point a batch of trials was run at. Doubles as the output
/// file stem so result files are self-describing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterStamp {
    pub agents: usize,
    pub states: usize,
    pub connectivity: f64,
    pub evidence_rate: f64,
    pub noise_level: Option<f64>,
    pub fusion_rate: Option<f64>,
    pub variant: String,
    pub closure: bool,
    pub evidence_only: bool,
    pub num_trials: usize,
    pub seed: Option<u64>,
}

impl ParameterStamp {
    /// Whether the variant represents beliefs as probability distributions.
    pub fn is_probabilistic(&self) -> bool {
        matches!(self.variant.as_str(), "probabilistic" | "averaging")
    }

    /// File stem encoding the parameter point, e.g.
    /// `100a_10s_1.00con_0.01er_no_cl`.
    pub fn file_stem(&self) -> String {
        let mut parts = vec![
            format!("{}a", self.agents),
            format!("{}s", self.states),
            format!("{:.2}con", self.connectivity),
            format!("{:.2}er", self.evidence_rate),
        ];

        if let Some(noise) = self.noise_level {
            // Probabilistic noise levels are standard deviations below 1 and
            // need the extra digit; ordinal levels span 0-100.
            if self.is_probabilistic() {
                parts.push(format!("{:.2}nv", noise));
            } else {
                parts.push(format!("{:.1}nv", noise));
            }
        }
        if let Some(rate) = self.fusion_rate {
            parts.push(format!("{:.2}fr", rate));
        }
        if !self.closure {
            parts.push("no_cl".to_string());
        }

        parts.join("_")
    }

    /// Subdirectory for this variant's results; the default ordinal variant
    /// writes at the output root.
    pub fn variant_dir(&self) -> Option<&str> {
        match self.variant.as_str() {
            "ordinal" => None,
            other => Some(other),
        }
    }
}

/// Complete output of one batch of trials at a single parameter point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRecord {
    pub parameters: ParameterStamp,
    pub trials: Vec<TrialRecord>,
}

impl BatchRecord {
    /// Creates a batch with no trials yet.
    pub fn new(parameters: ParameterStamp) -> Self {
        Self {
            parameters,
            trials: Vec::new(),
        }
    }

    /// Number of trials that reached full steady state.
    pub fn converged_trials(&self) -> usize {
        self.trials.iter().filter(|t| t.fully_converged()).count()
    }

    /// Mean terminal error over all trials.
    pub fn mean_error(&self) -> f64 {
        if self.trials.is_empty() {
            return 0.0;
        }
        self.trials.iter().map(|t| t.mean_error()).sum::<f64>() / self.trials.len() as f64
    }

    /// Serializes the batch to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serializes the batch to compact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a batch from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
