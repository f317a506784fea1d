//! Trial Configuration
//!
//! Every knob a trial accepts, with TOML loading for parameter sweeps and
//! validation that rejects a bad configuration before any agent is created.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// How two agents combine beliefs and which representation they hold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum AgentVariant {
    /// Preference relations, full exchange.
    Ordinal,
    /// Preference relations over a capacity-limited channel.
    Bandwidth,
    /// Probability distributions, dampened product fusion.
    Probabilistic,
    /// Probability distributions, element-wise mean fusion.
    Averaging,
}

impl AgentVariant {
    pub fn name(&self) -> &'static str {
        match self {
            AgentVariant::Ordinal => "ordinal",
            AgentVariant::Bandwidth => "bandwidth",
            AgentVariant::Probabilistic => "probabilistic",
            AgentVariant::Averaging => "averaging",
        }
    }

    /// Whether the variant represents beliefs as probability distributions.
    pub fn is_probabilistic(&self) -> bool {
        matches!(self, AgentVariant::Probabilistic | AgentVariant::Averaging)
    }
}

impl std::fmt::Display for AgentVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How fusion results are adopted. Only the symmetric model is defined:
/// selected pairs both adopt the combination result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FusionMode {
    #[default]
    Symmetric,
}

/// Complete configuration for a batch of trials at one parameter point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialConfig {
    /// Number of alternatives to rank (at least 2).
    pub states: usize,
    /// Number of agents in the population (at least 1).
    pub agents: usize,
    /// Edge probability of the random interaction graph, in [0, 1].
    pub connectivity: f64,
    /// Per-agent per-round probability of receiving evidence, in [0, 1].
    pub evidence_rate: f64,
    /// Evidence noise: comparison-noise parameter for ordinal variants,
    /// quality-perturbation standard deviation for probabilistic ones.
    /// `None` disables noise entirely.
    pub noise_level: Option<f64>,
    /// Hard cap on rounds per trial.
    pub iteration_limit: u64,
    /// Unchanged rounds before an agent counts as converged.
    pub steady_state_threshold: u64,
    pub fusion_mode: FusionMode,
    pub agent_variant: AgentVariant,
    /// Pairs transmitted per side during bandwidth-limited fusion.
    /// Required for the bandwidth variant, ignored otherwise.
    pub bandwidth_limit: Option<usize>,
    /// Transitively close relations after every fusion.
    pub closure: bool,
    /// Fraction of the population fused per round, in [0, 1].
    /// `None` selects the default single edge per round.
    pub fusion_rate: Option<f64>,
    /// Run the evidence phase only, skipping all fusion.
    pub evidence_only: bool,
    /// Independent trials to run at this parameter point.
    pub num_trials: usize,
    /// Population sizes for which per-round trajectories are recorded.
    pub trajectory_populations: Vec<usize>,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            states: 10,
            agents: 100,
            connectivity: 1.0,
            evidence_rate: 0.01,
            noise_level: None,
            iteration_limit: 10_000,
            steady_state_threshold: 100,
            fusion_mode: FusionMode::Symmetric,
            agent_variant: AgentVariant::Ordinal,
            bandwidth_limit: None,
            closure: false,
            fusion_rate: None,
            evidence_only: false,
            num_trials: 100,
            trajectory_populations: vec![10, 50, 100],
        }
    }
}

impl TrialConfig {
    /// Loads a configuration from a TOML file. Missing keys fall back to
    /// the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Rejects invalid configurations before any agent exists.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.states < 2 {
            return Err(ConfigError::TooFewStates(self.states));
        }
        if self.agents < 1 {
            return Err(ConfigError::TooFewAgents(self.agents));
        }
        Self::check_rate("connectivity", self.connectivity)?;
        Self::check_rate("evidence_rate", self.evidence_rate)?;
        if let Some(rate) = self.fusion_rate {
            Self::check_rate("fusion_rate", rate)?;
        }
        if let Some(noise) = self.noise_level {
            if !noise.is_finite() || noise < 0.0 {
                return Err(ConfigError::NegativeNoise(noise));
            }
        }
        if self.iteration_limit < 1 {
            return Err(ConfigError::ZeroLimit {
                name: "iteration_limit",
            });
        }
        if self.steady_state_threshold < 1 {
            return Err(ConfigError::ZeroLimit {
                name: "steady_state_threshold",
            });
        }
        if self.agent_variant == AgentVariant::Bandwidth {
            match self.bandwidth_limit {
                None => return Err(ConfigError::MissingBandwidthLimit),
                Some(0) => return Err(ConfigError::ZeroBandwidthLimit),
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Whether per-round trajectories are recorded for this population.
    pub fn log_trajectory(&self) -> bool {
        self.trajectory_populations.contains(&self.agents)
    }

    fn check_rate(name: &'static str, value: f64) -> Result<(), ConfigError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::RateOutOfRange { name, value });
        }
        Ok(())
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least two states are required, got {0}")]
    TooFewStates(usize),
    #[error("at least one agent is required, got {0}")]
    TooFewAgents(usize),
    #[error("{name} must lie in [0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },
    #[error("noise level must be non-negative and finite, got {0}")]
    NegativeNoise(f64),
    #[error("{name} must be at least 1")]
    ZeroLimit { name: &'static str },
    #[error("the bandwidth variant requires a bandwidth limit")]
    MissingBandwidthLimit,
    #[error("bandwidth limit must be at least 1")]
    ZeroBandwidthLimit,
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TrialConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.iteration_limit, 10_000);
        assert_eq!(config.steady_state_threshold, 100);
    }

    #[test]
    fn test_too_few_states_is_rejected() {
        let config = TrialConfig {
            states: 1,
            ..TrialConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooFewStates(1))
        ));
    }

    #[test]
    fn test_connectivity_out_of_range_is_rejected() {
        let config = TrialConfig {
            connectivity: 1.5,
            ..TrialConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RateOutOfRange {
                name: "connectivity",
                ..
            })
        ));
    }

    #[test]
    fn test_bandwidth_variant_requires_limit() {
        let mut config = TrialConfig {
            agent_variant: AgentVariant::Bandwidth,
            ..TrialConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingBandwidthLimit)
        ));

        config.bandwidth_limit = Some(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroBandwidthLimit)
        ));

        config.bandwidth_limit = Some(config.states);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: TrialConfig = toml::from_str(
            r#"
            states = 5
            agents = 20
            agent_variant = "probabilistic"
            noise_level = 0.33
            "#,
        )
        .unwrap();

        assert_eq!(config.states, 5);
        assert_eq!(config.agents, 20);
        assert_eq!(config.agent_variant, AgentVariant::Probabilistic);
        assert_eq!(config.noise_level, Some(0.33));
        // Unspecified keys keep their defaults.
        assert_eq!(config.evidence_rate, 0.01);
    }

    #[test]
    fn test_log_trajectory_matches_population() {
        let config = TrialConfig {
            agents: 50,
            ..TrialConfig::default()
        };
        assert!(config.log_trajectory());

        let config = TrialConfig {
            agents: 51,
            ..TrialConfig::default()
        };
        assert!(!config.log_trajectory());
    }
}
