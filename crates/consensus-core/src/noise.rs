//! Noise Model
//!
//! Maps rank distances to comparison-error probabilities and perturbs
//! quality observations. Comparison errors are precomputed once per trial;
//! rank distances are small integers and never recomputed per draw.

use rand::distributions::Distribution;
use rand::rngs::SmallRng;
use rand::Rng;
use statrs::distribution::Normal;

/// Retry cap for the in-range quality perturbation draw. On exhaustion the
/// unperturbed quality is used, which truncates the tail of the
/// perturbation distribution.
pub const MAX_PERTURBATION_RETRIES: usize = 32;

/// Probability that a pairwise comparison at normalized rank distance
/// `relative_distance` is answered incorrectly under `noise_level`.
///
/// Logistic decay: 1/2 at zero noise for every distance (pure guessing),
/// approaching 0 as the noise level grows, with adjacent alternatives
/// always the most confusable.
pub fn comparison_error(relative_distance: f64, noise_level: f64) -> f64 {
    1.0 / (1.0 + (noise_level * relative_distance).exp())
}

/// Comparison-error probabilities for every rank distance `1..states`,
/// built once per trial and immutable thereafter.
#[derive(Debug, Clone)]
pub struct ComparisonErrorTable {
    errors: Vec<f64>,
}

impl ComparisonErrorTable {
    pub fn build(states: usize, noise_level: f64) -> Self {
        let errors = (1..states)
            .map(|distance| comparison_error(distance as f64 / states as f64, noise_level))
            .collect();
        Self { errors }
    }

    /// Error probability for two alternatives `distance` ranks apart.
    /// `distance` must be in `1..states`.
    pub fn error_at(&self, distance: usize) -> f64 {
        self.errors[distance - 1]
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// True with probability `p_error`: one uniform draw compared against the
/// error probability.
pub fn flips(rng: &mut SmallRng, p_error: f64) -> bool {
    rng.gen::<f64>() <= p_error
}

/// A quality value plus normally distributed noise, rejection-sampled into
/// [0, 1]. The retry loop is bounded by [`MAX_PERTURBATION_RETRIES`];
/// a zero or invalid noise level leaves the quality untouched.
pub fn perturbed_quality(quality: f64, noise_level: f64, rng: &mut SmallRng) -> f64 {
    let normal = match Normal::new(0.0, noise_level) {
        Ok(normal) => normal,
        Err(_) => return quality,
    };

    for _ in 0..MAX_PERTURBATION_RETRIES {
        let sample = quality + normal.sample(rng);
        if (0.0..=1.0).contains(&sample) {
            return sample;
        }
    }
    quality
}
