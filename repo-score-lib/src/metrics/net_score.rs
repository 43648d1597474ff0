use super::metric::UNAVAILABLE;
use crate::Result;
use ohno::bail;
use serde::{Deserialize, Serialize};

/// Relative importance of each metric in the net score
///
/// Weights need not sum to 1; they are normalized by their sum before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Weights {
    pub bus_factor: f64,
    pub correctness: f64,
    pub ramp_up: f64,
    pub license: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            bus_factor: 0.25,
            correctness: 0.15,
            ramp_up: 0.30,
            license: 0.40,
        }
    }
}

impl Weights {
    fn as_array(&self) -> [f64; 4] {
        [self.bus_factor, self.correctness, self.ramp_up, self.license]
    }

    pub fn validate(&self) -> Result<()> {
        for (name, weight) in ["bus_factor", "correctness", "ramp_up", "license"].into_iter().zip(self.as_array()) {
            if !weight.is_finite() || weight < 0.0 {
                bail!("weight '{name}' must be a non-negative number, got {weight}");
            }
        }

        if self.as_array().iter().sum::<f64>() <= 0.0 {
            bail!("at least one weight must be positive");
        }

        Ok(())
    }

    /// The same weights scaled to sum to 1
    #[must_use]
    pub fn normalized(&self) -> Self {
        let sum: f64 = self.as_array().iter().sum();
        Self {
            bus_factor: self.bus_factor / sum,
            correctness: self.correctness / sum,
            ramp_up: self.ramp_up / sum,
            license: self.license / sum,
        }
    }
}

/// How unavailable metrics affect the net score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnavailablePolicy {
    /// Any unavailable metric makes the net score unavailable
    #[default]
    Propagate,

    /// Unavailable metrics contribute nothing
    Zero,
}

/// The four metric scores of one repository, each in `[0, 1]` or unavailable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentScores {
    pub bus_factor: f64,
    pub correctness: f64,
    pub ramp_up: f64,
    pub license: f64,
}

impl ComponentScores {
    fn as_array(&self) -> [f64; 4] {
        [self.bus_factor, self.correctness, self.ramp_up, self.license]
    }
}

/// Combines component scores into a single weighted score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetScore {
    weights: Weights,
    policy: UnavailablePolicy,
}

impl NetScore {
    pub fn new(weights: Weights, policy: UnavailablePolicy) -> Result<Self> {
        weights.validate()?;
        Ok(Self {
            weights: weights.normalized(),
            policy,
        })
    }

    /// Normalized weights in effect
    #[must_use]
    pub const fn weights(&self) -> &Weights {
        &self.weights
    }

    #[must_use]
    pub const fn policy(&self) -> UnavailablePolicy {
        self.policy
    }

    /// Weighted sum of `scores`, clamped to `[-1, 1]`.
    #[must_use]
    pub fn combine(&self, scores: &ComponentScores) -> f64 {
        let mut total = 0.0;

        for (score, weight) in scores.as_array().into_iter().zip(self.weights.as_array()) {
            if score < 0.0 {
                match self.policy {
                    UnavailablePolicy::Propagate => return UNAVAILABLE,
                    UnavailablePolicy::Zero => continue,
                }
            }

            total += score * weight;
        }

        total.clamp(-1.0, 1.0)
    }
}

impl Default for NetScore {
    fn default() -> Self {
        Self {
            weights: Weights::default().normalized(),
            policy: UnavailablePolicy::default(),
        }
    }
}
