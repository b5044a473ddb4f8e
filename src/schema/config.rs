//! Run configuration: subset size, objectives and search limits.

use serde::{Deserialize, Serialize};

use super::{ObjectiveConfig, ObjectiveType};

/// Top-level configuration of a core selection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreHunterConfig {
    /// Allowed number of selected items.
    pub subset_size: SizeBounds,
    /// Weighted objectives; their weighted sum is maximized.
    pub objectives: Vec<ObjectiveConfig>,
    /// Stopping criteria of the search.
    #[serde(default)]
    pub search: SearchConfig,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for CoreHunterConfig {
    fn default() -> Self {
        Self {
            subset_size: SizeBounds::default(),
            objectives: vec![ObjectiveConfig::default()],
            search: SearchConfig::default(),
            random_seed: None,
        }
    }
}

/// Inclusive bounds on the core size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeBounds {
    pub min: usize,
    pub max: usize,
}

impl SizeBounds {
    pub fn fixed(size: usize) -> Self {
        Self {
            min: size,
            max: size,
        }
    }

    #[inline]
    pub fn contains(&self, size: usize) -> bool {
        self.min <= size && size <= self.max
    }
}

impl Default for SizeBounds {
    fn default() -> Self {
        Self::fixed(10)
    }
}

/// Stopping criteria; the search ends when the first one is met.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of evaluated moves.
    #[serde(default = "default_max_steps")]
    pub max_steps: Option<u64>,
    /// Stop after this many consecutive steps without improvement.
    #[serde(default = "default_max_steps_without_improvement")]
    pub max_steps_without_improvement: Option<u64>,
    /// Wall-clock limit in seconds.
    #[serde(default)]
    pub max_time_seconds: Option<f64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            max_steps_without_improvement: default_max_steps_without_improvement(),
            max_time_seconds: None,
        }
    }
}

fn default_max_steps() -> Option<u64> {
    Some(10_000)
}
fn default_max_steps_without_improvement() -> Option<u64> {
    Some(2_000)
}

impl CoreHunterConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let SizeBounds { min, max } = self.subset_size;
        if min == 0 {
            return Err(ConfigError::EmptySubset);
        }
        if min > max {
            return Err(ConfigError::InvalidSizeBounds { min, max });
        }

        if self.objectives.is_empty() {
            return Err(ConfigError::NoObjectives);
        }
        for objective in &self.objectives {
            if !objective.weight.is_finite() || objective.weight < 0.0 {
                return Err(ConfigError::InvalidWeight(format!(
                    "{:?} weight {} must be finite and non-negative",
                    objective.objective, objective.weight
                )));
            }
            if let Some(range) = objective.normalization {
                if !(range.lower.is_finite() && range.upper.is_finite() && range.lower < range.upper)
                {
                    return Err(ConfigError::InvalidNormalization(format!(
                        "{:?} range [{}, {}]",
                        objective.objective, range.lower, range.upper
                    )));
                }
            }
            if objective.measure.is_some() && !objective.objective.uses_distance() {
                return Err(ConfigError::UnexpectedMeasure {
                    objective: objective.objective,
                });
            }
        }

        let search = &self.search;
        if search.max_steps.is_none()
            && search.max_steps_without_improvement.is_none()
            && search.max_time_seconds.is_none()
        {
            return Err(ConfigError::NoStopCriterion);
        }
        if let Some(seconds) = search.max_time_seconds {
            if !(seconds.is_finite() && seconds > 0.0) {
                return Err(ConfigError::InvalidTimeLimit(seconds));
            }
        }
        Ok(())
    }

    /// Validate against a dataset of `size` items.
    pub fn validate_for(&self, size: usize) -> Result<(), ConfigError> {
        self.validate()?;
        if self.subset_size.max > size {
            return Err(ConfigError::SubsetTooLarge {
                max: self.subset_size.max,
                size,
            });
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Minimum subset size must be at least 1")]
    EmptySubset,
    #[error("Subset size bounds are inverted: min {min} > max {max}")]
    InvalidSizeBounds { min: usize, max: usize },
    #[error("Maximum subset size {max} exceeds dataset size {size}")]
    SubsetTooLarge { max: usize, size: usize },
    #[error("No objectives specified")]
    NoObjectives,
    #[error("Invalid objective weight: {0}")]
    InvalidWeight(String),
    #[error("Invalid normalization range: {0}")]
    InvalidNormalization(String),
    #[error("Objective {objective:?} does not use a distance measure")]
    UnexpectedMeasure { objective: ObjectiveType },
    #[error("Search needs at least one stopping criterion")]
    NoStopCriterion,
    #[error("Time limit must be positive, got {0}")]
    InvalidTimeLimit(f64),
}
