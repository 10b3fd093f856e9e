//! Configuration for graph spaces

use crate::error::{GraphSpaceError, Result};
use serde::{Deserialize, Serialize};

/// Distribution of adjacency entries drawn by `random_point`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntryDistribution {
    /// Uniform on `[low, high)`
    Uniform {
        /// Lower bound (inclusive)
        low: f64,
        /// Upper bound (exclusive)
        high: f64,
    },
    /// Gaussian with the given mean and standard deviation
    Normal {
        /// Mean
        mean: f64,
        /// Standard deviation
        std_dev: f64,
    },
}

impl EntryDistribution {
    /// Uniform on `[-bound / 2, bound / 2)`
    pub fn centered(bound: f64) -> Self {
        Self::Uniform {
            low: -0.5 * bound,
            high: 0.5 * bound,
        }
    }

    /// Validate distribution parameters
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() {
                    return Err(GraphSpaceError::invalid_parameter(
                        "distribution",
                        "uniform bounds must be finite",
                    ));
                }
                if low >= high {
                    return Err(GraphSpaceError::invalid_parameter(
                        "distribution",
                        "upper bound must be higher than lower bound",
                    ));
                }
                if !(high - low).is_finite() {
                    return Err(GraphSpaceError::invalid_parameter(
                        "distribution",
                        "uniform range width overflows f64",
                    ));
                }
            }
            Self::Normal { mean, std_dev } => {
                if !mean.is_finite() || !std_dev.is_finite() || std_dev < 0.0 {
                    return Err(GraphSpaceError::invalid_parameter(
                        "distribution",
                        "normal needs a finite mean and a finite non-negative std_dev",
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Default for EntryDistribution {
    fn default() -> Self {
        Self::centered(1.0)
    }
}

/// Configuration for a [`GraphSpace`](super::GraphSpace)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSpaceConfig {
    /// Node capacity n
    pub n_nodes: usize,
    /// Attribute dimension d (0 = scalar attributes)
    pub attribute_dim: usize,
    /// Distribution used by `random_point`
    pub distribution: EntryDistribution,
}

impl GraphSpaceConfig {
    /// Configuration for graphs on `n_nodes` nodes with scalar attributes
    pub fn new(n_nodes: usize) -> Self {
        Self {
            n_nodes,
            attribute_dim: 0,
            distribution: EntryDistribution::default(),
        }
    }

    /// Set the attribute dimension
    pub fn with_attribute_dim(mut self, attribute_dim: usize) -> Self {
        self.attribute_dim = attribute_dim;
        self
    }

    /// Set the sampling distribution
    pub fn with_distribution(mut self, distribution: EntryDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Sample uniformly on `[-bound / 2, bound / 2)`
    pub fn with_bound(mut self, bound: f64) -> Self {
        self.distribution = EntryDistribution::centered(bound);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.n_nodes == 0 {
            return Err(GraphSpaceError::config("n_nodes", "must be > 0"));
        }
        self.distribution.validate()
    }
}

impl Default for GraphSpaceConfig {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(matches!(
            GraphSpaceConfig::new(0).validate(),
            Err(GraphSpaceError::Config { .. })
        ));
        assert!(GraphSpaceConfig::new(3).validate().is_ok());
        assert!(GraphSpaceConfig::new(3).with_bound(0.0).validate().is_err());
        assert!(GraphSpaceConfig::new(3)
            .with_distribution(EntryDistribution::Normal {
                mean: 0.0,
                std_dev: -1.0
            })
            .validate()
            .is_err());
    }

    #[test]
    fn test_uniform_range_overflow_rejected() {
        let wide = EntryDistribution::Uniform {
            low: -1e308,
            high: 1e308,
        };
        assert!(matches!(
            wide.validate(),
            Err(GraphSpaceError::InvalidParameter { .. })
        ));
        assert!(GraphSpaceConfig::new(2)
            .with_distribution(wide)
            .validate()
            .is_err());
        assert!(GraphSpaceConfig::new(2).with_bound(1e308).validate().is_ok());
    }

    #[test]
    fn test_centered_bounds() {
        assert_eq!(
            EntryDistribution::centered(2.0),
            EntryDistribution::Uniform {
                low: -1.0,
                high: 1.0
            }
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let config = GraphSpaceConfig::new(4).with_attribute_dim(2);
        let json = serde_json::to_string(&config).unwrap();
        let back: GraphSpaceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
