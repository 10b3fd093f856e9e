//! Graph Space
//!
//! The set of attributed graphs on at most n nodes, represented by padded
//! adjacency tensors of shape `n × n` (or `n × n × d`) and quotiented by the
//! symmetric group S_n acting through simultaneous row/column permutation:
//!
//! X / S_n,   σ · A = P_σ A P_σᵀ
//!
//! Two adjacency tensors describe the same graph when they lie in the same
//! orbit. The space itself only does membership and orbit bookkeeping; the
//! quotient distance lives in [`GraphSpaceMetric`](crate::GraphSpaceMetric).

mod config;

pub use config::{EntryDistribution, GraphSpaceConfig};

use crate::error::{GraphSpaceError, Result};
use crate::graph::AttributedGraph;
use crate::permutation::Permutation;
use rand::distributions::Uniform;
use rand::Rng;
use rand_distr::Normal;

/// Graphs on n nodes modulo node relabeling
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSpace {
    config: GraphSpaceConfig,
}

impl GraphSpace {
    /// Space of graphs on `n_nodes` nodes with scalar attributes
    pub fn new(n_nodes: usize) -> Result<Self> {
        Self::from_config(GraphSpaceConfig::new(n_nodes))
    }

    /// Space of graphs on `n_nodes` nodes with `attribute_dim`-dimensional
    /// attributes (0 = scalar)
    pub fn with_attributes(n_nodes: usize, attribute_dim: usize) -> Result<Self> {
        Self::from_config(GraphSpaceConfig::new(n_nodes).with_attribute_dim(attribute_dim))
    }

    /// Create from configuration
    pub fn from_config(config: GraphSpaceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get configuration
    pub fn config(&self) -> &GraphSpaceConfig {
        &self.config
    }

    /// Node capacity n
    pub fn n_nodes(&self) -> usize {
        self.config.n_nodes
    }

    /// Attribute dimension (0 = scalar)
    pub fn attribute_dim(&self) -> usize {
        self.config.attribute_dim
    }

    /// Storage depth `max(attribute_dim, 1)`
    pub fn depth(&self) -> usize {
        self.config.attribute_dim.max(1)
    }

    /// Dimension of the flattened ambient space, `n² · depth`
    pub fn ambient_dim(&self) -> usize {
        self.n_nodes() * self.n_nodes() * self.depth()
    }

    /// Logical adjacency shape of members: `[n, n]` or `[n, n, d]`
    pub fn shape(&self) -> Vec<usize> {
        let n = self.n_nodes();
        if self.attribute_dim() == 0 {
            vec![n, n]
        } else {
            vec![n, n, self.attribute_dim()]
        }
    }

    /// Membership predicate: true iff the adjacency shape is `shape()`
    pub fn belongs(&self, graph: &AttributedGraph) -> bool {
        graph.n_nodes() == self.n_nodes() && graph.attribute_dim() == self.attribute_dim()
    }

    /// Fallible membership check used by the metric
    ///
    /// Node count disagreements are reported as `DimensionMismatch`, attribute
    /// disagreements as `Shape`.
    pub fn check(&self, graph: &AttributedGraph) -> Result<()> {
        if graph.n_nodes() != self.n_nodes() {
            return Err(GraphSpaceError::dimension_mismatch(
                self.n_nodes(),
                graph.n_nodes(),
            ));
        }
        if graph.attribute_dim() != self.attribute_dim() {
            return Err(GraphSpaceError::shape(format!(
                "expected attribute dimension {}, got {}",
                self.attribute_dim(),
                graph.attribute_dim()
            )));
        }
        Ok(())
    }

    /// Draw `n_samples` graphs with i.i.d. entries from the configured
    /// distribution
    ///
    /// All randomness comes from `rng`; seed it to reproduce samples.
    pub fn random_point<R: Rng + ?Sized>(
        &self,
        n_samples: usize,
        rng: &mut R,
    ) -> Result<Vec<AttributedGraph>> {
        let len = self.ambient_dim();
        let n = self.n_nodes();
        let attribute_dim = self.attribute_dim();

        match self.config.distribution {
            EntryDistribution::Uniform { low, high } => {
                let dist = Uniform::new(low, high);
                (0..n_samples)
                    .map(|_| {
                        let values = (0..len).map(|_| rng.sample(&dist)).collect();
                        AttributedGraph::from_flat(n, attribute_dim, values)
                    })
                    .collect()
            }
            EntryDistribution::Normal { mean, std_dev } => {
                let dist = Normal::new(mean, std_dev)
                    .map_err(|e| GraphSpaceError::invalid_parameter("distribution", e.to_string()))?;
                (0..n_samples)
                    .map(|_| {
                        let values = (0..len).map(|_| rng.sample(&dist)).collect();
                        AttributedGraph::from_flat(n, attribute_dim, values)
                    })
                    .collect()
            }
        }
    }

    /// Apply `P A Pᵀ` to a member graph; the input is left untouched
    pub fn permute(&self, graph: &AttributedGraph, permutation: &Permutation) -> Result<AttributedGraph> {
        self.check(graph)?;
        graph.permuted(permutation)
    }

    /// Embed a graph with at most `n_nodes` nodes by zero padding
    pub fn pad_with_zeros(&self, graph: &AttributedGraph) -> Result<AttributedGraph> {
        if graph.attribute_dim() != self.attribute_dim() {
            return Err(GraphSpaceError::shape(format!(
                "expected attribute dimension {}, got {}",
                self.attribute_dim(),
                graph.attribute_dim()
            )));
        }
        if graph.n_nodes() > self.n_nodes() {
            return Err(GraphSpaceError::dimension_mismatch(
                self.n_nodes(),
                graph.n_nodes(),
            ));
        }
        graph.padded(self.n_nodes())
    }
}
