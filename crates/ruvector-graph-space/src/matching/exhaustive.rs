//! Exhaustive matcher
//!
//! Scans all n! permutations and returns one attaining
//!
//! min_{σ ∈ S_n} ‖A − P_σ B P_σᵀ‖_F
//!
//! exactly. With this matcher the graph space distance is the true quotient
//! pseudo-metric, at factorial cost, so it is limited to small graphs.

use super::{check_compatible, GraphMatcher};
use crate::error::{GraphSpaceError, Result};
use crate::graph::AttributedGraph;
use crate::permutation::{all_permutations, Permutation};
use ndarray::Array3;
use tracing::debug;

/// Default node limit (8! = 40320 candidates)
pub const DEFAULT_MAX_NODES: usize = 8;

/// Exact brute-force alignment for small graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExhaustiveMatcher {
    max_nodes: usize,
}

impl ExhaustiveMatcher {
    /// Create a matcher accepting graphs on up to [`DEFAULT_MAX_NODES`] nodes
    pub fn new() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
        }
    }

    /// Set the node limit
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Node limit
    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    /// ‖A − σ·B‖², abandoned early once it exceeds `bound`
    fn bounded_cost(a: &Array3<f64>, b: &Array3<f64>, perm: &[usize], bound: f64) -> f64 {
        let (n, _, depth) = a.dim();
        let mut total = 0.0;
        for i in 0..n {
            let pi = perm[i];
            for j in 0..n {
                let pj = perm[j];
                for k in 0..depth {
                    let d = a[[i, j, k]] - b[[pi, pj, k]];
                    total += d * d;
                }
            }
            if total > bound {
                return total;
            }
        }
        total
    }
}

impl Default for ExhaustiveMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphMatcher for ExhaustiveMatcher {
    fn match_graphs(
        &self,
        reference: &AttributedGraph,
        target: &AttributedGraph,
    ) -> Result<Permutation> {
        let n = check_compatible(reference, target)?;
        if n > self.max_nodes {
            return Err(GraphSpaceError::invalid_parameter(
                "max_nodes",
                format!(
                    "exhaustive matching limited to {} nodes, got {}",
                    self.max_nodes, n
                ),
            ));
        }

        let a = reference.adjacency();
        let b = target.adjacency();

        let mut best = Permutation::identity(n);
        let mut best_cost = f64::INFINITY;
        let mut scanned = 0usize;

        // Lexicographic order visits the identity first, so ties keep it
        for perm in all_permutations(n) {
            scanned += 1;
            let cost = Self::bounded_cost(a, b, perm.as_slice(), best_cost);
            if cost < best_cost {
                best_cost = cost;
                best = perm;
            }
        }

        debug!(n_nodes = n, scanned, cost = best_cost, "exhaustive matching finished");
        Ok(best)
    }

    fn is_exact(&self) -> bool {
        true
    }
}
