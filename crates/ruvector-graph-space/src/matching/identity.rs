//! Identity matcher: the labelled regime, no alignment search

use super::{check_compatible, GraphMatcher};
use crate::error::Result;
use crate::graph::AttributedGraph;
use crate::permutation::Permutation;

/// Always returns the identity permutation
///
/// Under this matcher the graph space metric is exactly the ambient metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityMatcher;

impl IdentityMatcher {
    /// Create a new identity matcher
    pub fn new() -> Self {
        Self
    }
}

impl GraphMatcher for IdentityMatcher {
    fn match_graphs(
        &self,
        reference: &AttributedGraph,
        target: &AttributedGraph,
    ) -> Result<Permutation> {
        let n = check_compatible(reference, target)?;
        Ok(Permutation::identity(n))
    }

    fn is_exact(&self) -> bool {
        false
    }
}
