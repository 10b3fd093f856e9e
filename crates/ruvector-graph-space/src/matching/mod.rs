//! Graph Matching
//!
//! A matcher aligns a target graph to a reference graph by choosing a node
//! permutation σ so that σ·B is close to A. The graph space distance is the
//! ambient distance after alignment, so the matcher decides how close the
//! computed distance gets to the true quotient distance
//!
//! d([A], [B]) = min_{σ ∈ S_n} ‖A − σ·B‖
//!
//! | Matcher | Cost | Result |
//! |---------|------|--------|
//! | [`IdentityMatcher`] | O(1) | labelled distance (upper bound) |
//! | [`FaqMatcher`] | O(iter · n³) | local optimum (upper bound) |
//! | [`ExhaustiveMatcher`] | O(n! · n²) | exact minimum |

mod assignment;
mod exhaustive;
mod faq;
mod identity;

pub use assignment::{assignment_cost, HungarianSolver, LinearAssignment, SharedAssignment};
pub use exhaustive::{ExhaustiveMatcher, DEFAULT_MAX_NODES};
pub use faq::{FaqConfig, FaqInit, FaqMatcher, FaqSolution};
pub use identity::IdentityMatcher;

use crate::error::{GraphSpaceError, Result};
use crate::graph::AttributedGraph;
use crate::permutation::Permutation;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Strategy that aligns a target graph to a reference graph
pub trait GraphMatcher: Debug + Send + Sync {
    /// Permutation σ of the target's nodes such that `target.permuted(σ)`
    /// is aligned with `reference`
    fn match_graphs(
        &self,
        reference: &AttributedGraph,
        target: &AttributedGraph,
    ) -> Result<Permutation>;

    /// Match each `targets[i]` to `references[i]`
    fn match_many(
        &self,
        references: &[AttributedGraph],
        targets: &[AttributedGraph],
    ) -> Result<Vec<Permutation>> {
        if references.len() != targets.len() {
            return Err(GraphSpaceError::length_mismatch(
                references.len(),
                targets.len(),
            ));
        }
        debug!(pairs = references.len(), "matching graph batch");

        #[cfg(feature = "parallel")]
        {
            references
                .par_iter()
                .zip(targets.par_iter())
                .map(|(a, b)| self.match_graphs(a, b))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            references
                .iter()
                .zip(targets.iter())
                .map(|(a, b)| self.match_graphs(a, b))
                .collect()
        }
    }

    /// Whether the returned permutation always attains the minimum
    fn is_exact(&self) -> bool;
}

/// Common precondition of every matcher; returns the node count
pub(crate) fn check_compatible(
    reference: &AttributedGraph,
    target: &AttributedGraph,
) -> Result<usize> {
    if reference.n_nodes() != target.n_nodes() {
        return Err(GraphSpaceError::dimension_mismatch(
            reference.n_nodes(),
            target.n_nodes(),
        ));
    }
    if reference.attribute_dim() != target.attribute_dim() {
        return Err(GraphSpaceError::shape(format!(
            "attribute dimensions differ: {} vs {}",
            reference.attribute_dim(),
            target.attribute_dim()
        )));
    }
    Ok(reference.n_nodes())
}

/// Serializable matcher selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatcherKind {
    /// No alignment
    Identity,
    /// Fast Approximate Quadratic assignment
    Faq(FaqConfig),
    /// Brute force over all permutations
    Exhaustive {
        /// Largest accepted node count
        max_nodes: usize,
    },
}

impl Default for MatcherKind {
    fn default() -> Self {
        MatcherKind::Identity
    }
}

/// Concrete matcher built from a [`MatcherKind`]
#[derive(Debug, Clone)]
pub enum Matcher {
    /// See [`IdentityMatcher`]
    Identity(IdentityMatcher),
    /// See [`FaqMatcher`]
    Faq(FaqMatcher<SharedAssignment>),
    /// See [`ExhaustiveMatcher`]
    Exhaustive(ExhaustiveMatcher),
}

impl Matcher {
    /// Build and validate a matcher
    pub fn from_kind(kind: MatcherKind) -> Result<Self> {
        match kind {
            MatcherKind::Identity => Ok(Matcher::Identity(IdentityMatcher)),
            MatcherKind::Faq(config) => {
                let faq = FaqMatcher::from_config(config)?;
                Ok(Matcher::Faq(
                    faq.with_solver::<SharedAssignment>(Arc::new(HungarianSolver)),
                ))
            }
            MatcherKind::Exhaustive { max_nodes } => {
                if max_nodes == 0 {
                    return Err(GraphSpaceError::config("max_nodes", "must be > 0"));
                }
                Ok(Matcher::Exhaustive(
                    ExhaustiveMatcher::new().with_max_nodes(max_nodes),
                ))
            }
        }
    }

    /// Route the linear assignment solves of an FAQ matcher through
    /// `solver`; the other variants never solve assignments
    pub fn with_assignment_solver(self, solver: SharedAssignment) -> Self {
        match self {
            Matcher::Faq(m) => Matcher::Faq(m.with_solver(solver)),
            other => other,
        }
    }

    /// Selection this matcher was built from
    pub fn kind(&self) -> MatcherKind {
        match self {
            Matcher::Identity(_) => MatcherKind::Identity,
            Matcher::Faq(m) => MatcherKind::Faq(m.config().clone()),
            Matcher::Exhaustive(m) => MatcherKind::Exhaustive {
                max_nodes: m.max_nodes(),
            },
        }
    }

    fn inner(&self) -> &dyn GraphMatcher {
        match self {
            Matcher::Identity(m) => m,
            Matcher::Faq(m) => m,
            Matcher::Exhaustive(m) => m,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Matcher::Identity(IdentityMatcher)
    }
}

impl GraphMatcher for Matcher {
    fn match_graphs(
        &self,
        reference: &AttributedGraph,
        target: &AttributedGraph,
    ) -> Result<Permutation> {
        self.inner().match_graphs(reference, target)
    }

    fn is_exact(&self) -> bool {
        self.inner().is_exact()
    }
}
