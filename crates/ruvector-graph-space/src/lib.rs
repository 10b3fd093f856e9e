//! # RuVector Graph Space
//!
//! Attributed graphs as points of a Euclidean total space, quotiented by node
//! relabeling, featuring:
//!
//! - **Graph Space**: padded `n × n[× d]` adjacency tensors modulo the
//!   symmetric group S_n acting by `P A Pᵀ`
//! - **Graph Matching**: identity (labelled), FAQ (approximate quadratic
//!   assignment) and exhaustive (exact, small n) alignment strategies
//! - **Quotient Metric**: distances, batched matching and geodesics between
//!   aligned graphs over a pluggable ambient metric
//!
//! ## Design Principles
//!
//! 1. **Pure Rust**: Hungarian assignment and Frank-Wolfe in-crate, no BLAS/LAPACK
//! 2. **Explicit Randomness**: every random draw takes a caller-provided `Rng` or seed
//! 3. **Honest Approximation**: FAQ results are upper bounds and are reported as such
//! 4. **Parallel Batches**: independent pairs run on rayon behind the `parallel` feature
//!
//! ## Quick Start
//!
//! ```rust
//! use ruvector_graph_space::prelude::*;
//!
//! let space = GraphSpace::new(3).unwrap();
//! let a = AttributedGraph::from_rows(vec![
//!     vec![10.0, 3.0, 1.0],
//!     vec![3.0, 2.0, 4.0],
//!     vec![1.0, 4.0, 5.0],
//! ])
//! .unwrap();
//! let swap = Permutation::try_from_vec(vec![2, 1, 0]).unwrap();
//! let b = space.permute(&a, &swap).unwrap();
//!
//! // Labelled: plain Frobenius distance
//! let mut metric = GraphSpaceMetric::new(space);
//! assert!((metric.dist(&a, &b).unwrap() - 54f64.sqrt()).abs() < 1e-10);
//!
//! // Unlabelled: FAQ recovers the relabeling
//! metric.set_matcher(MatcherKind::Faq(FaqConfig::default())).unwrap();
//! assert!(metric.dist(&a, &b).unwrap() < 1e-10);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ambient;
pub mod error;
pub mod graph;
pub mod matching;
pub mod metric;
pub mod permutation;
pub mod space;
pub mod utils;

pub use ambient::{AmbientGeodesic, AmbientMetric, EuclideanMetric};
pub use error::{GraphSpaceError, Result};
pub use graph::{AttributedGraph, LabelledEdge, LabelledGraph, LabelledNode};
pub use matching::{
    ExhaustiveMatcher, FaqConfig, FaqInit, FaqMatcher, FaqSolution, GraphMatcher,
    HungarianSolver, IdentityMatcher, LinearAssignment, Matcher, MatcherKind,
};
pub use metric::{Alignment, GraphGeodesic, GraphSpaceMetric};
pub use permutation::{all_permutations, Permutation};
pub use space::{EntryDistribution, GraphSpace, GraphSpaceConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ambient::*;
    pub use crate::error::*;
    pub use crate::graph::*;
    pub use crate::matching::*;
    pub use crate::metric::*;
    pub use crate::permutation::*;
    pub use crate::space::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_version() {
        let version = env!("CARGO_PKG_VERSION");
        assert!(!version.is_empty());
    }
}
