//! Graph Space Metric
//!
//! Quotient distance on a [`GraphSpace`]:
//!
//! d([A], [B]) = ‖A − σ*·B‖,   σ* = matcher(A, B)
//!
//! where ‖·‖ is the ambient metric on flattened adjacency tensors.
//!
//! ## Exactness
//!
//! Whether `dist` is a metric depends on the matcher:
//!
//! - `Identity`: the ambient metric itself (labelled graphs); a true metric
//! - `Exhaustive`: the exact quotient pseudo-metric
//! - `Faq`: an upper bound on the quotient distance. It can be asymmetric
//!   and can violate the triangle inequality; such violations are reported
//!   as computed and never corrected

mod geodesic;

pub use geodesic::GraphGeodesic;

use crate::ambient::{AmbientMetric, EuclideanMetric};
use crate::error::{GraphSpaceError, Result};
use crate::graph::AttributedGraph;
use crate::matching::{GraphMatcher, HungarianSolver, Matcher, MatcherKind, SharedAssignment};
use crate::permutation::Permutation;
use crate::space::GraphSpace;
use ndarray::Array2;
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Target graph aligned to a reference
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// Permutation found by the matcher
    pub permutation: Permutation,
    /// Target with its nodes reordered by `permutation`
    pub aligned: AttributedGraph,
}

/// Matcher plus ambient metric over a graph space
#[derive(Debug, Clone)]
pub struct GraphSpaceMetric {
    space: GraphSpace,
    ambient: Arc<dyn AmbientMetric>,
    matcher: Matcher,
    assignment: SharedAssignment,
}

impl GraphSpaceMetric {
    /// Euclidean ambient metric with the identity matcher
    pub fn new(space: GraphSpace) -> Self {
        let ambient = Arc::new(EuclideanMetric::new(space.ambient_dim()));
        Self {
            space,
            ambient,
            matcher: Matcher::default(),
            assignment: Arc::new(HungarianSolver),
        }
    }

    /// Replace the ambient metric; its dimension must be `n² · depth`
    pub fn with_ambient_metric(mut self, ambient: Arc<dyn AmbientMetric>) -> Result<Self> {
        if ambient.dim() != self.space.ambient_dim() {
            return Err(GraphSpaceError::config(
                "ambient_metric",
                format!(
                    "dimension {} does not match graph space dimension {}",
                    ambient.dim(),
                    self.space.ambient_dim()
                ),
            ));
        }
        self.ambient = ambient;
        Ok(self)
    }

    /// Builder form of [`set_matcher`](Self::set_matcher)
    pub fn with_matcher(mut self, kind: MatcherKind) -> Result<Self> {
        self.set_matcher(kind)?;
        Ok(self)
    }

    /// Swap the active matcher; affects subsequent calls only
    pub fn set_matcher(&mut self, kind: MatcherKind) -> Result<()> {
        self.matcher = Matcher::from_kind(kind)?.with_assignment_solver(self.assignment.clone());
        Ok(())
    }

    /// Builder form of [`set_assignment_solver`](Self::set_assignment_solver)
    pub fn with_assignment_solver(mut self, solver: SharedAssignment) -> Self {
        self.set_assignment_solver(solver);
        self
    }

    /// Linear assignment backend used by FAQ matching, now and after any
    /// later `set_matcher`
    pub fn set_assignment_solver(&mut self, solver: SharedAssignment) {
        self.assignment = solver;
        self.matcher = std::mem::take(&mut self.matcher)
            .with_assignment_solver(self.assignment.clone());
    }

    /// Active matcher
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Underlying graph space
    pub fn space(&self) -> &GraphSpace {
        &self.space
    }

    /// Ambient metric
    pub fn ambient_metric(&self) -> &dyn AmbientMetric {
        self.ambient.as_ref()
    }

    /// Align `b` to `a` with the active matcher
    pub fn align(&self, a: &AttributedGraph, b: &AttributedGraph) -> Result<Alignment> {
        self.space.check(a)?;
        self.space.check(b)?;
        let permutation = self.matcher.match_graphs(a, b)?;
        let aligned = b.permuted(&permutation)?;
        Ok(Alignment {
            permutation,
            aligned,
        })
    }

    /// Quotient distance between two graphs
    ///
    /// Zero iff the adjacency tensors coincide after the returned alignment.
    /// See the module docs for when this is exact.
    pub fn dist(&self, a: &AttributedGraph, b: &AttributedGraph) -> Result<f64> {
        let alignment = self.align(a, b)?;
        self.ambient.distance(&a.flat(), &alignment.aligned.flat())
    }

    /// Squared quotient distance
    pub fn squared_dist(&self, a: &AttributedGraph, b: &AttributedGraph) -> Result<f64> {
        let alignment = self.align(a, b)?;
        self.ambient
            .squared_distance(&a.flat(), &alignment.aligned.flat())
    }

    /// Positional distances `dist(a[i], b[i])`
    pub fn dist_batch(&self, a: &[AttributedGraph], b: &[AttributedGraph]) -> Result<Vec<f64>> {
        if a.len() != b.len() {
            return Err(GraphSpaceError::length_mismatch(a.len(), b.len()));
        }
        debug!(pairs = a.len(), "graph space distance batch");

        #[cfg(feature = "parallel")]
        {
            a.par_iter()
                .zip(b.par_iter())
                .map(|(x, y)| self.dist(x, y))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            a.iter().zip(b.iter()).map(|(x, y)| self.dist(x, y)).collect()
        }
    }

    /// Symmetric distance matrix of a collection
    ///
    /// Entry (i, j) for i < j is `dist(graphs[i], graphs[j])`, mirrored below
    /// the diagonal; the diagonal is zero. Under an approximate matcher
    /// `dist(graphs[j], graphs[i])` may differ from the mirrored value; use
    /// [`directed_distances`](Self::directed_distances) to see both.
    pub fn pairwise_distances(&self, graphs: &[AttributedGraph]) -> Result<Array2<f64>> {
        let n = graphs.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .collect();
        debug!(graphs = n, pairs = pairs.len(), "pairwise graph space distances");

        let mut distances = Array2::zeros((n, n));
        for ((i, j), d) in self.distances_for(graphs, pairs)? {
            distances[[i, j]] = d;
            distances[[j, i]] = d;
        }
        Ok(distances)
    }

    /// Distance matrix with entry (i, j) = `dist(graphs[i], graphs[j])` for
    /// every ordered pair i ≠ j, as computed
    pub fn directed_distances(&self, graphs: &[AttributedGraph]) -> Result<Array2<f64>> {
        let n = graphs.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
            .collect();
        debug!(graphs = n, pairs = pairs.len(), "directed graph space distances");

        let mut distances = Array2::zeros((n, n));
        for ((i, j), d) in self.distances_for(graphs, pairs)? {
            distances[[i, j]] = d;
        }
        Ok(distances)
    }

    fn distances_for(
        &self,
        graphs: &[AttributedGraph],
        pairs: Vec<(usize, usize)>,
    ) -> Result<Vec<((usize, usize), f64)>> {
        #[cfg(feature = "parallel")]
        {
            pairs
                .into_par_iter()
                .map(|(i, j)| self.dist(&graphs[i], &graphs[j]).map(|d| ((i, j), d)))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            pairs
                .into_iter()
                .map(|(i, j)| self.dist(&graphs[i], &graphs[j]).map(|d| ((i, j), d)))
                .collect()
        }
    }

    /// Geodesic from `a` to the aligned copy of `b`
    pub fn geodesic(&self, a: &AttributedGraph, b: &AttributedGraph) -> Result<GraphGeodesic> {
        let Alignment {
            permutation,
            aligned,
        } = self.align(a, b)?;
        let path = self.ambient.geodesic(&a.flat(), &aligned.flat())?;
        Ok(GraphGeodesic::new(a.clone(), aligned, permutation, path))
    }

    /// Positional matching `matcher(a[i], b[i])`
    pub fn matching(
        &self,
        a: &[AttributedGraph],
        b: &[AttributedGraph],
    ) -> Result<Vec<Permutation>> {
        if a.len() != b.len() {
            return Err(GraphSpaceError::length_mismatch(a.len(), b.len()));
        }
        for g in a.iter().chain(b.iter()) {
            self.space.check(g)?;
        }
        self.matcher.match_many(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambient::AmbientGeodesic;
    use crate::matching::{FaqConfig, LinearAssignment};

    fn scenario() -> (AttributedGraph, AttributedGraph) {
        let a = AttributedGraph::from_rows(vec![
            vec![10.0, 3.0, 1.0],
            vec![3.0, 2.0, 4.0],
            vec![1.0, 4.0, 5.0],
        ])
        .unwrap();
        let swap = Permutation::try_from_vec(vec![2, 1, 0]).unwrap();
        let b = a.permuted(&swap).unwrap();
        (a, b)
    }

    /// Euclidean distance scaled by a constant
    #[derive(Debug)]
    struct Scaled {
        dim: usize,
        factor: f64,
    }

    impl AmbientMetric for Scaled {
        fn dim(&self) -> usize {
            self.dim
        }

        fn squared_distance(&self, x: &[f64], y: &[f64]) -> Result<f64> {
            let inner = EuclideanMetric::new(self.dim).squared_distance(x, y)?;
            Ok(self.factor * self.factor * inner)
        }

        fn geodesic(&self, x: &[f64], y: &[f64]) -> Result<AmbientGeodesic> {
            EuclideanMetric::new(self.dim).geodesic(x, y)
        }
    }

    #[test]
    fn test_identity_vs_faq() {
        let (a, b) = scenario();
        let mut metric = GraphSpaceMetric::new(GraphSpace::new(3).unwrap());
        let labelled = metric.dist(&a, &b).unwrap();
        assert!((labelled - 54f64.sqrt()).abs() < 1e-12);

        metric.set_matcher(MatcherKind::Faq(FaqConfig::new())).unwrap();
        assert!(metric.dist(&a, &b).unwrap() < 1e-12);
    }

    #[test]
    fn test_squared_dist() {
        let (a, b) = scenario();
        let metric = GraphSpaceMetric::new(GraphSpace::new(3).unwrap());
        assert!((metric.squared_dist(&a, &b).unwrap() - 54.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_ambient_metric() {
        let (a, b) = scenario();
        let space = GraphSpace::new(3).unwrap();
        let metric = GraphSpaceMetric::new(space)
            .with_ambient_metric(Arc::new(Scaled { dim: 9, factor: 2.0 }))
            .unwrap();
        assert!((metric.dist(&a, &b).unwrap() - 2.0 * 54f64.sqrt()).abs() < 1e-12);

        let wrong = GraphSpaceMetric::new(GraphSpace::new(3).unwrap())
            .with_ambient_metric(Arc::new(EuclideanMetric::new(4)));
        assert!(matches!(wrong, Err(GraphSpaceError::Config { .. })));
    }

    #[test]
    fn test_rejects_foreign_graphs() {
        let (a, _) = scenario();
        let small = AttributedGraph::from_rows(vec![vec![0.0; 2]; 2]).unwrap();
        let metric = GraphSpaceMetric::new(GraphSpace::new(3).unwrap());
        assert!(matches!(
            metric.dist(&a, &small),
            Err(GraphSpaceError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_pairwise_distances() {
        let (a, b) = scenario();
        let c = AttributedGraph::from_rows(vec![vec![0.0; 3]; 3]).unwrap();
        let metric = GraphSpaceMetric::new(GraphSpace::new(3).unwrap());
        let graphs = vec![a.clone(), b.clone(), c.clone()];
        let d = metric.pairwise_distances(&graphs).unwrap();

        assert_eq!(d.dim(), (3, 3));
        for i in 0..3 {
            assert_eq!(d[[i, i]], 0.0);
            for j in 0..3 {
                assert_eq!(d[[i, j]], d[[j, i]]);
            }
        }
        assert_eq!(d[[0, 2]], metric.dist(&a, &c).unwrap());
    }

    /// Assignment backend that always keeps the current order
    #[derive(Debug)]
    struct KeepOrder;

    impl LinearAssignment for KeepOrder {
        fn solve(&self, cost: ndarray::ArrayView2<'_, f64>) -> Result<Permutation> {
            Ok(Permutation::identity(cost.nrows()))
        }
    }

    #[test]
    fn test_assignment_solver_reaches_faq() {
        let (a, b) = scenario();
        let mut metric = GraphSpaceMetric::new(GraphSpace::new(3).unwrap())
            .with_matcher(MatcherKind::Faq(FaqConfig::new()))
            .unwrap()
            .with_assignment_solver(Arc::new(KeepOrder));
        assert!((metric.dist(&a, &b).unwrap() - 54f64.sqrt()).abs() < 1e-12);

        // kept across matcher swaps
        metric.set_matcher(MatcherKind::Faq(FaqConfig::new().with_max_iterations(5))).unwrap();
        assert!((metric.dist(&a, &b).unwrap() - 54f64.sqrt()).abs() < 1e-12);

        metric.set_assignment_solver(Arc::new(HungarianSolver));
        assert!(metric.dist(&a, &b).unwrap() < 1e-12);
    }

    #[test]
    fn test_directed_distances() {
        let (a, b) = scenario();
        let c = AttributedGraph::from_rows(vec![vec![0.0; 3]; 3]).unwrap();
        let graphs = vec![a, b, c];
        let metric = GraphSpaceMetric::new(GraphSpace::new(3).unwrap())
            .with_matcher(MatcherKind::Faq(FaqConfig::new()))
            .unwrap();
        let d = metric.directed_distances(&graphs).unwrap();

        for i in 0..3 {
            assert_eq!(d[[i, i]], 0.0);
            for j in 0..3 {
                if i != j {
                    assert_eq!(d[[i, j]], metric.dist(&graphs[i], &graphs[j]).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_batch_length_mismatch() {
        let (a, b) = scenario();
        let metric = GraphSpaceMetric::new(GraphSpace::new(3).unwrap());
        assert_eq!(
            metric.dist_batch(&[a.clone()], &[]),
            Err(GraphSpaceError::length_mismatch(1, 0))
        );
        assert_eq!(
            metric.matching(&[a.clone(), b.clone()], &[a]),
            Err(GraphSpaceError::length_mismatch(2, 1))
        );
    }

    #[test]
    fn test_geodesic_uses_alignment() {
        let (a, b) = scenario();
        let metric = GraphSpaceMetric::new(GraphSpace::new(3).unwrap())
            .with_matcher(MatcherKind::Exhaustive { max_nodes: 3 })
            .unwrap();
        let geodesic = metric.geodesic(&a, &b).unwrap();

        assert_eq!(geodesic.permutation().as_slice(), &[2, 1, 0]);
        assert_eq!(geodesic.at(0.0).unwrap(), a);
        assert_eq!(geodesic.at(1.0).unwrap(), a);
        // b aligned onto a is a itself, so the path is constant
        let mid = geodesic.at(0.3).unwrap();
        for (x, y) in mid.flat().iter().zip(a.flat().iter()) {
            assert!((x - y).abs() < 1e-12);
        }
    }
}
