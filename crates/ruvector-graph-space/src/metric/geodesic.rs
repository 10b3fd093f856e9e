//! Geodesics between aligned graphs

use crate::ambient::AmbientGeodesic;
use crate::error::{GraphSpaceError, Result};
use crate::graph::AttributedGraph;
use crate::permutation::Permutation;

/// Ambient geodesic from `a` to the aligned copy of `b`
///
/// The alignment is computed once, when the geodesic is built; evaluating it
/// at any number of parameters never re-runs the matcher.
#[derive(Debug, Clone)]
pub struct GraphGeodesic {
    start: AttributedGraph,
    end: AttributedGraph,
    permutation: Permutation,
    path: AmbientGeodesic,
}

impl GraphGeodesic {
    pub(crate) fn new(
        start: AttributedGraph,
        end: AttributedGraph,
        permutation: Permutation,
        path: AmbientGeodesic,
    ) -> Self {
        Self {
            start,
            end,
            permutation,
            path,
        }
    }

    /// Point at parameter `t`
    ///
    /// `t = 0` gives the start graph and `t = 1` the aligned end graph.
    /// Finite values outside `[0, 1]` extrapolate along the ambient curve.
    pub fn at(&self, t: f64) -> Result<AttributedGraph> {
        if !t.is_finite() {
            return Err(GraphSpaceError::invalid_parameter(
                "t",
                format!("geodesic parameter must be finite, got {}", t),
            ));
        }
        AttributedGraph::from_flat(
            self.start.n_nodes(),
            self.start.attribute_dim(),
            self.path.point_at(t),
        )
    }

    /// Points at each of `times`, in order
    pub fn sample(&self, times: &[f64]) -> Result<Vec<AttributedGraph>> {
        times.iter().map(|&t| self.at(t)).collect()
    }

    /// `n_points` points at evenly spaced parameters from 0 to 1 inclusive
    pub fn evenly_spaced(&self, n_points: usize) -> Result<Vec<AttributedGraph>> {
        match n_points {
            0 => Ok(Vec::new()),
            1 => Ok(vec![self.start.clone()]),
            _ => {
                let last = (n_points - 1) as f64;
                (0..n_points).map(|i| self.at(i as f64 / last)).collect()
            }
        }
    }

    /// First endpoint, the reference graph
    pub fn start(&self) -> &AttributedGraph {
        &self.start
    }

    /// Second endpoint: the target after alignment, not necessarily in its
    /// input node order
    pub fn end(&self) -> &AttributedGraph {
        &self.end
    }

    /// Alignment applied to the target
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambient::{AmbientMetric, EuclideanMetric};

    fn line() -> GraphGeodesic {
        let a = AttributedGraph::from_rows(vec![vec![0.0, 2.0], vec![2.0, 0.0]]).unwrap();
        let b = AttributedGraph::from_rows(vec![vec![4.0, 0.0], vec![0.0, 4.0]]).unwrap();
        let path = EuclideanMetric::new(4).geodesic(&a.flat(), &b.flat()).unwrap();
        GraphGeodesic::new(a, b, Permutation::identity(2), path)
    }

    #[test]
    fn test_midpoint() {
        let mid = line().at(0.5).unwrap();
        assert_eq!(mid.flat().as_ref(), &[2.0, 1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_extrapolation_and_non_finite() {
        let g = line();
        let beyond = g.at(2.0).unwrap();
        assert_eq!(beyond.flat().as_ref(), &[8.0, -2.0, -2.0, 8.0]);
        assert!(matches!(
            g.at(f64::NAN),
            Err(GraphSpaceError::InvalidParameter { .. })
        ));
        assert!(g.at(f64::INFINITY).is_err());
    }

    #[test]
    fn test_evenly_spaced() {
        let g = line();
        assert!(g.evenly_spaced(0).unwrap().is_empty());
        let points = g.evenly_spaced(5).unwrap();
        assert_eq!(points.len(), 5);
        assert_eq!(&points[0], g.start());
        assert_eq!(&points[4], g.end());
    }
}
