//! Ambient (total) space metrics
//!
//! Graphs of a [`GraphSpace`](crate::GraphSpace) live as flattened adjacency
//! tensors in R^{n·n·depth}. The quotient metric only needs two capabilities
//! from the ambient space: a distance and a geodesic between two fixed points.

use crate::error::{GraphSpaceError, Result};
use crate::utils::squared_euclidean;
use std::fmt::Debug;
use std::sync::Arc;

/// Curve `t ↦ γ(t)` in the ambient space, with `γ(0) = x` and `γ(1) = y`
#[derive(Clone)]
pub struct AmbientGeodesic {
    dim: usize,
    path: Arc<dyn Fn(f64) -> Vec<f64> + Send + Sync>,
}

impl AmbientGeodesic {
    /// Wrap a path function producing points of dimension `dim`
    pub fn new(dim: usize, path: impl Fn(f64) -> Vec<f64> + Send + Sync + 'static) -> Self {
        Self {
            dim,
            path: Arc::new(path),
        }
    }

    /// Dimension of the points produced
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Evaluate the curve at `t`
    pub fn point_at(&self, t: f64) -> Vec<f64> {
        (self.path)(t)
    }
}

impl Debug for AmbientGeodesic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmbientGeodesic")
            .field("dim", &self.dim)
            .finish_non_exhaustive()
    }
}

/// Metric on the flattened ambient space
pub trait AmbientMetric: Debug + Send + Sync {
    /// Dimension of the flattened space
    fn dim(&self) -> usize;

    /// Distance between two points
    fn distance(&self, x: &[f64], y: &[f64]) -> Result<f64> {
        Ok(self.squared_distance(x, y)?.sqrt())
    }

    /// Squared distance between two points
    fn squared_distance(&self, x: &[f64], y: &[f64]) -> Result<f64>;

    /// Geodesic between two fixed points
    fn geodesic(&self, x: &[f64], y: &[f64]) -> Result<AmbientGeodesic>;

    /// Check that both points have dimension `dim()`
    fn check_dims(&self, x: &[f64], y: &[f64]) -> Result<()> {
        let dim = self.dim();
        if x.len() != dim {
            return Err(GraphSpaceError::dimension_mismatch(dim, x.len()));
        }
        if y.len() != dim {
            return Err(GraphSpaceError::dimension_mismatch(dim, y.len()));
        }
        Ok(())
    }
}

/// Flat Euclidean (Frobenius) metric
///
/// d(A, B) = ‖A − B‖_F, geodesics are straight lines `(1 − t)·A + t·B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EuclideanMetric {
    dim: usize,
}

impl EuclideanMetric {
    /// Create the Euclidean metric on R^dim
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl AmbientMetric for EuclideanMetric {
    fn dim(&self) -> usize {
        self.dim
    }

    fn squared_distance(&self, x: &[f64], y: &[f64]) -> Result<f64> {
        self.check_dims(x, y)?;
        Ok(squared_euclidean(x, y))
    }

    fn geodesic(&self, x: &[f64], y: &[f64]) -> Result<AmbientGeodesic> {
        self.check_dims(x, y)?;
        let start = x.to_vec();
        let end = y.to_vec();

        // (1 - t) x + t y rather than x + t (y - x): both endpoints are exact
        Ok(AmbientGeodesic::new(self.dim, move |t| {
            let s = 1.0 - t;
            start
                .iter()
                .zip(end.iter())
                .map(|(&a, &b)| s * a + t * b)
                .collect()
        }))
    }
}
