//! Attributed graphs
//!
//! An [`AttributedGraph`] on n nodes is a weighted adjacency tensor of shape
//! `n × n` (scalar attributes) or `n × n × d` (vector attributes). Diagonal
//! entries hold node attributes (self-loop convention), off-diagonal entries
//! hold edge attributes. Internally both cases are stored as an `n × n × depth`
//! tensor in standard layout, with `depth = max(d, 1)`; `attribute_dim() == 0`
//! marks the scalar case.

use crate::error::{GraphSpaceError, Result};
use crate::permutation::Permutation;
use ndarray::{Array2, Array3, ArrayD, ArrayView1, ArrayView2, Axis, Ix2, Ix3};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Fixed-size weighted adjacency tensor; immutable value once built
#[derive(Debug, Clone, PartialEq)]
pub struct AttributedGraph {
    adjacency: Array3<f64>,
    attribute_dim: usize,
}

impl AttributedGraph {
    /// Build a graph with scalar attributes from an `n × n` matrix
    pub fn from_matrix(adjacency: Array2<f64>) -> Result<Self> {
        let (rows, cols) = adjacency.dim();
        if rows != cols {
            return Err(GraphSpaceError::shape(format!(
                "adjacency must be square, got {}x{}",
                rows, cols
            )));
        }
        Ok(Self {
            adjacency: standard_layout(adjacency.insert_axis(Axis(2))),
            attribute_dim: 0,
        })
    }

    /// Build a graph with `d`-dimensional attributes from an `n × n × d` tensor
    pub fn from_tensor(adjacency: Array3<f64>) -> Result<Self> {
        let (rows, cols, depth) = adjacency.dim();
        if rows != cols {
            return Err(GraphSpaceError::shape(format!(
                "adjacency must be square in its first two axes, got {}x{}x{}",
                rows, cols, depth
            )));
        }
        if depth == 0 {
            return Err(GraphSpaceError::shape("attribute depth must be at least 1"));
        }
        Ok(Self {
            adjacency: standard_layout(adjacency),
            attribute_dim: depth,
        })
    }

    /// Build from a dynamic-rank array: rank 2 is scalar, rank 3 is attributed
    pub fn from_dyn(adjacency: ArrayD<f64>) -> Result<Self> {
        match adjacency.ndim() {
            2 => {
                let matrix = adjacency
                    .into_dimensionality::<Ix2>()
                    .map_err(|e| GraphSpaceError::shape(e.to_string()))?;
                Self::from_matrix(matrix)
            }
            3 => {
                let tensor = adjacency
                    .into_dimensionality::<Ix3>()
                    .map_err(|e| GraphSpaceError::shape(e.to_string()))?;
                Self::from_tensor(tensor)
            }
            ndim => Err(GraphSpaceError::shape(format!(
                "adjacency must have rank 2 or 3, got rank {}",
                ndim
            ))),
        }
    }

    /// Build a scalar-attributed graph from nested rows
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(GraphSpaceError::shape(format!(
                "row {} has {} entries, expected {}",
                i,
                row.len(),
                n
            )));
        }
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let matrix =
            Array2::from_shape_vec((n, n), flat).map_err(|e| GraphSpaceError::shape(e.to_string()))?;
        Self::from_matrix(matrix)
    }

    /// Build a vector-attributed graph from nested rows of attribute vectors
    ///
    /// Every entry must carry the same number of attributes.
    pub fn from_nested(rows: Vec<Vec<Vec<f64>>>) -> Result<Self> {
        let n = rows.len();
        let depth = rows
            .first()
            .and_then(|row| row.first())
            .map(|entry| entry.len())
            .unwrap_or(1);

        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(GraphSpaceError::shape(format!(
                    "row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            if let Some((j, entry)) = row.iter().enumerate().find(|(_, e)| e.len() != depth) {
                return Err(GraphSpaceError::shape(format!(
                    "entry ({}, {}) has depth {}, expected {}",
                    i,
                    j,
                    entry.len(),
                    depth
                )));
            }
        }

        let flat: Vec<f64> = rows.into_iter().flatten().flatten().collect();
        let tensor = Array3::from_shape_vec((n, n, depth), flat)
            .map_err(|e| GraphSpaceError::shape(e.to_string()))?;
        Self::from_tensor(tensor)
    }

    /// Rebuild a graph from a flattened row-major adjacency
    pub fn from_flat(n_nodes: usize, attribute_dim: usize, values: Vec<f64>) -> Result<Self> {
        let depth = attribute_dim.max(1);
        let expected = n_nodes * n_nodes * depth;
        if values.len() != expected {
            return Err(GraphSpaceError::dimension_mismatch(expected, values.len()));
        }
        let adjacency = Array3::from_shape_vec((n_nodes, n_nodes, depth), values)
            .map_err(|e| GraphSpaceError::shape(e.to_string()))?;
        Ok(Self {
            adjacency,
            attribute_dim,
        })
    }

    /// Number of nodes n
    pub fn n_nodes(&self) -> usize {
        self.adjacency.dim().0
    }

    /// Attribute dimension, 0 for scalar attributes
    pub fn attribute_dim(&self) -> usize {
        self.attribute_dim
    }

    /// Length of the third storage axis, `max(attribute_dim, 1)`
    pub fn depth(&self) -> usize {
        self.adjacency.dim().2
    }

    /// True when the graph carries scalar attributes
    pub fn is_scalar(&self) -> bool {
        self.attribute_dim == 0
    }

    /// Logical shape: `[n, n]` or `[n, n, d]`
    pub fn shape(&self) -> Vec<usize> {
        let n = self.n_nodes();
        if self.is_scalar() {
            vec![n, n]
        } else {
            vec![n, n, self.attribute_dim]
        }
    }

    /// Adjacency as stored, `n × n × depth`
    pub fn adjacency(&self) -> &Array3<f64> {
        &self.adjacency
    }

    /// Adjacency matrix for scalar graphs
    pub fn as_matrix(&self) -> Option<ArrayView2<'_, f64>> {
        if self.is_scalar() {
            Some(self.attribute_slice(0))
        } else {
            None
        }
    }

    /// `n × n` slice holding attribute component `k`
    ///
    /// # Panics
    /// Panics if `k >= depth()`.
    pub fn attribute_slice(&self, k: usize) -> ArrayView2<'_, f64> {
        self.adjacency.index_axis(Axis(2), k)
    }

    /// Adjacency with its logical rank (2 for scalar, 3 otherwise)
    pub fn to_dyn(&self) -> ArrayD<f64> {
        if self.is_scalar() {
            self.attribute_slice(0).to_owned().into_dyn()
        } else {
            self.adjacency.clone().into_dyn()
        }
    }

    /// Flattened row-major adjacency, the point of the ambient space
    pub fn flat(&self) -> Cow<'_, [f64]> {
        match self.adjacency.as_slice() {
            Some(slice) => Cow::Borrowed(slice),
            None => Cow::Owned(self.adjacency.iter().copied().collect()),
        }
    }

    /// Attribute vector of node `i` (diagonal entry)
    pub fn node_attribute(&self, i: usize) -> ArrayView1<'_, f64> {
        self.adjacency.slice(ndarray::s![i, i, ..])
    }

    /// Attribute vector of edge `i → j` (off-diagonal entry)
    pub fn edge_attribute(&self, i: usize, j: usize) -> ArrayView1<'_, f64> {
        self.adjacency.slice(ndarray::s![i, j, ..])
    }

    /// Reorder rows and columns together: node `i` of the result is node
    /// `perm[i]` of `self`, i.e. `P A Pᵀ` applied to every attribute slice
    pub fn permuted(&self, perm: &Permutation) -> Result<Self> {
        let n = self.n_nodes();
        if perm.len() != n {
            return Err(GraphSpaceError::dimension_mismatch(n, perm.len()));
        }
        let idx = perm.as_slice();
        let adjacency = Array3::from_shape_fn((n, n, self.depth()), |(i, j, k)| {
            self.adjacency[[idx[i], idx[j], k]]
        });
        Ok(Self {
            adjacency,
            attribute_dim: self.attribute_dim,
        })
    }

    /// Embed into `n_nodes ≥ self.n_nodes()` nodes; new nodes are isolated
    /// and carry zero attributes
    pub fn padded(&self, n_nodes: usize) -> Result<Self> {
        let n = self.n_nodes();
        if n_nodes < n {
            return Err(GraphSpaceError::dimension_mismatch(n_nodes, n));
        }
        let mut adjacency = Array3::zeros((n_nodes, n_nodes, self.depth()));
        adjacency
            .slice_mut(ndarray::s![..n, ..n, ..])
            .assign(&self.adjacency);
        Ok(Self {
            adjacency,
            attribute_dim: self.attribute_dim,
        })
    }

    /// Project onto a labelled directed multigraph view for export and plotting
    ///
    /// Diagonal entries become node attributes; every off-diagonal entry with
    /// a non-zero component becomes an edge `i → j` carrying that entry.
    pub fn to_labelled_graph(&self) -> LabelledGraph {
        let n = self.n_nodes();
        let nodes = (0..n)
            .map(|i| LabelledNode {
                id: i,
                attribute: self.node_attribute(i).to_vec(),
            })
            .collect();

        let mut edges = Vec::new();
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let attribute = self.edge_attribute(i, j);
                if attribute.iter().any(|&v| v != 0.0) {
                    edges.push(LabelledEdge {
                        source: i,
                        target: j,
                        attribute: attribute.to_vec(),
                    });
                }
            }
        }

        LabelledGraph { nodes, edges }
    }
}

fn standard_layout(adjacency: Array3<f64>) -> Array3<f64> {
    if adjacency.is_standard_layout() {
        adjacency
    } else {
        adjacency.as_standard_layout().into_owned()
    }
}

/// Labelled directed multigraph view of an [`AttributedGraph`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelledGraph {
    /// One entry per node, in node order
    pub nodes: Vec<LabelledNode>,
    /// Non-zero off-diagonal entries, row-major order
    pub edges: Vec<LabelledEdge>,
}

/// Node of a [`LabelledGraph`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelledNode {
    /// Node index in the adjacency
    pub id: usize,
    /// Diagonal attribute vector
    pub attribute: Vec<f64>,
}

/// Directed edge of a [`LabelledGraph`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelledEdge {
    /// Source node
    pub source: usize,
    /// Target node
    pub target: usize,
    /// Off-diagonal attribute vector
    pub attribute: Vec<f64>,
}

impl LabelledEdge {
    /// First attribute component, the weight for scalar graphs
    pub fn weight(&self) -> f64 {
        self.attribute.first().copied().unwrap_or(0.0)
    }
}

impl LabelledGraph {
    /// Number of nodes
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array};

    #[test]
    fn test_from_matrix_rejects_non_square() {
        let adj = Array2::<f64>::zeros((2, 3));
        assert!(matches!(
            AttributedGraph::from_matrix(adj),
            Err(GraphSpaceError::Shape { .. })
        ));
    }

    #[test]
    fn test_from_nested_rejects_ragged_depth() {
        let rows = vec![
            vec![vec![1.0, 2.0], vec![0.0, 0.0]],
            vec![vec![0.0], vec![3.0, 4.0]],
        ];
        assert!(matches!(
            AttributedGraph::from_nested(rows),
            Err(GraphSpaceError::Shape { .. })
        ));
    }

    #[test]
    fn test_from_dyn_rank() {
        let rank1 = Array::<f64, _>::zeros(4).into_dyn();
        assert!(AttributedGraph::from_dyn(rank1).is_err());

        let rank3 = Array3::<f64>::zeros((2, 2, 3)).into_dyn();
        let g = AttributedGraph::from_dyn(rank3).unwrap();
        assert_eq!(g.shape(), vec![2, 2, 3]);
    }

    #[test]
    fn test_permuted_matches_matrix_product() {
        let g = AttributedGraph::from_matrix(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]])
            .unwrap();
        let perm = Permutation::try_from_vec(vec![2, 0, 1]).unwrap();
        let p = perm.to_matrix();
        let expected = p.dot(&g.as_matrix().unwrap()).dot(&p.t());

        let permuted = g.permuted(&perm).unwrap();
        assert_eq!(permuted.as_matrix().unwrap(), expected.view());
        // input untouched
        assert_eq!(g.as_matrix().unwrap()[[0, 0]], 1.0);
    }

    #[test]
    fn test_padded() {
        let g = AttributedGraph::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let padded = g.padded(3).unwrap();
        assert_eq!(padded.n_nodes(), 3);
        assert_eq!(padded.as_matrix().unwrap()[[1, 0]], 3.0);
        assert_eq!(padded.as_matrix().unwrap()[[2, 2]], 0.0);
        assert!(g.padded(1).is_err());
    }

    #[test]
    fn test_labelled_graph() {
        let g = AttributedGraph::from_rows(vec![
            vec![1.0, 0.5, 0.0],
            vec![0.0, 2.0, 0.0],
            vec![0.0, 0.0, 3.0],
        ])
        .unwrap();
        let view = g.to_labelled_graph();
        assert_eq!(view.num_nodes(), 3);
        assert_eq!(view.num_edges(), 1);
        assert_eq!(view.edges[0].source, 0);
        assert_eq!(view.edges[0].target, 1);
        assert_eq!(view.edges[0].weight(), 0.5);
        assert_eq!(view.nodes[2].attribute, vec![3.0]);
    }

    #[test]
    fn test_flat_round_trip() {
        let g = AttributedGraph::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(&*g.flat(), &[1.0, 2.0, 3.0, 4.0]);
        let back = AttributedGraph::from_flat(2, 0, g.flat().into_owned()).unwrap();
        assert_eq!(back, g);
    }
}
