//! Linear Assignment
//!
//! Minimum-weight perfect bipartite matching on a square cost matrix:
//!
//! min_{σ ∈ S_n} Σᵢ C[i, σ(i)]
//!
//! The FAQ matcher uses it twice: once per iteration to find the
//! Frank-Wolfe direction, and once at the end to round the doubly-stochastic
//! solution to the nearest permutation.

use crate::error::{GraphSpaceError, Result};
use crate::permutation::Permutation;
use crate::utils::all_finite;
use ndarray::ArrayView2;
use std::fmt::Debug;
use std::sync::Arc;

/// Solver for square linear assignment problems
pub trait LinearAssignment: Debug + Send + Sync {
    /// Return σ minimizing `Σᵢ cost[i, σ(i)]`
    fn solve(&self, cost: ArrayView2<'_, f64>) -> Result<Permutation>;
}

/// Type-erased solver shared between matchers
pub type SharedAssignment = Arc<dyn LinearAssignment>;

impl<T: LinearAssignment + ?Sized> LinearAssignment for Arc<T> {
    fn solve(&self, cost: ArrayView2<'_, f64>) -> Result<Permutation> {
        (**self).solve(cost)
    }
}

/// Hungarian algorithm (shortest augmenting paths with dual potentials)
///
/// O(n³) time, O(n) extra memory besides the cost matrix. Exact for finite
/// costs.
#[derive(Debug, Clone, Copy, Default)]
pub struct HungarianSolver;

impl HungarianSolver {
    /// Create a new solver
    pub fn new() -> Self {
        Self
    }
}

impl LinearAssignment for HungarianSolver {
    fn solve(&self, cost: ArrayView2<'_, f64>) -> Result<Permutation> {
        let (rows, cols) = cost.dim();
        if rows != cols {
            return Err(GraphSpaceError::shape(format!(
                "assignment cost matrix must be square, got {}x{}",
                rows, cols
            )));
        }
        if !all_finite(cost.iter()) {
            return Err(GraphSpaceError::numerical_instability(
                "assignment cost matrix has non-finite entries",
            ));
        }

        let n = rows;
        // 1-based arrays; index 0 is the virtual source column
        let mut u = vec![0.0f64; n + 1];
        let mut v = vec![0.0f64; n + 1];
        let mut row_of_col = vec![0usize; n + 1];
        let mut way = vec![0usize; n + 1];

        for i in 1..=n {
            row_of_col[0] = i;
            let mut j0 = 0usize;
            let mut min_slack = vec![f64::INFINITY; n + 1];
            let mut used = vec![false; n + 1];

            loop {
                used[j0] = true;
                let i0 = row_of_col[j0];
                let mut delta = f64::INFINITY;
                let mut j1 = 0usize;

                for j in 1..=n {
                    if used[j] {
                        continue;
                    }
                    let reduced = cost[[i0 - 1, j - 1]] - u[i0] - v[j];
                    if reduced < min_slack[j] {
                        min_slack[j] = reduced;
                        way[j] = j0;
                    }
                    if min_slack[j] < delta {
                        delta = min_slack[j];
                        j1 = j;
                    }
                }

                for j in 0..=n {
                    if used[j] {
                        u[row_of_col[j]] += delta;
                        v[j] -= delta;
                    } else {
                        min_slack[j] -= delta;
                    }
                }

                j0 = j1;
                if row_of_col[j0] == 0 {
                    break;
                }
            }

            // Augment along the alternating path
            loop {
                let j1 = way[j0];
                row_of_col[j0] = row_of_col[j1];
                j0 = j1;
                if j0 == 0 {
                    break;
                }
            }
        }

        let mut assignment = vec![0usize; n];
        for j in 1..=n {
            assignment[row_of_col[j] - 1] = j - 1;
        }

        Ok(Permutation::from_vec_unchecked(assignment))
    }
}

/// Total cost `Σᵢ cost[i, σ(i)]` of an assignment
pub fn assignment_cost(cost: ArrayView2<'_, f64>, assignment: &Permutation) -> f64 {
    assignment
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, &j)| cost[[i, j]])
        .sum()
}
