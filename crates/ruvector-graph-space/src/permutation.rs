//! Node permutations
//!
//! A [`Permutation`] of length n is a bijection of `{0, .., n-1}` stored as the
//! sequence `perm[i]`. Applied to an adjacency tensor it reorders rows and
//! columns together: node `i` of the result is node `perm[i]` of the input,
//! which is exactly `P A Pᵀ` for the matrix with `P[i][perm[i]] = 1`.

use crate::error::{GraphSpaceError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Bijection of `0..n`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Permutation(Vec<usize>);

impl Permutation {
    /// Identity permutation of length n
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// Validate and wrap an index sequence
    pub fn try_from_vec(indices: Vec<usize>) -> Result<Self> {
        let n = indices.len();
        let mut seen = vec![false; n];
        for &i in &indices {
            if i >= n {
                return Err(GraphSpaceError::invalid_permutation(format!(
                    "index {} out of range for length {}",
                    i, n
                )));
            }
            if seen[i] {
                return Err(GraphSpaceError::invalid_permutation(format!(
                    "index {} appears more than once",
                    i
                )));
            }
            seen[i] = true;
        }
        Ok(Self(indices))
    }

    /// Wrap a sequence already known to be a bijection
    pub(crate) fn from_vec_unchecked(indices: Vec<usize>) -> Self {
        debug_assert!(Self::try_from_vec(indices.clone()).is_ok());
        Self(indices)
    }

    /// Number of nodes permuted
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the empty permutation
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index sequence
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Consume into the index sequence
    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }

    /// True when `perm[i] == i` for all i
    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &p)| i == p)
    }

    /// Inverse permutation
    pub fn inverse(&self) -> Self {
        let mut inv = vec![0; self.0.len()];
        for (i, &p) in self.0.iter().enumerate() {
            inv[p] = i;
        }
        Self(inv)
    }

    /// Composition `self ∘ other`, i.e. `result[i] = other[self[i]]`
    ///
    /// Permuting a graph by `other` and then by `self` equals permuting it
    /// once by the composition.
    pub fn compose(&self, other: &Permutation) -> Result<Self> {
        if self.len() != other.len() {
            return Err(GraphSpaceError::dimension_mismatch(self.len(), other.len()));
        }
        Ok(Self(self.0.iter().map(|&i| other.0[i]).collect()))
    }

    /// Permutation matrix with `P[i][perm[i]] = 1`
    pub fn to_matrix(&self) -> Array2<f64> {
        let n = self.0.len();
        let mut matrix = Array2::zeros((n, n));
        for (i, &p) in self.0.iter().enumerate() {
            matrix[[i, p]] = 1.0;
        }
        matrix
    }
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = GraphSpaceError;

    fn try_from(indices: Vec<usize>) -> Result<Self> {
        Self::try_from_vec(indices)
    }
}

impl From<Permutation> for Vec<usize> {
    fn from(perm: Permutation) -> Self {
        perm.0
    }
}

impl std::ops::Index<usize> for Permutation {
    type Output = usize;

    fn index(&self, i: usize) -> &usize {
        &self.0[i]
    }
}

/// Iterate over all `n!` permutations of `0..n` in lexicographic order
pub fn all_permutations(n: usize) -> AllPermutations {
    AllPermutations {
        current: Some((0..n).collect()),
    }
}

/// Lexicographic permutation iterator, see [`all_permutations`]
#[derive(Debug, Clone)]
pub struct AllPermutations {
    current: Option<Vec<usize>>,
}

impl Iterator for AllPermutations {
    type Item = Permutation;

    fn next(&mut self) -> Option<Permutation> {
        let current = self.current.take()?;
        let mut next = current.clone();

        // Narayana's next-permutation step
        let n = next.len();
        let mut i = n;
        while i > 1 && next[i - 2] >= next[i - 1] {
            i -= 1;
        }
        if i > 1 {
            let pivot = i - 2;
            let mut j = n - 1;
            while next[j] <= next[pivot] {
                j -= 1;
            }
            next.swap(pivot, j);
            next[pivot + 1..].reverse();
            self.current = Some(next);
        }

        Some(Permutation(current))
    }
}
