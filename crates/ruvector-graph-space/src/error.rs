//! Error types for ruvector-graph-space

use thiserror::Error;

/// Result type alias for graph space operations
pub type Result<T> = std::result::Result<T, GraphSpaceError>;

/// Errors that can occur when building graphs, spaces and quotient distances
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphSpaceError {
    /// Adjacency tensor has the wrong rank or is not square
    #[error("Shape error: {context}")]
    Shape {
        /// Description of the offending shape
        context: String,
    },

    /// Invalid space configuration
    #[error("Invalid configuration '{name}': {reason}")]
    Config {
        /// Configuration field
        name: String,
        /// Reason why it's invalid
        reason: String,
    },

    /// Two graphs (or a graph and a permutation) disagree on node count
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected size
        expected: usize,
        /// Actual size received
        got: usize,
    },

    /// Batched call received sequences of different lengths
    #[error("Length mismatch: left batch has {left} graphs, right batch has {right}")]
    LengthMismatch {
        /// Length of the first sequence
        left: usize,
        /// Length of the second sequence
        right: usize,
    },

    /// Sequence is not a bijection of 0..n
    #[error("Invalid permutation: {reason}")]
    InvalidPermutation {
        /// What is wrong with the sequence
        reason: String,
    },

    /// Invalid solver or sampling parameter
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Reason why it's invalid
        reason: String,
    },

    /// Non-finite values reached a numerical routine
    #[error("Numerical instability: {message}")]
    NumericalInstability {
        /// Description of the instability
        message: String,
    },
}

impl GraphSpaceError {
    /// Create a shape error
    pub fn shape(context: impl Into<String>) -> Self {
        Self::Shape {
            context: context.into(),
        }
    }

    /// Create a configuration error
    pub fn config(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch(expected: usize, got: usize) -> Self {
        Self::DimensionMismatch { expected, got }
    }

    /// Create a length mismatch error
    pub fn length_mismatch(left: usize, right: usize) -> Self {
        Self::LengthMismatch { left, right }
    }

    /// Create an invalid permutation error
    pub fn invalid_permutation(reason: impl Into<String>) -> Self {
        Self::InvalidPermutation {
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a numerical instability error
    pub fn numerical_instability(message: impl Into<String>) -> Self {
        Self::NumericalInstability {
            message: message.into(),
        }
    }
}
