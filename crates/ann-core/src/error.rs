use thiserror::Error;

use crate::ids::VectorId;

/// Canonical error type for the vector store and HNSW index.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A constructor or call-site argument violates a precondition
    /// (zero dimension, non-positive `M`/`k`/`ef_search`, `ef_construction < M`,
    /// a non-finite vector component).
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Human-readable explanation of the violated precondition.
        message: String,
    },

    /// A vector's length does not match the store's fixed dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension the store was constructed with.
        expected: usize,
        /// Length of the vector that was supplied.
        actual: usize,
    },

    /// An id was inserted that already exists in the store (or index).
    #[error("vector `{id}` already exists")]
    DuplicateId {
        /// The colliding identifier.
        id: VectorId,
    },

    /// An id was looked up that is absent from the store (or index).
    #[error("vector `{id}` was not found")]
    NotFound {
        /// The missing identifier.
        id: VectorId,
    },

    /// A distance computation was attempted against a vector whose
    /// magnitude is below the `1e-6` threshold, making cosine distance
    /// undefined.
    #[error("vector magnitude is too close to zero for cosine distance")]
    ZeroMagnitude,
}

impl CoreError {
    /// Creates an `InvalidArgument` variant.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Convenient result alias for store and index operations.
pub type CoreResult<T> = Result<T, CoreError>;
