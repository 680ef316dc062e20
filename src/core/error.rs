//! Error taxonomy for the attendance core
//!
//! Policy rejections (unknown student, wrong subnet, biometric mismatch, ...)
//! are *not* errors: they are ordinary [`VerificationOutcome`] values.
//! Errors are reserved for malformed input and for backing-store failures.
//!
//! [`VerificationOutcome`]: crate::core::models::VerificationOutcome

use thiserror::Error;

/// Structural problems with an embedding payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidEmbedding {
    /// Vector length differs from the configured dimension
    #[error("embedding dimension must be {expected}, got {actual}")]
    WrongDimension {
        /// Configured dimension
        expected: usize,
        /// Length of the supplied vector
        actual: usize,
    },

    /// A component is NaN or infinite
    #[error("embedding contains a NaN or infinite value at component {index}")]
    NonFinite {
        /// Zero-based component index
        index: usize,
    },

    /// A registration batch has the wrong number of vectors
    #[error("must provide exactly {expected} embeddings, got {actual}")]
    WrongCount {
        /// Configured reference count
        expected: usize,
        /// Number of vectors supplied
        actual: usize,
    },

    /// A vector inside a batch is invalid
    #[error("embedding {index}: {source}")]
    InBatch {
        /// One-based position of the offending vector
        index: usize,
        /// What was wrong with it
        source: Box<InvalidEmbedding>,
    },
}

/// Malformed request input, rejected before any store access
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Student key does not match the configured format
    #[error("invalid student key format: {0}")]
    InvalidKey(String),

    /// Embedding payload is malformed
    #[error(transparent)]
    Embedding(#[from] InvalidEmbedding),
}

/// Failure of a backing store
///
/// The only retryable error category. Never reported as a policy outcome.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or is in an unusable state
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Another writer held the store past the lock timeout
    #[error("store contended: {0}")]
    Conflict(String),

    /// Underlying I/O failure
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted data could not be decoded
    #[error("store data is corrupt: {0}")]
    Corrupt(String),

    /// Data could not be encoded for persistence
    #[error("failed to serialize store data: {0}")]
    Serialize(String),
}

/// Error returned by the exposed `verify` and `register` operations
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Malformed input
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Backing store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl VerifyError {
    /// Whether the caller may retry the request unchanged
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

impl From<InvalidEmbedding> for VerifyError {
    fn from(err: InvalidEmbedding) -> Self {
        Self::Validation(ValidationError::Embedding(err))
    }
}
