//! Error handling for the crypto layer.

use thiserror::Error;

/// Errors produced by providers, handles and streaming sinks.
///
/// The type is `Clone` because a single failure (a lost backend, an abort)
/// settles every observer of a shared resolution or settlement future.
#[derive(Debug, Clone, Error)]
pub enum CryptoError {
    /// The requested algorithm is not in the supported set.
    #[error("invalid algorithm {requested:?}; available algorithms are [ {available} ]")]
    UnsupportedAlgorithm {
        /// The name the caller asked for.
        requested: String,
        /// The names that would have been accepted.
        available: &'static str,
    },

    /// Signing key material failed validation.
    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    /// A text chunk could not be converted to bytes.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// No backend could be identified during provider resolution.
    #[error("no crypto backend available: {0}")]
    NoBackend(String),

    /// The operation was aborted before it settled.
    #[error("operation aborted: {0}")]
    Aborted(String),

    /// Unexpected internal fault.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CryptoError {
    /// Create an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create an abort error from a caller-supplied reason.
    #[must_use]
    pub fn aborted(reason: impl Into<String>) -> Self {
        Self::Aborted(reason.into())
    }
}

/// Result type for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
