//! Error types for the cache module.

use thiserror::Error;

/// An opaque fetch failure reported by the injected network boundary.
///
/// Cloneable so a single failed fetch can be handed to every caller
/// that joined it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct FetchError(pub String);

impl FetchError {
    /// Create a fetch error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors that can occur during cache operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The underlying fetch failed. The slot is cleared, so a
    /// subsequent call issues a fresh fetch.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// A debounced request was superseded by a newer key before its
    /// quiet window elapsed.
    #[error("superseded by a newer request")]
    Superseded,

    /// The in-flight fetch this caller joined was abandoned before it
    /// produced a result.
    #[error("in-flight fetch abandoned")]
    Abandoned,
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
