//! Error types for the core data model.

use thiserror::Error;

/// Errors that can occur while decoding persisted payloads.
///
/// These are internal results. Callers at the storage boundary collapse
/// them to the safe fallback (keep prior state) and never surface them.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Payload is not valid JSON.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Payload parsed but has the wrong shape (not an array / not an object).
    #[error("unexpected payload shape: expected {expected}")]
    UnexpectedShape {
        /// The shape the decoder required.
        expected: &'static str,
    },
}

/// Result type for core decoding operations.
pub type Result<T> = std::result::Result<T, CoreError>;
