//! Error types for the facade crate.

use thiserror::Error;

/// Errors surfaced by the facade.
///
/// Decision paths never error; only storage setup can.
#[derive(Debug, Error)]
pub enum PortariaError {
    /// Storage backend error.
    #[error("store error: {0}")]
    Store(#[from] portaria_store::StoreError),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, PortariaError>;
