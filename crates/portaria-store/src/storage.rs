//! Storage trait: the abstract interface for grant persistence.
//!
//! This trait keeps the grant store storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests). The interface is
//! deliberately a plain string key/value store: the persisted layout is
//! two JSON payloads under two fixed keys, nothing more.
//!
//! The trait is synchronous. Grant-store mutation runs synchronously
//! end-to-end (replace, persist attempt, notify); an async persistence
//! seam would introduce a suspension point the state machine must not
//! have.

use crate::error::Result;

/// The fixed keys under which the grant set is persisted.
///
/// There is no versioning field; a reader that finds a payload of the
/// wrong shape under either key discards it silently.
pub mod keys {
    /// JSON-serialized grant array.
    pub const GRANTS: &str = "portaria/grants";
    /// JSON-serialized screen-code → id map.
    pub const SCREENS: &str = "portaria/screens";
}

/// Key/value persistence for serialized grant state.
///
/// # Design Notes
///
/// - **Best-effort contract**: callers treat every error as "not
///   durable this time" and keep going; implementations should still
///   report failures truthfully so they can be logged.
/// - **Last write wins**: `put` replaces any previous value.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`. Removing an absent key is
    /// not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
