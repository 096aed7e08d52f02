//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use portaria_core::{Actor, Grant, ScreenMap, SessionState, GENERIC_USER_ROLE, SCREEN_ACCESS_CODE};
use portaria_store::{GrantStore, MemoryStorage};

/// A test fixture with a memory-backed grant store.
///
/// The storage handle is kept separately so tests can inspect or
/// corrupt the persisted payloads directly.
pub struct TestFixture {
    pub storage: Arc<MemoryStorage>,
    pub store: GrantStore<Arc<MemoryStorage>>,
}

impl TestFixture {
    /// Create a new fixture with empty storage.
    pub fn new() -> Self {
        let storage = Arc::new(MemoryStorage::new());
        Self {
            store: GrantStore::new(Arc::clone(&storage)),
            storage,
        }
    }

    /// Create a second store over the same storage, as a fresh process
    /// would see it.
    pub fn reopen(&self) -> GrantStore<Arc<MemoryStorage>> {
        GrantStore::new(Arc::clone(&self.storage))
    }

    /// Replace the store's grants with screen-access grants for the
    /// given screens.
    pub fn seed_screen_access(&self, screen_ids: &[i64]) {
        self.store.set_permissions(
            screen_ids
                .iter()
                .map(|&id| Grant::new(id, SCREEN_ACCESS_CODE))
                .collect(),
        );
    }

    /// Replace the store's screen map.
    pub fn seed_screens<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (&'static str, i64)>,
    {
        self.store.set_screen_map(ScreenMap::from_iter(
            entries.into_iter().map(|(code, id)| (code.to_string(), id)),
        ));
    }

    /// An authenticated session for a generic user.
    pub fn user_session(&self, department: Option<&str>) -> SessionState {
        SessionState::authenticated(Actor {
            id: "u-test".into(),
            role: GENERIC_USER_ROLE.into(),
            department: department.map(String::from),
        })
    }

    /// An authenticated session for an arbitrary role.
    pub fn role_session(&self, role: &str) -> SessionState {
        SessionState::authenticated(Actor {
            id: "u-test".into(),
            role: role.into(),
            department: None,
        })
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
