//! Pure decision functions over the grant store snapshot.

use std::sync::Arc;

use portaria_core::SCREEN_ACCESS_CODE;
use portaria_store::{GrantStore, Storage};

/// Decision functions over the current grant set.
///
/// The engine holds a handle to the store and evaluates each query
/// against the snapshot current at call time; a grant-set replace is
/// picked up by the next call. All functions are total.
pub struct AuthzEngine<S: Storage> {
    store: Arc<GrantStore<S>>,
}

impl<S: Storage> Clone for AuthzEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Storage> AuthzEngine<S> {
    /// Create an engine over the given store.
    pub fn new(store: Arc<GrantStore<S>>) -> Self {
        Self { store }
    }

    /// The underlying store handle.
    pub fn store(&self) -> &Arc<GrantStore<S>> {
        &self.store
    }

    /// Whether an active grant exists for `code`.
    ///
    /// When `screen_id` is supplied the grant must be scoped to that
    /// screen; when omitted, a match on code alone is sufficient.
    /// Iteration is in insertion order and the first qualifying match
    /// short-circuits, which only matters when duplicate contradictory
    /// grants exist.
    pub fn has(&self, code: &str, screen_id: Option<i64>) -> bool {
        self.store
            .with_grants(|grants| grants.iter().any(|g| g.matches(code, screen_id)))
    }

    /// Display name of the first matching grant, if any.
    pub fn display_name(&self, code: &str, screen_id: Option<i64>) -> Option<String> {
        self.store.with_grants(|grants| {
            grants
                .iter()
                .find(|g| g.matches(code, screen_id))
                .and_then(|g| g.display_name.clone())
        })
    }

    /// Whether the actor may open the given screen.
    ///
    /// Sugar for `has(SCREEN_ACCESS_CODE, Some(screen_id))`; screen
    /// access is just the reserved permission code scoped per screen.
    pub fn can_access_screen(&self, screen_id: i64) -> bool {
        self.has(SCREEN_ACCESS_CODE, Some(screen_id))
    }

    /// Whether the actor may open the screen known by `code`.
    ///
    /// Resolves the code through the screen map; an unknown code is a
    /// plain negative decision.
    pub fn can_access_screen_by_code(&self, code: &str) -> bool {
        match self.store.resolve_screen_id(code) {
            Some(screen_id) => self.can_access_screen(screen_id),
            None => false,
        }
    }
}
