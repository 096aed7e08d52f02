//! The Portaria kernel: unified API over store, engine, and caches.
//!
//! One instance per process, constructed at startup and injected
//! wherever needed. The embedding application hands the login payload
//! over once per session; everything downstream reads the store
//! through the engine.

use std::path::Path;
use std::sync::Arc;

use portaria_authz::{AuthzEngine, ElementGate, GateMode, RouteGuard, RouteRules};
use portaria_cache::{KeyedResourceCache, ResourceCache};
use portaria_core::{Grant, ScreenMap};
use portaria_store::{GrantStore, SqliteStorage, Storage};

use crate::error::Result;

/// Configuration for the kernel.
#[derive(Debug, Clone, Default)]
pub struct PortariaConfig {
    /// Cache behavior for reference-data caches built by
    /// [`Portaria::resource_cache`] and [`Portaria::keyed_cache`].
    pub cache: portaria_cache::CacheConfig,
}

/// The main kernel struct.
///
/// Provides a unified API for:
/// - Bootstrapping the grant store from the login payload
/// - Authorization decisions (engine, guards, gates)
/// - Constructing reference-data caches
pub struct Portaria<S: Storage> {
    store: Arc<GrantStore<S>>,
    config: PortariaConfig,
}

impl Portaria<SqliteStorage> {
    /// Open a kernel backed by a SQLite database at the given path.
    pub fn open(path: impl AsRef<Path>, config: PortariaConfig) -> Result<Self> {
        let storage = SqliteStorage::open(path)?;
        Ok(Self::new(storage, config))
    }
}

impl<S: Storage> Portaria<S> {
    /// Create a kernel on the given storage backend.
    ///
    /// The store starts empty; call [`load`](Self::load) to rehydrate
    /// a previous session's grants from storage.
    pub fn new(storage: S, config: PortariaConfig) -> Self {
        Self {
            store: Arc::new(GrantStore::new(storage)),
            config,
        }
    }

    /// The grant store.
    pub fn store(&self) -> &Arc<GrantStore<S>> {
        &self.store
    }

    /// The kernel's configuration.
    pub fn config(&self) -> &PortariaConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session bootstrap
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply the payload handed over by the login flow.
    ///
    /// Tolerant by design: a missing or non-array `permissions` half
    /// coerces to an empty grant list, a missing or non-object
    /// `screens` half to an empty screen map. Malformed entries inside
    /// an otherwise well-formed half are dropped, never fatal.
    pub fn apply_login_payload(&self, payload: &serde_json::Value) {
        let grants = payload
            .get("permissions")
            .map(grants_from_value)
            .unwrap_or_default();
        let screens = payload
            .get("screens")
            .map(screens_from_value)
            .unwrap_or_default();

        tracing::debug!(
            grants = grants.len(),
            screens = screens.len(),
            "session payload applied"
        );
        self.store.set_permissions(grants);
        self.store.set_screen_map(screens);
    }

    /// Rehydrate the store from persistent storage. Best-effort.
    pub fn load(&self) {
        self.store.load();
    }

    /// Reset the store to empty, persisting the empty state. Called by
    /// logout flows.
    pub fn clear_session(&self) {
        self.store.clear();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    /// A decision engine over the store.
    pub fn engine(&self) -> AuthzEngine<S> {
        AuthzEngine::new(Arc::clone(&self.store))
    }

    /// A route guard with the given rules.
    pub fn guard(&self, rules: RouteRules) -> RouteGuard<S> {
        RouteGuard::new(self.engine(), rules)
    }

    /// An element gate for a permission code, in the default hide mode.
    pub fn gate(&self, code: impl Into<String>, screen_id: Option<i64>) -> ElementGate<S> {
        ElementGate::new(self.engine(), code, screen_id)
    }

    /// An element gate that disables instead of hiding.
    pub fn disabling_gate(
        &self,
        code: impl Into<String>,
        screen_id: Option<i64>,
    ) -> ElementGate<S> {
        self.gate(code, screen_id).with_mode(GateMode::Disable)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reference-data caches
    // ─────────────────────────────────────────────────────────────────────────

    /// A root-collection cache using this kernel's cache config.
    pub fn resource_cache<V: Clone + Send + 'static>(&self) -> ResourceCache<V> {
        ResourceCache::new(self.config.cache.clone())
    }

    /// A keyed sub-resource cache using this kernel's cache config.
    pub fn keyed_cache<K, V>(&self) -> KeyedResourceCache<K, V>
    where
        K: Eq + std::hash::Hash + Clone + Send + Sync,
        V: Clone + Send + 'static,
    {
        KeyedResourceCache::new(self.config.cache.clone())
    }
}

/// Coerce a payload half to a grant list; non-arrays become empty.
fn grants_from_value(value: &serde_json::Value) -> Vec<Grant> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter(|item| item.is_object())
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Coerce a payload half to a screen map; non-objects become empty.
fn screens_from_value(value: &serde_json::Value) -> ScreenMap {
    value
        .as_object()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|(code, id)| id.as_i64().map(|id| (code.clone(), id)))
                .collect()
        })
        .unwrap_or_default()
}
