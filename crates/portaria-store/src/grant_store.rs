//! The grant store: live authorization state with best-effort durability.
//!
//! Holds the session's [`GrantSet`] behind an RwLock, mirrors every
//! replace to the storage backend, and notifies listeners. Mutation is
//! synchronous end-to-end (replace → persist attempt → notify) so a
//! reader can never observe a half-applied grant set.

use std::sync::{Mutex, RwLock, RwLockReadGuard};

use portaria_core::{decode_grants, decode_screen_map, Grant, GrantSet, ScreenMap};

use crate::observer::{notify_all, Listener, ListenerId, ListenerRegistry};
use crate::storage::{keys, Storage};

/// In-memory grant state mirrored to persistent storage.
///
/// Storage writes are fire-and-forget: a failed write is logged and
/// swallowed, leaving the in-memory state correct but not durable.
/// The worst outcome of any failure here is a deny-by-default decision
/// after the next rehydration.
pub struct GrantStore<S: Storage> {
    state: RwLock<GrantSet>,
    storage: S,
    listeners: Mutex<ListenerRegistry>,
}

impl<S: Storage> GrantStore<S> {
    /// Create an empty store on the given storage backend.
    ///
    /// The store starts empty; call [`load`](Self::load) to rehydrate
    /// from storage explicitly.
    pub fn new(storage: S) -> Self {
        Self {
            state: RwLock::new(GrantSet::new()),
            storage,
            listeners: Mutex::new(ListenerRegistry::new()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the grant list wholesale.
    ///
    /// Persists the new list best-effort and notifies listeners
    /// synchronously after the replace.
    pub fn set_permissions(&self, grants: Vec<Grant>) {
        {
            let mut state = write_lock(&self.state);
            state.grants = grants;
            self.persist_grants(&state.grants);
        }
        self.notify();
    }

    /// Replace the screen map wholesale. Same persistence and
    /// notification contract as [`set_permissions`](Self::set_permissions).
    pub fn set_screen_map(&self, screens: ScreenMap) {
        {
            let mut state = write_lock(&self.state);
            state.screens = screens;
            self.persist_screens(&state.screens);
        }
        self.notify();
    }

    /// Reset both halves to empty and persist the empty state.
    ///
    /// Used by logout flows so a later rehydration cannot resurrect the
    /// previous session's grants.
    pub fn clear(&self) {
        {
            let mut state = write_lock(&self.state);
            *state = GrantSet::new();
            self.persist_grants(&state.grants);
            self.persist_screens(&state.screens);
        }
        self.notify();
    }

    /// Rehydrate from persistent storage.
    ///
    /// Best-effort: a missing or malformed payload leaves the
    /// corresponding half of the in-memory state untouched, and the
    /// two halves load independently. Never errors outward.
    pub fn load(&self) {
        let grants = match self.storage.get(keys::GRANTS) {
            Ok(Some(payload)) => match decode_grants(&payload) {
                Ok(grants) => Some(grants),
                Err(e) => {
                    tracing::debug!(error = %e, "discarding stored grant payload");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::debug!(error = %e, "grant storage read failed");
                None
            }
        };

        let screens = match self.storage.get(keys::SCREENS) {
            Ok(Some(payload)) => match decode_screen_map(&payload) {
                Ok(screens) => Some(screens),
                Err(e) => {
                    tracing::debug!(error = %e, "discarding stored screen map payload");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::debug!(error = %e, "screen map storage read failed");
                None
            }
        };

        if grants.is_some() || screens.is_some() {
            let mut state = write_lock(&self.state);
            if let Some(grants) = grants {
                state.grants = grants;
            }
            if let Some(screens) = screens {
                state.screens = screens;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Snapshot of the current grant list, in payload order.
    pub fn grants(&self) -> Vec<Grant> {
        read_lock(&self.state).grants.clone()
    }

    /// Snapshot of the full grant set.
    pub fn snapshot(&self) -> GrantSet {
        read_lock(&self.state).clone()
    }

    /// Resolve a screen code to its numeric id.
    pub fn resolve_screen_id(&self, code: &str) -> Option<i64> {
        read_lock(&self.state).screens.resolve(code)
    }

    /// Run a closure against the live grant list without cloning it.
    ///
    /// The read lock is held for the duration of the closure; keep it
    /// short. Decision functions use this for their linear scan.
    pub fn with_grants<T>(&self, f: impl FnOnce(&[Grant]) -> T) -> T {
        f(&read_lock(&self.state).grants)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Change notification
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a change callback, invoked synchronously after every
    /// successful mutation.
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> ListenerId {
        lock_listeners(&self.listeners, |reg| reg.subscribe(listener))
    }

    /// Unregister a change callback. Unknown handles are ignored.
    pub fn unsubscribe(&self, id: ListenerId) {
        lock_listeners(&self.listeners, |reg| reg.unsubscribe(id));
    }

    fn notify(&self) {
        let snapshot: Vec<Listener> = lock_listeners(&self.listeners, |reg| reg.snapshot());
        notify_all(&snapshot);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence (best-effort)
    // ─────────────────────────────────────────────────────────────────────────

    fn persist_grants(&self, grants: &[Grant]) {
        match serde_json::to_string(grants) {
            Ok(payload) => {
                if let Err(e) = self.storage.put(keys::GRANTS, &payload) {
                    tracing::warn!(error = %e, "grant persistence failed; state kept in memory");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "grant serialization failed; state kept in memory");
            }
        }
    }

    fn persist_screens(&self, screens: &ScreenMap) {
        match serde_json::to_string(screens) {
            Ok(payload) => {
                if let Err(e) = self.storage.put(keys::SCREENS, &payload) {
                    tracing::warn!(error = %e, "screen map persistence failed; state kept in memory");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "screen map serialization failed; state kept in memory");
            }
        }
    }
}

// Lock helpers. A poisoned lock still holds a consistent snapshot: the
// write sections only assign already-constructed values, so recovering
// the inner data is safe and keeps every read/write path total.

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn lock_listeners<T>(lock: &Mutex<ListenerRegistry>, f: impl FnOnce(&mut ListenerRegistry) -> T) -> T {
    let mut guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut guard)
}
