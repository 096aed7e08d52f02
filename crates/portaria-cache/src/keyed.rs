//! Keyed sub-resource cache with debounced fetch.
//!
//! Per-key slots share the semantics of the root cache (TTL, in-flight
//! joining, failure clears). On top of that, `get_debounced` collapses
//! a burst of keyed requests into one fetch for the last requested key.
//! The debounce is cache-wide on purpose: a new request cancels any
//! pending timer in the cache, not just the timer for its own key,
//! because the burst it exists for is a user scrubbing through a
//! selector where every request targets a different key.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;

use tokio::sync::{broadcast, watch};
use tokio::time::Instant;

use crate::config::CacheConfig;
use crate::error::{CacheError, FetchError, Result};
use crate::fetcher::FetchKeyed;
use crate::resource::{lock, Slot};

struct Entry<V> {
    /// Generation the slot was last transitioned under; a stale leader
    /// finding a different generation (or no entry) discards its write.
    generation: u64,
    slot: Slot<V>,
}

struct SlotsInner<V, K> {
    generation: u64,
    slots: HashMap<K, Entry<V>>,
}

struct PendingDebounce {
    seq: u64,
    cancel: watch::Sender<bool>,
}

#[derive(Default)]
struct DebounceState {
    next_seq: u64,
    pending: Option<PendingDebounce>,
}

enum Action<V> {
    Hit(V),
    Join(broadcast::Receiver<std::result::Result<V, FetchError>>),
    Lead {
        tx: broadcast::Sender<std::result::Result<V, FetchError>>,
        generation: u64,
    },
}

/// Cache of per-key child collections.
pub struct KeyedResourceCache<K, V> {
    config: CacheConfig,
    inner: Mutex<SlotsInner<V, K>>,
    debounce: Mutex<DebounceState>,
}

impl<K, V> KeyedResourceCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + 'static,
{
    /// Create an empty cache.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(SlotsInner {
                generation: 0,
                slots: HashMap::new(),
            }),
            debounce: Mutex::new(DebounceState::default()),
        }
    }

    /// Read the collection for `key`, fetching if its slot is empty or
    /// expired. Concurrent callers for the same key join one fetch.
    pub async fn get<F>(&self, key: &K, fetcher: &F) -> Result<V>
    where
        F: FetchKeyed<K, V> + ?Sized,
    {
        let action = {
            let mut inner = lock(&self.inner);
            let existing = match inner.slots.get(key) {
                Some(entry) => {
                    if let Some(value) = entry.slot.fresh_value(self.config.ttl) {
                        Some(Action::Hit(value))
                    } else if let Slot::Loading(tx) = &entry.slot {
                        Some(Action::Join(tx.subscribe()))
                    } else {
                        None
                    }
                }
                None => None,
            };
            match existing {
                Some(action) => action,
                None => self.begin_load(&mut inner, key),
            }
        };

        match action {
            Action::Hit(value) => Ok(value),
            Action::Join(mut rx) => match rx.recv().await {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) => Err(CacheError::Fetch(e)),
                Err(_) => Err(CacheError::Abandoned),
            },
            Action::Lead { tx, generation } => {
                let mut guard = ResetOnDrop {
                    inner: &self.inner,
                    key: key.clone(),
                    generation,
                    armed: true,
                };
                let result = fetcher.fetch(key).await;
                guard.armed = false;
                drop(guard);

                {
                    let mut inner = lock(&self.inner);
                    if inner.slots.get(key).map(|e| e.generation) == Some(generation) {
                        match &result {
                            Ok(value) => {
                                inner.slots.insert(
                                    key.clone(),
                                    Entry {
                                        generation,
                                        slot: Slot::Ready {
                                            value: value.clone(),
                                            fetched_at: Instant::now(),
                                        },
                                    },
                                );
                            }
                            Err(e) => {
                                tracing::debug!(error = %e, "keyed fetch failed; slot cleared");
                                inner.slots.remove(key);
                            }
                        }
                    }
                }

                let _ = tx.send(result.clone());
                result.map_err(CacheError::Fetch)
            }
        }
    }

    /// Read the collection for `key` after the quiet window.
    ///
    /// Issuing a new debounced request cancels any not-yet-fired timer
    /// in this cache; the superseded caller resolves with
    /// [`CacheError::Superseded`] and never fetches.
    pub async fn get_debounced<F>(&self, key: &K, fetcher: &F) -> Result<V>
    where
        F: FetchKeyed<K, V> + ?Sized,
    {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let seq = {
            let mut state = lock(&self.debounce);
            state.next_seq += 1;
            let seq = state.next_seq;
            if let Some(prev) = state.pending.replace(PendingDebounce {
                seq,
                cancel: cancel_tx,
            }) {
                let _ = prev.cancel.send(true);
            }
            seq
        };

        tokio::select! {
            _ = tokio::time::sleep(self.config.debounce) => {}
            _ = cancel_rx.changed() => return Err(CacheError::Superseded),
        }

        {
            let mut state = lock(&self.debounce);
            if state.pending.as_ref().map(|p| p.seq) == Some(seq) {
                state.pending = None;
            }
        }

        self.get(key, fetcher).await
    }

    /// The cached value for `key`, if present and fresh. Never fetches.
    pub fn cached(&self, key: &K) -> Option<V> {
        lock(&self.inner)
            .slots
            .get(key)
            .and_then(|entry| entry.slot.fresh_value(self.config.ttl))
    }

    /// Force the slot for `key` to empty.
    pub fn invalidate(&self, key: &K) {
        let mut inner = lock(&self.inner);
        inner.generation += 1;
        inner.slots.remove(key);
    }

    /// Empty every slot and cancel any pending debounce timer.
    pub fn clear(&self) {
        {
            let mut inner = lock(&self.inner);
            inner.generation += 1;
            inner.slots.clear();
        }
        let pending = lock(&self.debounce).pending.take();
        if let Some(pending) = pending {
            let _ = pending.cancel.send(true);
        }
    }

    fn begin_load(&self, inner: &mut SlotsInner<V, K>, key: &K) -> Action<V> {
        let (tx, _) = broadcast::channel(1);
        inner.generation += 1;
        let generation = inner.generation;
        inner.slots.insert(
            key.clone(),
            Entry {
                generation,
                slot: Slot::Loading(tx.clone()),
            },
        );
        Action::Lead { tx, generation }
    }
}

struct ResetOnDrop<'a, K: Eq + Hash, V> {
    inner: &'a Mutex<SlotsInner<V, K>>,
    key: K,
    generation: u64,
    armed: bool,
}

impl<K: Eq + Hash, V> Drop for ResetOnDrop<'_, K, V> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = lock(self.inner);
        if inner.slots.get(&self.key).map(|e| e.generation) == Some(self.generation) {
            inner.slots.remove(&self.key);
        }
    }
}
