//! Root-collection cache: one TTL-bound slot with in-flight joining.

use std::sync::{Mutex, MutexGuard};

use tokio::sync::broadcast;
use tokio::time::Instant;

use crate::config::CacheConfig;
use crate::error::{CacheError, FetchError, Result};
use crate::fetcher::Fetch;

/// One cache slot.
///
/// At most one in-flight fetch exists per slot: the Loading variant
/// holds the broadcast sender every joining caller subscribes to.
pub(crate) enum Slot<V> {
    Empty,
    Loading(broadcast::Sender<std::result::Result<V, FetchError>>),
    Ready { value: V, fetched_at: Instant },
}

impl<V: Clone> Slot<V> {
    /// The cached value, if present and fresh.
    pub(crate) fn fresh_value(&self, ttl: std::time::Duration) -> Option<V> {
        match self {
            Slot::Ready { value, fetched_at } if fetched_at.elapsed() < ttl => {
                Some(value.clone())
            }
            _ => None,
        }
    }
}

struct Inner<V> {
    /// Bumped on every Loading transition and every invalidation so a
    /// stale leader cannot write over newer state.
    generation: u64,
    slot: Slot<V>,
}

/// What a caller does after inspecting the slot.
enum Action<V> {
    Hit(V),
    Join(broadcast::Receiver<std::result::Result<V, FetchError>>),
    Lead {
        tx: broadcast::Sender<std::result::Result<V, FetchError>>,
        generation: u64,
    },
}

/// TTL-bound cache for a single root collection.
///
/// Concurrent callers of an empty (or expired) slot elect one leader;
/// the rest join the leader's fetch and receive the same resolved
/// value. A failed fetch clears the slot and fails every joined caller.
pub struct ResourceCache<V> {
    config: CacheConfig,
    inner: Mutex<Inner<V>>,
}

impl<V: Clone + Send + 'static> ResourceCache<V> {
    /// Create an empty cache.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner {
                generation: 0,
                slot: Slot::Empty,
            }),
        }
    }

    /// Read the collection, fetching if the slot is empty or expired.
    pub async fn get<F>(&self, fetcher: &F) -> Result<V>
    where
        F: Fetch<V> + ?Sized,
    {
        let action = {
            let mut inner = lock(&self.inner);
            if let Some(value) = inner.slot.fresh_value(self.config.ttl) {
                Action::Hit(value)
            } else if let Slot::Loading(tx) = &inner.slot {
                Action::Join(tx.subscribe())
            } else {
                let (tx, _) = broadcast::channel(1);
                inner.generation += 1;
                inner.slot = Slot::Loading(tx.clone());
                Action::Lead {
                    tx,
                    generation: inner.generation,
                }
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
                // If this caller is dropped mid-fetch the slot must not
                // stay Loading forever; the guard resets it so the next
                // caller refetches and joined callers are woken.
                let mut guard = ResetOnDrop {
                    inner: &self.inner,
                    generation,
                    armed: true,
                };
                let result = fetcher.fetch().await;
                guard.armed = false;
                drop(guard);

                {
                    let mut inner = lock(&self.inner);
                    if inner.generation == generation {
                        inner.slot = match &result {
                            Ok(value) => Slot::Ready {
                                value: value.clone(),
                                fetched_at: Instant::now(),
                            },
                            Err(e) => {
                                tracing::debug!(error = %e, "root fetch failed; slot cleared");
                                Slot::Empty
                            }
                        };
                    }
                }

                let _ = tx.send(result.clone());
                result.map_err(CacheError::Fetch)
            }
        }
    }

    /// The cached value, if present and fresh. Never fetches.
    pub fn cached(&self) -> Option<V> {
        lock(&self.inner).slot.fresh_value(self.config.ttl)
    }

    /// Force the slot to empty, regardless of TTL or an in-flight
    /// fetch. A fetch already in flight still resolves its joined
    /// callers but its result is not stored.
    pub fn invalidate(&self) {
        let mut inner = lock(&self.inner);
        inner.generation += 1;
        inner.slot = Slot::Empty;
    }
}

struct ResetOnDrop<'a, V> {
    inner: &'a Mutex<Inner<V>>,
    generation: u64,
    armed: bool,
}

impl<V> Drop for ResetOnDrop<'_, V> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = lock(self.inner);
        if inner.generation == self.generation {
            inner.generation += 1;
            inner.slot = Slot::Empty;
        }
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
