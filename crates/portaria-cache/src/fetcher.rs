//! Fetch abstraction for cached resources.
//!
//! The fetch traits are the injected network boundary: the cache never
//! issues requests itself, it decides when the fetcher runs and who
//! shares the result. Applications implement them on their REST
//! client; tests use the closure adapters.

use async_trait::async_trait;
use std::future::Future;

use crate::error::FetchError;

/// Fetches the root collection.
#[async_trait]
pub trait Fetch<V>: Send + Sync {
    /// Issue the underlying request.
    async fn fetch(&self) -> Result<V, FetchError>;
}

/// Fetches a per-key sub-resource.
#[async_trait]
pub trait FetchKeyed<K, V>: Send + Sync {
    /// Issue the underlying request for `key`.
    async fn fetch(&self, key: &K) -> Result<V, FetchError>;
}

/// Adapter implementing [`Fetch`] for a closure.
pub struct FnFetch<F>(F);

impl<F> FnFetch<F> {
    /// Wrap a closure returning the fetch future.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<V, F, Fut> Fetch<V> for FnFetch<F>
where
    V: Send + 'static,
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
{
    async fn fetch(&self) -> Result<V, FetchError> {
        (self.0)().await
    }
}

/// Adapter implementing [`FetchKeyed`] for a closure taking the key by
/// value.
pub struct FnFetchKeyed<F>(F);

impl<F> FnFetchKeyed<F> {
    /// Wrap a closure returning the fetch future for a key.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<K, V, F, Fut> FetchKeyed<K, V> for FnFetchKeyed<F>
where
    K: Clone + Send + Sync + 'static,
    V: Send + 'static,
    F: Fn(K) -> Fut + Send + Sync,
    Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
{
    async fn fetch(&self, key: &K) -> Result<V, FetchError> {
        (self.0)(key.clone()).await
    }
}
