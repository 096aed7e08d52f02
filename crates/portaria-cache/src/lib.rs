//! # Portaria Cache
//!
//! Reference-data caching for the Portaria kernel: a time-boxed cache
//! that deduplicates concurrent fetches and debounces rapid repeated
//! requests for per-key sub-resources.
//!
//! ## Overview
//!
//! Two tiers:
//!
//! - [`ResourceCache`] - one slot for a root collection (e.g. "all
//!   document types") with a TTL and in-flight request joining
//! - [`KeyedResourceCache`] - per-parent child collections (e.g.
//!   "subtypes of type N") with the same slot semantics plus a
//!   cache-wide debounce for bursts of keyed requests
//!
//! Both are explicit service instances: construct once at process
//! start, inject wherever needed, and construct a fresh instance per
//! test. There is no module-level state.
//!
//! ## Slot lifecycle
//!
//! ```text
//! Empty --request--> Loading --success--> Ready
//!                       |                   |
//!                       +--failure--> Empty +--TTL elapsed--> (as Empty)
//! ```
//!
//! Concurrent callers of a Loading slot join the in-flight fetch
//! instead of issuing their own; a failed fetch clears the slot so a
//! retry refetches (failures are never cached).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use portaria_cache::{CacheConfig, FnFetch, ResourceCache};
//!
//! async fn example() {
//!     let cache: ResourceCache<Vec<String>> = ResourceCache::new(CacheConfig::default());
//!     let fetcher = FnFetch::new(|| async { Ok(vec!["decreto".to_string()]) });
//!
//!     // First call fetches; later calls within the TTL are served
//!     // from the slot, and concurrent calls join the same fetch.
//!     let kinds = cache.get(&fetcher).await.unwrap();
//!     assert_eq!(kinds.len(), 1);
//! }
//! ```

pub mod config;
pub mod error;
pub mod fetcher;
pub mod keyed;
pub mod resource;

pub use config::CacheConfig;
pub use error::{CacheError, FetchError, Result};
pub use fetcher::{Fetch, FetchKeyed, FnFetch, FnFetchKeyed};
pub use keyed::KeyedResourceCache;
pub use resource::ResourceCache;
