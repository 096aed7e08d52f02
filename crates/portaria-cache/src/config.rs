//! Cache configuration.

use std::time::Duration;

/// Configuration for cache behavior.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a fetched value stays fresh. Expiry does not clear the
    /// slot eagerly; it only changes whether a read accepts it.
    pub ttl: Duration,

    /// Quiet window for debounced keyed requests. A burst of requests
    /// within the window collapses to one fetch for the last key.
    pub debounce: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            debounce: Duration::from_millis(300),
        }
    }
}

impl CacheConfig {
    /// Override the TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Override the debounce window.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}
