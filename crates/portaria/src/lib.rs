//! # Portaria
//!
//! The unified API for the Portaria kernel - advisory authorization
//! and reference-data caching for a document-workflow front end.
//!
//! ## Overview
//!
//! Portaria covers the two subsystems of the surrounding application
//! where correctness is actually at stake:
//!
//! - **Authorization**: a flat grant list, replaced wholesale at login,
//!   drives every screen and element decision. Decisions are total
//!   functions; absence of data denies, nothing throws.
//! - **Reference-data caching**: TTL-bound caches that deduplicate
//!   concurrent fetches and debounce bursts of keyed sub-resource
//!   requests.
//!
//! The engine is advisory, UI-level only. It must never be treated as
//! a security boundary by itself; the server enforces for real.
//!
//! ## Usage
//!
//! ```rust
//! use portaria::{Portaria, PortariaConfig};
//! use portaria::store::MemoryStorage;
//!
//! let portaria = Portaria::new(MemoryStorage::new(), PortariaConfig::default());
//!
//! // Session bootstrap: the login flow hands over its payload.
//! let payload = serde_json::json!({
//!     "permissions": [{"screenId": 1, "permissionCode": "acesso_tela"}],
//!     "screens": {"atos": 1},
//! });
//! portaria.apply_login_payload(&payload);
//!
//! assert!(portaria.engine().can_access_screen(1));
//! assert!(portaria.engine().can_access_screen_by_code("atos"));
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `portaria::core` - Data model (Grant, ScreenMap, sessions)
//! - `portaria::store` - Grant store and storage backends
//! - `portaria::authz` - Engine, route guard, element gate
//! - `portaria::cache` - Resource caches

pub mod error;
pub mod kernel;

// Re-export component crates
pub use portaria_authz as authz;
pub use portaria_cache as cache;
pub use portaria_core as core;
pub use portaria_store as store;

// Re-export main types for convenience
pub use error::{PortariaError, Result};
pub use kernel::{Portaria, PortariaConfig};

// Re-export commonly used types
pub use portaria_authz::{
    AuthzEngine, ElementGate, GateMode, GateOutcome, PermissionRule, RouteDecision, RouteGuard,
    RouteRules,
};
pub use portaria_cache::{CacheConfig, KeyedResourceCache, ResourceCache};
pub use portaria_core::{
    Actor, DenyReason, Grant, GrantSet, ScreenMap, SessionState, SCREEN_ACCESS_CODE,
};
pub use portaria_store::{GrantStore, MemoryStorage, SqliteStorage, Storage};
