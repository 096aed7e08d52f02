//! # Portaria Authz
//!
//! Authorization decisions over the live grant store.
//!
//! ## Overview
//!
//! Three layers, thinnest on top:
//!
//! - [`AuthzEngine`] - pure decision functions (`has`, screen access)
//! - [`RouteGuard`] - route-level decision: render, redirect, or deny
//! - [`ElementGate`] - element-level decision: render, hide, or disable
//!
//! Every function here is total. Absence of data resolves to a negative
//! decision, never to an error: these run inline in render paths where
//! an exception would take the whole view down. A denial is not an
//! error either; it is a normal outcome, logged once through `tracing`
//! with a fixed reason taxonomy and then recovered by redirect or hide.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use portaria_core::Grant;
//! use portaria_store::{GrantStore, MemoryStorage};
//! use portaria_authz::AuthzEngine;
//!
//! let store = Arc::new(GrantStore::new(MemoryStorage::new()));
//! store.set_permissions(vec![Grant::new(1, "acesso_tela")]);
//!
//! let engine = AuthzEngine::new(store);
//! assert!(engine.can_access_screen(1));
//! assert!(!engine.can_access_screen(2));
//! ```

pub mod engine;
pub mod gate;
pub mod guard;

pub use engine::AuthzEngine;
pub use gate::{ElementGate, GateMode, GateOutcome};
pub use guard::{PermissionRule, RouteDecision, RouteGuard, RouteRules, NOT_PERMITTED_NOTICE};
