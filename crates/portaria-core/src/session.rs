//! Identity/session provider contract.
//!
//! The session itself is negotiated elsewhere (login flow, external
//! PKI). These types are the shape the guard consumes, nothing more.

use serde::{Deserialize, Serialize};

/// The well-known generic user role.
///
/// Department restrictions only apply to actors carrying this role;
/// privileged roles bypass the department check.
pub const GENERIC_USER_ROLE: &str = "usuario";

/// The authenticated actor, as supplied by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    /// Stable identifier for the actor.
    pub id: String,

    /// The actor's role.
    pub role: String,

    /// The actor's department, when assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl Actor {
    /// True when the actor carries the generic user role.
    pub fn is_generic_user(&self) -> bool {
        self.role == GENERIC_USER_ROLE
    }
}

/// Snapshot of the session provider's state at render time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Whether the provider considers the session authenticated.
    pub is_authenticated: bool,

    /// Whether the provider is still resolving the session.
    pub loading: bool,

    /// The actor, when known. May be absent even when authenticated.
    pub user: Option<Actor>,
}

impl SessionState {
    /// A session still being resolved.
    pub fn loading() -> Self {
        Self {
            is_authenticated: false,
            loading: true,
            user: None,
        }
    }

    /// An unauthenticated session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// An authenticated session for the given actor.
    pub fn authenticated(user: Actor) -> Self {
        Self {
            is_authenticated: true,
            loading: false,
            user: Some(user),
        }
    }
}
