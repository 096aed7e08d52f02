//! Route-level guarding.
//!
//! The guard wraps a protected view: given the session snapshot and the
//! route's rules it produces one [`RouteDecision`]. The host renders,
//! redirects, or renders nothing accordingly. Denials are logged as
//! structured diagnostics before the decision is returned; the redirect
//! itself is the recovery action, not an error path.

use serde::Deserialize;

use portaria_core::{DenyReason, SessionState};
use portaria_store::Storage;

use crate::engine::AuthzEngine;

/// Localized notice surfaced alongside a role/department denial.
pub const NOT_PERMITTED_NOTICE: &str = "Você não tem permissão para acessar esta página.";

/// A structured permission requirement for a route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRule {
    /// The required permission code.
    pub code: String,

    /// The screen the code must be scoped to. A rule without a screen
    /// id always denies; see the decision table on [`RouteGuard`].
    #[serde(default)]
    pub screen_id: Option<i64>,
}

/// Declarative access rules for one route.
///
/// Empty collections and `None` fields mean "no restriction of that
/// kind"; a route with all fields empty allows every authenticated
/// actor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRules {
    /// Roles allowed on the route. Empty = any role.
    #[serde(default)]
    pub allowed_roles: Vec<String>,

    /// Departments allowed on the route. Only enforced for actors
    /// carrying the generic user role. Empty = any department.
    #[serde(default)]
    pub allowed_departments: Vec<String>,

    /// Structured permission requirement. Checked before the bare
    /// screen id when both are configured.
    #[serde(default)]
    pub permission: Option<PermissionRule>,

    /// Bare screen requirement: the actor must hold screen access for
    /// this id. Ignored when `permission` is set.
    #[serde(default)]
    pub screen_id: Option<i64>,
}

/// Outcome of a route guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session still resolving; render a neutral placeholder.
    Loading,

    /// Not authenticated; go to the login entry point, preserving the
    /// originally requested location for the post-login return.
    RedirectToLogin {
        /// The location to return to after login.
        return_to: String,
    },

    /// Authenticated but no identity object; render nothing.
    RenderNothing,

    /// Denied. The host surfaces the notice and redirects to the
    /// application root.
    Deny {
        /// Which rule denied.
        reason: DenyReason,
        /// Localized user-facing notice.
        notice: &'static str,
    },

    /// All configured rules passed; render the children.
    Allow,
}

impl RouteDecision {
    fn deny(reason: DenyReason) -> Self {
        RouteDecision::Deny {
            reason,
            notice: NOT_PERMITTED_NOTICE,
        }
    }

    /// True when the decision renders the protected children.
    pub fn is_allow(&self) -> bool {
        matches!(self, RouteDecision::Allow)
    }
}

/// Guard for one protected route.
///
/// # Decision order
///
/// First applicable rule wins; configured rules are AND'ed:
///
/// 1. session loading → [`RouteDecision::Loading`]
/// 2. not authenticated → [`RouteDecision::RedirectToLogin`]
/// 3. no identity object → [`RouteDecision::RenderNothing`]
/// 4. role not in `allowed_roles` → deny (`role`)
/// 5. generic user outside `allowed_departments` → deny (`department`)
/// 6. `permission` rule fails → deny (`permission`); a rule without a
///    numeric screen id always denies. Otherwise a bare `screen_id`
///    without screen access → deny (`screen`)
/// 7. nothing applied → [`RouteDecision::Allow`]
pub struct RouteGuard<S: Storage> {
    engine: AuthzEngine<S>,
    rules: RouteRules,
}

impl<S: Storage> RouteGuard<S> {
    /// Create a guard with the given rules.
    pub fn new(engine: AuthzEngine<S>, rules: RouteRules) -> Self {
        Self { engine, rules }
    }

    /// Evaluate the guard for the current session and requested path.
    pub fn decide(&self, session: &SessionState, path: &str) -> RouteDecision {
        if session.loading {
            return RouteDecision::Loading;
        }

        if !session.is_authenticated {
            return RouteDecision::RedirectToLogin {
                return_to: path.to_string(),
            };
        }

        let Some(user) = &session.user else {
            tracing::debug!(path, "authenticated session without identity object");
            return RouteDecision::RenderNothing;
        };

        if !self.rules.allowed_roles.is_empty() && !self.rules.allowed_roles.contains(&user.role) {
            tracing::warn!(
                path,
                actor = %user.id,
                reason = DenyReason::Role.as_str(),
                role = %user.role,
                "route denied"
            );
            return RouteDecision::deny(DenyReason::Role);
        }

        if user.is_generic_user() && !self.rules.allowed_departments.is_empty() {
            let allowed = user
                .department
                .as_ref()
                .is_some_and(|dep| self.rules.allowed_departments.contains(dep));
            if !allowed {
                tracing::warn!(
                    path,
                    actor = %user.id,
                    reason = DenyReason::Department.as_str(),
                    department = user.department.as_deref().unwrap_or(""),
                    "route denied"
                );
                return RouteDecision::deny(DenyReason::Department);
            }
        }

        if let Some(rule) = &self.rules.permission {
            // A rule without a numeric screen id denies outright. This
            // diverges from `has`, which treats a missing screen id as
            // match-on-code-alone; the divergence is kept for
            // compatibility and surfaced here so it can be noticed.
            let Some(screen_id) = rule.screen_id else {
                tracing::warn!(
                    path,
                    actor = %user.id,
                    reason = DenyReason::Permission.as_str(),
                    code = %rule.code,
                    "route denied: permission rule missing screen id"
                );
                return RouteDecision::deny(DenyReason::Permission);
            };

            if !self.engine.has(&rule.code, Some(screen_id)) {
                tracing::warn!(
                    path,
                    actor = %user.id,
                    reason = DenyReason::Permission.as_str(),
                    code = %rule.code,
                    screen_id,
                    "route denied"
                );
                return RouteDecision::deny(DenyReason::Permission);
            }
        } else if let Some(screen_id) = self.rules.screen_id {
            if !self.engine.can_access_screen(screen_id) {
                tracing::warn!(
                    path,
                    actor = %user.id,
                    reason = DenyReason::Screen.as_str(),
                    screen_id,
                    "route denied"
                );
                return RouteDecision::deny(DenyReason::Screen);
            }
        }

        RouteDecision::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portaria_core::{Actor, Grant, GENERIC_USER_ROLE};
    use portaria_store::{GrantStore, MemoryStorage};
    use std::sync::Arc;

    fn engine_with(grants: Vec<Grant>) -> AuthzEngine<MemoryStorage> {
        let store = Arc::new(GrantStore::new(MemoryStorage::new()));
        store.set_permissions(grants);
        AuthzEngine::new(store)
    }

    fn user(role: &str, department: Option<&str>) -> Actor {
        Actor {
            id: "u1".into(),
            role: role.into(),
            department: department.map(String::from),
        }
    }

    #[test]
    fn test_loading_defers_decision() {
        let guard = RouteGuard::new(engine_with(vec![]), RouteRules::default());
        assert_eq!(
            guard.decide(&SessionState::loading(), "/atos"),
            RouteDecision::Loading
        );
    }

    #[test]
    fn test_unauthenticated_redirects_preserving_location() {
        let guard = RouteGuard::new(engine_with(vec![]), RouteRules::default());
        assert_eq!(
            guard.decide(&SessionState::anonymous(), "/atos/42"),
            RouteDecision::RedirectToLogin {
                return_to: "/atos/42".to_string()
            }
        );
    }

    #[test]
    fn test_missing_identity_renders_nothing() {
        let guard = RouteGuard::new(engine_with(vec![]), RouteRules::default());
        let session = SessionState {
            is_authenticated: true,
            loading: false,
            user: None,
        };
        assert_eq!(guard.decide(&session, "/atos"), RouteDecision::RenderNothing);
    }

    #[test]
    fn test_role_restriction() {
        let rules = RouteRules {
            allowed_roles: vec!["administrador".into()],
            ..Default::default()
        };
        let guard = RouteGuard::new(engine_with(vec![]), rules);

        let admin = SessionState::authenticated(user("administrador", None));
        assert!(guard.decide(&admin, "/admin").is_allow());

        let common = SessionState::authenticated(user(GENERIC_USER_ROLE, None));
        assert_eq!(
            guard.decide(&common, "/admin"),
            RouteDecision::Deny {
                reason: DenyReason::Role,
                notice: NOT_PERMITTED_NOTICE
            }
        );
    }

    #[test]
    fn test_department_restriction_applies_to_generic_user_only() {
        let rules = RouteRules {
            allowed_departments: vec!["juridico".into()],
            ..Default::default()
        };
        let guard = RouteGuard::new(engine_with(vec![]), rules);

        // Generic user in the department: allowed.
        let inside = SessionState::authenticated(user(GENERIC_USER_ROLE, Some("juridico")));
        assert!(guard.decide(&inside, "/pareceres").is_allow());

        // Generic user outside (or without) the department: denied.
        let outside = SessionState::authenticated(user(GENERIC_USER_ROLE, Some("financeiro")));
        assert_eq!(
            guard.decide(&outside, "/pareceres"),
            RouteDecision::Deny {
                reason: DenyReason::Department,
                notice: NOT_PERMITTED_NOTICE
            }
        );
        let missing = SessionState::authenticated(user(GENERIC_USER_ROLE, None));
        assert!(!guard.decide(&missing, "/pareceres").is_allow());

        // Privileged role bypasses the department check.
        let admin = SessionState::authenticated(user("administrador", None));
        assert!(guard.decide(&admin, "/pareceres").is_allow());
    }

    #[test]
    fn test_permission_rule() {
        let rules = RouteRules {
            permission: Some(PermissionRule {
                code: "assinar_ato".into(),
                screen_id: Some(3),
            }),
            ..Default::default()
        };
        let session = SessionState::authenticated(user(GENERIC_USER_ROLE, None));

        let granted = RouteGuard::new(engine_with(vec![Grant::new(3, "assinar_ato")]), rules.clone());
        assert!(granted.decide(&session, "/assinaturas").is_allow());

        let denied = RouteGuard::new(engine_with(vec![Grant::new(4, "assinar_ato")]), rules);
        assert_eq!(
            denied.decide(&session, "/assinaturas"),
            RouteDecision::Deny {
                reason: DenyReason::Permission,
                notice: NOT_PERMITTED_NOTICE
            }
        );
    }

    #[test]
    fn test_permission_rule_without_screen_id_always_denies() {
        // Even when the code would match on its own, the structured
        // rule path requires a screen id.
        let rules = RouteRules {
            permission: Some(PermissionRule {
                code: "assinar_ato".into(),
                screen_id: None,
            }),
            ..Default::default()
        };
        let guard = RouteGuard::new(engine_with(vec![Grant::new(3, "assinar_ato")]), rules);
        let session = SessionState::authenticated(user(GENERIC_USER_ROLE, None));

        assert_eq!(
            guard.decide(&session, "/assinaturas"),
            RouteDecision::Deny {
                reason: DenyReason::Permission,
                notice: NOT_PERMITTED_NOTICE
            }
        );
    }

    #[test]
    fn test_bare_screen_requirement() {
        let rules = RouteRules {
            screen_id: Some(1),
            ..Default::default()
        };
        let session = SessionState::authenticated(user(GENERIC_USER_ROLE, None));

        let granted = RouteGuard::new(engine_with(vec![Grant::new(1, "acesso_tela")]), rules.clone());
        assert!(granted.decide(&session, "/atos").is_allow());

        let denied = RouteGuard::new(engine_with(vec![]), rules);
        assert_eq!(
            denied.decide(&session, "/atos"),
            RouteDecision::Deny {
                reason: DenyReason::Screen,
                notice: NOT_PERMITTED_NOTICE
            }
        );
    }

    #[test]
    fn test_no_rules_allows_authenticated_actor() {
        let guard = RouteGuard::new(engine_with(vec![]), RouteRules::default());
        let session = SessionState::authenticated(user(GENERIC_USER_ROLE, None));
        assert!(guard.decide(&session, "/inicio").is_allow());
    }

    #[test]
    fn test_role_and_permission_rules_are_anded() {
        let rules = RouteRules {
            allowed_roles: vec![GENERIC_USER_ROLE.into()],
            permission: Some(PermissionRule {
                code: "editar_ato".into(),
                screen_id: Some(2),
            }),
            ..Default::default()
        };
        let guard = RouteGuard::new(engine_with(vec![Grant::new(2, "editar_ato")]), rules);

        let common = SessionState::authenticated(user(GENERIC_USER_ROLE, None));
        assert!(guard.decide(&common, "/atos/2").is_allow());

        // Role check fails first even though the permission would pass.
        let admin = SessionState::authenticated(user("administrador", None));
        assert_eq!(
            guard.decide(&admin, "/atos/2"),
            RouteDecision::Deny {
                reason: DenyReason::Role,
                notice: NOT_PERMITTED_NOTICE
            }
        );
    }
}
