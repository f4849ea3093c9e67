//! Navigation guard.
//!
//! Every navigation runs one ordered decision sequence, each step
//! short-circuiting:
//!
//! 1. Routes require auth unless explicitly public.
//! 2. No session on a protected route → redirect to login, carrying the
//!    intended path as the `redirect` query parameter.
//! 3. An authenticated user opening `/login` → redirect home.
//! 4. Authenticated but no grants loaded yet (fresh page load) → refresh
//!    grants just-in-time; if the set is still empty the refresh failed,
//!    so force logout and redirect to login.
//! 5. Declared route permissions unmet (OR semantics) → deny in place.
//! 6. Declared route roles unmet (OR semantics) → deny in place.
//! 7. Allow.
//!
//! A deny keeps the user on the current page with a blocking notice; no
//! redirect happens. Nothing is retained between navigations beyond the
//! session itself.

use super::{Route, RouteTable, HOME_PATH, LOGIN_PATH};
use crate::auth::AuthService;
use crate::rbac;
use crate::session::SessionStore;
use std::sync::Arc;

/// Outcome of a guarded navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Proceed to the target route.
    Allow,
    /// Go to the login screen; `redirect` is the originally intended
    /// path, to return to after a successful login.
    RedirectToLogin { redirect: String },
    /// Already logged in; go home instead of the login screen.
    RedirectHome,
    /// Stay on the current page and show a blocking notice.
    Deny { notice: String },
}

impl GuardDecision {
    /// Concrete location for redirect decisions (`None` for allow/deny).
    /// The return target is percent-encoded into the query string.
    pub fn location(&self) -> Option<String> {
        match self {
            Self::RedirectToLogin { redirect } => Some(format!(
                "{LOGIN_PATH}?redirect={}",
                urlencoding::encode(redirect)
            )),
            Self::RedirectHome => Some(HOME_PATH.to_string()),
            Self::Allow | Self::Deny { .. } => None,
        }
    }
}

/// Gate for console navigations.
#[derive(Clone)]
pub struct RouteGuard {
    table: RouteTable,
    auth: AuthService,
    session: Arc<SessionStore>,
}

impl RouteGuard {
    pub fn new(table: RouteTable, auth: AuthService) -> Self {
        let session = auth.session();
        Self {
            table,
            auth,
            session,
        }
    }

    /// Decide whether a navigation to `path` may proceed.
    pub async fn check(&self, path: &str) -> GuardDecision {
        let meta = match self.table.find(path) {
            Some(route) => route.meta.clone(),
            // Unknown paths still require a session; the view layer
            // renders its own not-found page behind the login wall.
            None => Default::default(),
        };

        if meta.requires_auth && !self.session.is_authenticated() {
            return GuardDecision::RedirectToLogin {
                redirect: path.to_string(),
            };
        }

        if self.is_login_route(path) && self.session.is_authenticated() {
            return GuardDecision::RedirectHome;
        }

        // Fresh page load: a restored token without grants in memory.
        // Refresh before evaluating requirements; an empty set after the
        // refresh means the session is no longer valid.
        if meta.requires_auth && self.session.permissions().is_empty() {
            self.auth.fetch_user_permissions().await;
            if self.session.permissions().is_empty() {
                self.auth.logout();
                return GuardDecision::RedirectToLogin {
                    redirect: path.to_string(),
                };
            }
        }

        if !meta.permissions.is_empty()
            && !rbac::has_any_permission(&self.session, &meta.permissions)
        {
            tracing::debug!(path, required = ?meta.permissions, "navigation denied: permissions");
            return GuardDecision::Deny {
                notice: format!("You do not have permission to access {path}"),
            };
        }

        if !meta.roles.is_empty()
            && !meta.roles.iter().any(|r| rbac::has_role(&self.session, r))
        {
            tracing::debug!(path, required = ?meta.roles, "navigation denied: roles");
            return GuardDecision::Deny {
                notice: format!("You do not have permission to access {path}"),
            };
        }

        GuardDecision::Allow
    }

    fn is_login_route(&self, path: &str) -> bool {
        self.table
            .find(path)
            .map(|route: &Route| route.path == LOGIN_PATH)
            .unwrap_or(false)
    }
}
