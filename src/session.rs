//! Session state container.
//!
//! One process-wide [`SessionStore`] owns the authenticated session: the
//! bearer token, the user profile, and the permission/role sets fetched
//! from the backend. All other components read it through accessors;
//! mutation is restricted to the auth service and the 401 interceptor
//! (the mutators are `pub(crate)`).
//!
//! ## Lifecycle
//! - Created empty at process start
//! - Populated by login or by restoring a persisted token
//! - Cleared on logout or on any 401 from the backend
//!
//! The store is the sole shared mutable state in the crate. Reads and
//! writes go through a `parking_lot::RwLock`; callers must still avoid
//! firing overlapping mutating operations when ordering matters (last
//! write wins on interleaved completions).

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Profile of the logged-in admin user, as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    /// Database ID.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Contact email, if set.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name, if set.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Disabled accounts cannot log in; the flag is still reported.
    pub is_active: bool,
}

/// A role held by the session's user.
///
/// Access checks compare `name` only; `display_name` is a human label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    /// Unique, stable identifier (e.g. `super_admin`).
    pub name: String,
    /// Human-readable label.
    pub display_name: String,
}

/// Mutable session fields, guarded by the store's lock.
#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<UserProfile>,
    permissions: HashSet<String>,
    roles: Vec<Role>,
    loading: bool,
    error: Option<String>,
}

/// Process-wide holder of the authenticated session.
#[derive(Debug, Default)]
pub struct SessionStore {
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Create an empty (logged-out) store.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Read accessors ──────────────────────────────────────────────

    /// Current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    /// Current user profile, if loaded.
    pub fn user(&self) -> Option<UserProfile> {
        self.state.read().user.clone()
    }

    /// Snapshot of the permission set.
    pub fn permissions(&self) -> HashSet<String> {
        self.state.read().permissions.clone()
    }

    /// Snapshot of the role set.
    pub fn roles(&self) -> Vec<Role> {
        self.state.read().roles.clone()
    }

    /// Whether a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.state.read().token.is_some()
    }

    /// Whether a mutating auth operation is in flight.
    pub fn loading(&self) -> bool {
        self.state.read().loading
    }

    /// Message of the last failed auth operation, if any.
    pub fn last_error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    /// Run `f` against the live permission set without cloning it.
    pub(crate) fn with_permissions<R>(&self, f: impl FnOnce(&HashSet<String>) -> R) -> R {
        f(&self.state.read().permissions)
    }

    /// Run `f` against the live role set without cloning it.
    pub(crate) fn with_roles<R>(&self, f: impl FnOnce(&[Role]) -> R) -> R {
        f(&self.state.read().roles)
    }

    // ── Mutators (auth service + 401 interceptor only) ──────────────

    pub(crate) fn set_loading(&self, loading: bool) {
        self.state.write().loading = loading;
    }

    pub(crate) fn set_error(&self, error: Option<String>) {
        self.state.write().error = error;
    }

    /// Adopt a token restored from durable storage (startup path). The
    /// profile and grants are fetched separately.
    pub(crate) fn restore_token(&self, token: String) {
        self.state.write().token = Some(token);
    }

    /// Record a successful login.
    pub(crate) fn set_login(&self, token: String, user: UserProfile) {
        let mut state = self.state.write();
        state.token = Some(token);
        state.user = Some(user);
        state.error = None;
    }

    /// Replace the user profile (e.g. after `/api/auth/me`).
    pub(crate) fn set_user(&self, user: UserProfile) {
        self.state.write().user = Some(user);
    }

    /// Replace the permission and role sets.
    pub(crate) fn set_grants(&self, permissions: Vec<String>, roles: Vec<Role>) {
        let mut state = self.state.write();
        state.permissions = permissions.into_iter().collect();
        state.roles = roles;
    }

    /// Drop everything: token, user, grants, error state.
    pub(crate) fn clear(&self) {
        let mut state = self.state.write();
        state.token = None;
        state.user = None;
        state.permissions.clear();
        state.roles.clear();
        state.error = None;
    }
}

#[cfg(test)]
pub(crate) fn test_profile(username: &str) -> UserProfile {
    UserProfile {
        id: 1,
        username: username.to_string(),
        email: None,
        full_name: None,
        is_active: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_logged_out_and_empty() {
        let store = SessionStore::new();
        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
        assert!(store.user().is_none());
        assert!(store.permissions().is_empty());
        assert!(store.roles().is_empty());
    }

    #[test]
    fn login_populates_token_and_user() {
        let store = SessionStore::new();
        store.set_login("tok-1".into(), test_profile("alice"));

        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("tok-1"));
        assert_eq!(store.user().unwrap().username, "alice");
    }

    #[test]
    fn clear_resets_all_fields() {
        let store = SessionStore::new();
        store.set_login("tok-1".into(), test_profile("alice"));
        store.set_grants(
            vec!["knowledge:view".into()],
            vec![Role {
                name: "editor".into(),
                display_name: "Editor".into(),
            }],
        );
        store.set_error(Some("boom".into()));

        store.clear();

        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
        assert!(store.permissions().is_empty());
        assert!(store.roles().is_empty());
        assert!(store.last_error().is_none());
    }

    #[test]
    fn set_grants_replaces_previous_sets() {
        let store = SessionStore::new();
        store.set_grants(vec!["knowledge:view".into(), "knowledge:view".into()], vec![]);
        assert_eq!(store.permissions().len(), 1);

        store.set_grants(vec!["vendors:view".into()], vec![]);
        let perms = store.permissions();
        assert!(perms.contains("vendors:view"));
        assert!(!perms.contains("knowledge:view"));
    }

    #[test]
    fn user_profile_deserializes_with_missing_optionals() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"id": 7, "username": "ops", "is_active": true}"#,
        )
        .unwrap();
        assert_eq!(profile.username, "ops");
        assert!(profile.email.is_none());
        assert!(profile.full_name.is_none());
    }
}
