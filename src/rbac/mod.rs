//! Role-based access control queries.
//!
//! Pure boolean functions over the live session store. Permission strings
//! are `resource:action` tokens; two wildcard forms are recognized:
//! - `*:*` grants everything
//! - `resource:*` grants every action on that resource
//!
//! Matching is case-sensitive and exact on the resource segment (the part
//! before the first colon). No other wildcard forms exist.
//!
//! Every function re-reads the store on each call, so checks always
//! reflect the current grants rather than a snapshot taken at startup.

pub mod gate;

use crate::session::SessionStore;
use std::collections::HashSet;

/// The distinguished superuser role name.
pub const SUPER_ADMIN_ROLE: &str = "super_admin";

/// The grant-everything permission.
pub const UNIVERSAL_WILDCARD: &str = "*:*";

/// Check a single permission against a grant set.
fn granted(grants: &HashSet<String>, permission: &str) -> bool {
    if grants.contains(UNIVERSAL_WILDCARD) || grants.contains(permission) {
        return true;
    }
    // `resource:*` covers any action on the resource. Only the segment
    // before the FIRST colon is the resource.
    match permission.split_once(':') {
        Some((resource, _)) => grants.contains(&format!("{resource}:*")),
        None => false,
    }
}

/// Does the session hold `permission` (directly or via a wildcard)?
pub fn has_permission(store: &SessionStore, permission: &str) -> bool {
    store.with_permissions(|grants| granted(grants, permission))
}

/// Does the session hold at least one of `permissions`?
///
/// An empty list is never satisfied.
pub fn has_any_permission<S: AsRef<str>>(store: &SessionStore, permissions: &[S]) -> bool {
    store.with_permissions(|grants| {
        permissions.iter().any(|p| granted(grants, p.as_ref()))
    })
}

/// Does the session hold every one of `permissions`?
///
/// An empty list is vacuously satisfied (AND over nothing is true).
pub fn has_all_permissions<S: AsRef<str>>(store: &SessionStore, permissions: &[S]) -> bool {
    store.with_permissions(|grants| {
        permissions.iter().all(|p| granted(grants, p.as_ref()))
    })
}

/// Does the session hold a role with exactly this name?
pub fn has_role(store: &SessionStore, role_name: &str) -> bool {
    store.with_roles(|roles| roles.iter().any(|r| r.name == role_name))
}

/// Is the session's user a super admin?
pub fn is_super_admin(store: &SessionStore) -> bool {
    has_role(store, SUPER_ADMIN_ROLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;

    fn store_with(permissions: &[&str], roles: &[&str]) -> SessionStore {
        let store = SessionStore::new();
        store.set_grants(
            permissions.iter().map(|p| p.to_string()).collect(),
            roles
                .iter()
                .map(|r| Role {
                    name: r.to_string(),
                    display_name: r.to_string(),
                })
                .collect(),
        );
        store
    }

    #[test]
    fn exact_match_grants() {
        let store = store_with(&["knowledge:view"], &[]);
        assert!(has_permission(&store, "knowledge:view"));
        assert!(!has_permission(&store, "knowledge:create"));
    }

    #[test]
    fn universal_wildcard_grants_everything() {
        let store = store_with(&["*:*"], &[]);
        assert!(has_permission(&store, "knowledge:view"));
        assert!(has_permission(&store, "vendors:delete"));
        assert!(has_permission(&store, "anything"));
        assert!(has_permission(&store, "a:b:c"));
    }

    #[test]
    fn resource_wildcard_grants_any_action_on_resource() {
        let store = store_with(&["knowledge:*"], &[]);
        assert!(has_permission(&store, "knowledge:view"));
        assert!(has_permission(&store, "knowledge:delete"));
        assert!(!has_permission(&store, "vendors:view"));
    }

    #[test]
    fn resource_prefix_is_everything_before_first_colon() {
        let store = store_with(&["knowledge:*"], &[]);
        // resource of "knowledge:candidates:review" is "knowledge"
        assert!(has_permission(&store, "knowledge:candidates:review"));

        let store = store_with(&["knowledge:candidates:*"], &[]);
        // resource of the query is still "knowledge", so this does NOT match
        assert!(!has_permission(&store, "knowledge:candidates:review"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let store = store_with(&["Knowledge:view"], &[]);
        assert!(!has_permission(&store, "knowledge:view"));
    }

    #[test]
    fn colonless_query_needs_exact_or_universal() {
        let store = store_with(&["dashboard"], &[]);
        assert!(has_permission(&store, "dashboard"));
        assert!(!has_permission(&store, "metrics"));
    }

    #[test]
    fn any_permission_or_semantics() {
        let store = store_with(&["knowledge:view"], &[]);
        assert!(has_any_permission(
            &store,
            &["knowledge:edit", "knowledge:view"]
        ));
        assert!(!has_any_permission(
            &store,
            &["knowledge:edit", "knowledge:delete"]
        ));
    }

    #[test]
    fn any_permission_empty_list_is_false() {
        let store = store_with(&["*:*"], &[]);
        assert!(!has_any_permission::<&str>(&store, &[]));
    }

    #[test]
    fn all_permissions_and_semantics() {
        let store = store_with(&["knowledge:view", "knowledge:edit"], &[]);
        assert!(has_all_permissions(
            &store,
            &["knowledge:view", "knowledge:edit"]
        ));
        assert!(!has_all_permissions(
            &store,
            &["knowledge:view", "knowledge:delete"]
        ));
    }

    #[test]
    fn all_permissions_empty_list_is_true() {
        let store = store_with(&[], &[]);
        assert!(has_all_permissions::<&str>(&store, &[]));
    }

    #[test]
    fn role_match_is_exact_on_name() {
        let store = store_with(&[], &["editor"]);
        assert!(has_role(&store, "editor"));
        assert!(!has_role(&store, "Editor"));
        assert!(!has_role(&store, "edit"));
    }

    #[test]
    fn super_admin_is_role_check_equivalent() {
        let admin = store_with(&[], &["super_admin"]);
        assert!(is_super_admin(&admin));
        assert_eq!(is_super_admin(&admin), has_role(&admin, SUPER_ADMIN_ROLE));

        let other = store_with(&[], &["editor"]);
        assert!(!is_super_admin(&other));
        assert_eq!(is_super_admin(&other), has_role(&other, SUPER_ADMIN_ROLE));
    }

    #[test]
    fn checks_reflect_live_store_not_a_snapshot() {
        let store = store_with(&[], &[]);
        assert!(!has_permission(&store, "knowledge:view"));

        store.set_grants(vec!["knowledge:view".into()], vec![]);
        assert!(has_permission(&store, "knowledge:view"));

        store.clear();
        assert!(!has_permission(&store, "knowledge:view"));
    }
}
