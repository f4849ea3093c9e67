//! Render-time capability gate for UI elements.
//!
//! A [`PermissionCheck`] describes what a UI element needs: one
//! permission, any of a list, or all of a list. The renderer evaluates
//! [`allows`] on every render pass and skips elements whose check fails.
//! Because the check is a pure function over the live session store,
//! elements reappear automatically when grants change; there is no
//! remove-once-and-forget step.

use super::{has_all_permissions, has_any_permission, has_permission};
use crate::session::SessionStore;
use serde::{Deserialize, Serialize};

/// Declarative permission requirement attached to a UI element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionCheck {
    /// A single permission string.
    Single(String),
    /// At least one of the listed permissions (OR).
    AnyOf(Vec<String>),
    /// Every one of the listed permissions (AND).
    AllOf {
        /// The required permissions.
        all: Vec<String>,
    },
}

impl PermissionCheck {
    /// Convenience constructor for the single-permission form.
    pub fn single(permission: impl Into<String>) -> Self {
        Self::Single(permission.into())
    }

    /// Convenience constructor for the OR form.
    pub fn any_of<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyOf(permissions.into_iter().map(Into::into).collect())
    }

    /// Convenience constructor for the AND form.
    pub fn all_of<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AllOf {
            all: permissions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Evaluate a check against the current session grants.
pub fn allows(store: &SessionStore, check: &PermissionCheck) -> bool {
    match check {
        PermissionCheck::Single(permission) => has_permission(store, permission),
        PermissionCheck::AnyOf(permissions) => has_any_permission(store, permissions),
        PermissionCheck::AllOf { all } => has_all_permissions(store, all),
    }
}
