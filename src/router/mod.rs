//! Console route table and navigation-layer contracts.
//!
//! Each navigable route carries a [`RouteMeta`] consumed by the guard:
//! whether authentication is required (default: yes), and optional
//! permission / role requirements (OR semantics within each list).
//!
//! The [`Navigator`] trait is the seam to the embedding shell: the guard
//! and the HTTP client express redirects through it so the rest of the
//! core stays free of any UI framework.

pub mod guard;

use serde::{Deserialize, Serialize};

/// Path of the login screen.
pub const LOGIN_PATH: &str = "/login";

/// Path of the console home screen (knowledge overview).
pub const HOME_PATH: &str = "/";

// ── Navigation seam ─────────────────────────────────────────────────

/// Receiver for navigation pushes issued by the core.
///
/// Implementations decide what "navigate" means: a SPA shell changes the
/// view, the CLI prints where it would have gone, tests record targets.
pub trait Navigator: Send + Sync {
    /// Navigate to `target` (a console path, possibly with a query).
    fn push(&self, target: &str);
}

/// Navigator that remembers every pushed target.
///
/// Used by tests; also handy for embedding shells that batch navigation.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    targets: parking_lot::Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Targets pushed so far, oldest first.
    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, target: &str) {
        self.targets.lock().push(target.to_string());
    }
}

// ── Route metadata ──────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

/// Declarative access requirements attached to a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMeta {
    /// Whether the route needs an authenticated session. Defaults to
    /// true; only explicitly public routes opt out.
    #[serde(default = "default_true")]
    pub requires_auth: bool,
    /// Permission strings, any one of which admits the user.
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Role names, any one of which admits the user.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Default for RouteMeta {
    fn default() -> Self {
        Self {
            requires_auth: true,
            permissions: Vec::new(),
            roles: Vec::new(),
        }
    }
}

impl RouteMeta {
    /// Authenticated route with no further requirements.
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// Route reachable without a session.
    pub fn public() -> Self {
        Self {
            requires_auth: false,
            ..Self::default()
        }
    }

    /// Authenticated route admitting any of the given permissions.
    pub fn with_permissions<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Authenticated route admitting any of the given roles.
    pub fn with_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

// ── Route table ─────────────────────────────────────────────────────

/// A navigable console route.
#[derive(Debug, Clone)]
pub struct Route {
    /// Path pattern; `:name` segments match any non-empty value.
    pub path: &'static str,
    /// Stable route name.
    pub name: &'static str,
    /// Access requirements.
    pub meta: RouteMeta,
}

/// The console's route registry.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build the standard admin-console route set.
    pub fn console() -> Self {
        let routes = vec![
            Route {
                path: "/login",
                name: "Login",
                meta: RouteMeta::public(),
            },
            Route {
                path: "/",
                name: "Knowledge",
                meta: RouteMeta::with_permissions(["knowledge:view"]),
            },
            Route {
                path: "/intents",
                name: "Intents",
                meta: RouteMeta::with_permissions(["intents:view"]),
            },
            Route {
                path: "/suggested-intents",
                name: "SuggestedIntents",
                meta: RouteMeta::with_permissions(["intents:view"]),
            },
            Route {
                path: "/business-scope",
                name: "BusinessScope",
                meta: RouteMeta::with_permissions(["business_scope:view"]),
            },
            Route {
                path: "/knowledge-reclassify",
                name: "KnowledgeReclassify",
                meta: RouteMeta::with_permissions(["knowledge:edit"]),
            },
            Route {
                path: "/knowledge-import",
                name: "KnowledgeImport",
                meta: RouteMeta::with_permissions(["knowledge:create"]),
            },
            Route {
                path: "/vendors",
                name: "Vendors",
                meta: RouteMeta::with_permissions(["vendors:view"]),
            },
            Route {
                path: "/vendors/:id/configs",
                name: "VendorConfig",
                meta: RouteMeta::with_permissions(["vendors:view"]),
            },
            // Public demo console: exercisable without a session.
            Route {
                path: "/chat-test",
                name: "ChatTest",
                meta: RouteMeta::public(),
            },
            Route {
                path: "/backtest",
                name: "Backtest",
                meta: RouteMeta::with_permissions(["backtest:view"]),
            },
            Route {
                path: "/roles",
                name: "Roles",
                meta: RouteMeta::with_permissions(["roles:view"]),
            },
            Route {
                path: "/admins",
                name: "Admins",
                meta: RouteMeta::with_roles(["super_admin"]),
            },
        ];
        Self { routes }
    }

    /// Build a table from an explicit route list (tests, embedders).
    pub fn with_routes(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Find the route matching `path`, honoring `:param` segments.
    pub fn find(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| path_matches(route.path, path))
    }
}

/// Match a concrete path against a pattern with `:param` segments.
fn path_matches(pattern: &str, path: &str) -> bool {
    // Strip any query string before matching.
    let path = path.split('?').next().unwrap_or(path);
    let mut pattern_segs = pattern.trim_end_matches('/').split('/');
    let mut path_segs = path.trim_end_matches('/').split('/');
    loop {
        match (pattern_segs.next(), path_segs.next()) {
            (None, None) => return true,
            (Some(p), Some(s)) => {
                if p.starts_with(':') {
                    if s.is_empty() {
                        return false;
                    }
                } else if p != s {
                    return false;
                }
            }
            _ => return false,
        }
    }
}
