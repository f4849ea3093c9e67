//! Client core for the knowledge-base administration console.
//!
//! The console manages Q&A knowledge entries, intents, vendors, SOP
//! templates, and test scenarios for a RAG chat backend. This crate owns
//! the pieces every screen depends on:
//!
//! - [`session::SessionStore`]: the authenticated session (token, user
//!   profile, permission/role sets), mutated only through the auth
//!   service and the 401 interceptor
//! - [`rbac`]: permission and role queries with `*:*` / `resource:*`
//!   wildcard support, plus the render-time capability gate
//! - [`auth::AuthService`]: login, logout, profile and grant refresh,
//!   and startup restore of a persisted token
//! - [`router`]: the route table with per-route access requirements and
//!   the navigation guard
//! - [`api::ApiClient`]: the single outbound middleware path, attaching
//!   the bearer token on every request and intercepting 401 responses
//!
//! View rendering, form validation, and import parsing live elsewhere;
//! they consume this crate through the accessors and the guard.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod rbac;
pub mod router;
pub mod session;

pub use api::ApiClient;
pub use auth::{AuthService, TokenFile};
pub use config::ConsoleConfig;
pub use error::{ApiError, AuthError};
pub use rbac::gate::PermissionCheck;
pub use router::guard::{GuardDecision, RouteGuard};
pub use router::{Navigator, RouteMeta, RouteTable};
pub use session::{Role, SessionStore, UserProfile};
