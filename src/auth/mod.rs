//! Authentication against the admin backend.
//!
//! Provides:
//! - [`AuthService`]: login/logout, profile and grant refresh, and
//!   startup restore of a persisted session
//! - [`TokenFile`]: the single durable key holding the bearer token
//!
//! The service is the sole writer of the session store (alongside the
//! 401 interceptor in the HTTP client). Grant refreshes are deliberately
//! non-fatal: a failed permission fetch logs a warning and keeps the
//! session usable rather than blocking a successful login.

pub mod service;
pub mod token_file;

pub use service::{AuthService, LoginResponse};
pub use token_file::TokenFile;
