//! Error taxonomy for the console client core.
//!
//! Two layers:
//! - [`ApiError`]: transport-level failures from the HTTP client
//!   (network errors, non-success statuses, intercepted 401s).
//! - [`AuthError`]: authentication-level failures surfaced to callers of
//!   the auth service (bad credentials, invalidated sessions).
//!
//! Permission-fetch failures deliberately have no exported error type:
//! the auth service swallows them so a failed grant refresh never blocks
//! an otherwise-successful login or page load.

use thiserror::Error;

/// Failure of an outbound call to the admin backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered 401. The client has already cleared the
    /// session and issued the login redirect; the error is still returned
    /// so call sites can show local error UI.
    #[error("unauthorized: {detail}")]
    Unauthorized {
        /// Backend-supplied `detail` message, or a generic fallback.
        detail: String,
    },

    /// Any other non-success response.
    #[error("request failed ({status}): {detail}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Backend-supplied `detail` message, or the raw body.
        detail: String,
    },

    /// Network / transport failure before a status was received.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// The user-facing message for this failure (the backend `detail`
    /// where one was supplied).
    pub fn detail(&self) -> String {
        match self {
            Self::Unauthorized { detail } | Self::Status { detail, .. } => detail.clone(),
            Self::Transport(err) => err.to_string(),
        }
    }
}

/// Failure of an auth-service operation.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login rejected or session invalidated. The message is the
    /// backend-supplied `detail`, else a generic fallback.
    #[error("{0}")]
    Authentication(String),

    /// An operation that needs a bearer token was called without one.
    #[error("not logged in")]
    MissingToken,

    /// Transport-level failure, passed through to the caller unchanged.
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_error_displays_backend_detail_verbatim() {
        let err = AuthError::Authentication("invalid credentials".into());
        assert_eq!(err.to_string(), "invalid credentials");
    }

    #[test]
    fn status_error_carries_code_and_detail() {
        let err = ApiError::Status {
            status: 422,
            detail: "missing field".into(),
        };
        assert_eq!(err.to_string(), "request failed (422): missing field");
        assert_eq!(err.detail(), "missing field");
    }

    #[test]
    fn unauthorized_detail_is_extractable() {
        let err = ApiError::Unauthorized {
            detail: "token expired".into(),
        };
        assert_eq!(err.detail(), "token expired");
    }
}
