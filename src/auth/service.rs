//! Auth service: session-mutating operations over the backend.
//!
//! Operation semantics:
//! - `login` stores token + profile, persists the token, then fetches
//!   grants; a rejected login surfaces the backend's `detail` message.
//! - `logout` clears everything, locally only; it cannot fail.
//! - `fetch_current_user` treats any failure as an invalid session and
//!   cascades into `logout`.
//! - `fetch_user_permissions` swallows failures (warn log) so a broken
//!   grants endpoint never blocks an otherwise-working session.
//! - `initialize` restores a persisted token at startup and revalidates
//!   it against the backend.
//!
//! These are the only state-mutating operations in the crate besides the
//! 401 interceptor. They are not designed for concurrent invocation on
//! one session; overlapping calls race on the shared fields and the last
//! completion wins.

use crate::api::{endpoints, ApiClient};
use crate::auth::token_file::TokenFile;
use crate::error::{ApiError, AuthError};
use crate::session::{Role, SessionStore, UserProfile};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Fallback message when the backend gives no `detail` for a login
/// rejection.
const LOGIN_FAILED_MSG: &str = "login failed";

/// Body of `POST /api/auth/login`.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Successful response of `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// Always `bearer`; kept for contract completeness.
    #[serde(default)]
    pub token_type: String,
    /// Profile of the authenticated admin.
    pub user: UserProfile,
}

/// Response of `GET /api/auth/permissions`.
#[derive(Debug, Clone, Default, Deserialize)]
struct PermissionGrants {
    #[serde(default)]
    permissions: Vec<String>,
    #[serde(default)]
    roles: Vec<Role>,
}

/// Owner of all authentication flows.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    session: Arc<SessionStore>,
    tokens: TokenFile,
}

impl AuthService {
    /// Wire a service to the given client. Session store and token file
    /// are shared with the client so the 401 interceptor and the service
    /// always act on the same state.
    pub fn new(api: ApiClient) -> Self {
        let session = api.session_store();
        let tokens = api.token_file();
        Self {
            api,
            session,
            tokens,
        }
    }

    /// The session store this service mutates.
    pub fn session(&self) -> Arc<SessionStore> {
        Arc::clone(&self.session)
    }

    /// Authenticate with the backend and populate the session.
    ///
    /// On success the token is persisted and grants are fetched
    /// immediately. On rejection the session is left unauthenticated and
    /// the error carries the backend's message.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse, AuthError> {
        self.session.set_loading(true);
        self.session.set_error(None);

        let result = self.login_inner(username, password).await;

        if let Err(err) = &result {
            self.session.set_error(Some(err.to_string()));
        }
        self.session.set_loading(false);
        result
    }

    async fn login_inner(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse, AuthError> {
        let body = LoginRequest { username, password };
        let resp: LoginResponse = self
            .api
            .post(endpoints::AUTH_LOGIN, &body)
            .await
            .map_err(|err| match err {
                ApiError::Unauthorized { detail } | ApiError::Status { detail, .. } => {
                    let msg = if detail.trim().is_empty() {
                        LOGIN_FAILED_MSG.to_string()
                    } else {
                        detail
                    };
                    AuthError::Authentication(msg)
                }
                transport => AuthError::Api(transport),
            })?;

        self.session
            .set_login(resp.access_token.clone(), resp.user.clone());
        if let Err(err) = self.tokens.save(&resp.access_token) {
            tracing::warn!(error = %err, "failed to persist token; session will not survive restart");
        }
        tracing::info!(username = %resp.user.username, "logged in");

        // Grants load right after login; a failure here must not undo
        // the successful authentication.
        self.fetch_user_permissions().await;

        Ok(resp)
    }

    /// Clear the session and the persisted token. Local-only; never fails.
    pub fn logout(&self) {
        self.session.clear();
        if let Err(err) = self.tokens.clear() {
            tracing::warn!(error = %err, "failed to remove persisted token");
        }
        tracing::debug!("session cleared");
    }

    /// Refresh the user profile from the backend.
    ///
    /// Any failure means the token is no longer good: the session is
    /// logged out before the error is returned.
    pub async fn fetch_current_user(&self) -> Result<UserProfile, AuthError> {
        if self.session.token().is_none() {
            return Err(AuthError::MissingToken);
        }

        self.session.set_loading(true);
        let result = self.api.get::<UserProfile>(endpoints::AUTH_ME).await;
        self.session.set_loading(false);

        match result {
            Ok(user) => {
                self.session.set_user(user.clone());
                Ok(user)
            }
            Err(err) => {
                let msg = err.detail();
                self.logout();
                self.session.set_error(Some(msg.clone()));
                Err(AuthError::Authentication(msg))
            }
        }
    }

    /// Refresh the permission and role sets from the backend.
    ///
    /// No-op without a token. Failures are logged and swallowed: a grant
    /// refresh must never take down a working session.
    pub async fn fetch_user_permissions(&self) {
        if self.session.token().is_none() {
            return;
        }

        match self
            .api
            .get::<PermissionGrants>(endpoints::AUTH_PERMISSIONS)
            .await
        {
            Ok(grants) => {
                tracing::debug!(
                    permissions = grants.permissions.len(),
                    roles = grants.roles.len(),
                    "grants refreshed"
                );
                self.session.set_grants(grants.permissions, grants.roles);
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to refresh grants; keeping previous set");
            }
        }
    }

    /// Restore a persisted session at process start.
    ///
    /// If a token file exists, adopt the token and revalidate it by
    /// fetching the profile and grants. A rejected token leaves the
    /// session cleared (via the logout cascade in `fetch_current_user`).
    pub async fn initialize(&self) {
        let Some(token) = self.tokens.load() else {
            return;
        };
        self.session.restore_token(token);

        match self.fetch_current_user().await {
            Ok(_) => self.fetch_user_permissions().await,
            Err(err) => {
                tracing::warn!(error = %err, "stored token rejected during startup");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::{Navigator, RecordingNavigator};
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Harness {
        _tmp: TempDir,
        auth: AuthService,
        session: Arc<SessionStore>,
        tokens: TokenFile,
        navigator: Arc<RecordingNavigator>,
    }

    fn harness(base_url: &str) -> Harness {
        let tmp = TempDir::new().unwrap();
        let tokens = TokenFile::new(tmp.path().join("auth_token"));
        let session = Arc::new(SessionStore::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let api = ApiClient::new(
            base_url,
            Arc::clone(&session),
            tokens.clone(),
            Arc::clone(&navigator) as Arc<dyn Navigator>,
        )
        .unwrap();
        Harness {
            _tmp: tmp,
            auth: AuthService::new(api),
            session,
            tokens,
            navigator,
        }
    }

    fn profile_json() -> serde_json::Value {
        json!({
            "id": 1,
            "username": "alice",
            "email": "alice@example.test",
            "full_name": "Alice",
            "is_active": true
        })
    }

    fn grants_json() -> serde_json::Value {
        json!({
            "permissions": ["knowledge:view", "knowledge:create"],
            "roles": [{"name": "editor", "display_name": "Editor"}]
        })
    }

    async fn mount_login_ok(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({"username": "alice", "password": "s3cret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok-live",
                "token_type": "bearer",
                "user": profile_json()
            })))
            .mount(server)
            .await;
    }

    async fn mount_permissions_ok(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/auth/permissions"))
            .and(header("Authorization", "Bearer tok-live"))
            .respond_with(ResponseTemplate::new(200).set_body_json(grants_json()))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn login_stores_token_profile_and_grants() {
        let server = MockServer::start().await;
        mount_login_ok(&server).await;
        mount_permissions_ok(&server).await;
        let h = harness(&server.uri());

        let resp = h.auth.login("alice", "s3cret").await.unwrap();

        assert_eq!(resp.access_token, "tok-live");
        assert!(h.session.is_authenticated());
        assert_eq!(h.session.user().unwrap().username, "alice");
        assert!(h.session.permissions().contains("knowledge:view"));
        assert_eq!(h.session.roles()[0].name, "editor");
        // Token was written to durable storage.
        assert_eq!(h.tokens.load().as_deref(), Some("tok-live"));
        assert!(!h.session.loading());
        assert!(h.session.last_error().is_none());
    }

    #[tokio::test]
    async fn login_rejection_surfaces_backend_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"detail": "invalid credentials"})),
            )
            .mount(&server)
            .await;
        let h = harness(&server.uri());

        let err = h.auth.login("alice", "wrong").await.unwrap_err();

        assert_eq!(err.to_string(), "invalid credentials");
        assert!(!h.session.is_authenticated());
        assert!(h.tokens.load().is_none());
        assert_eq!(h.session.last_error().as_deref(), Some("invalid credentials"));
        assert!(!h.session.loading());
    }

    #[tokio::test]
    async fn login_survives_grant_fetch_failure() {
        let server = MockServer::start().await;
        mount_login_ok(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/auth/permissions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;
        let h = harness(&server.uri());

        // The grant fetch fails but the login itself must succeed.
        h.auth.login("alice", "s3cret").await.unwrap();

        assert!(h.session.is_authenticated());
        assert!(h.session.permissions().is_empty());
    }

    #[tokio::test]
    async fn logout_clears_session_and_persisted_token() {
        let server = MockServer::start().await;
        mount_login_ok(&server).await;
        mount_permissions_ok(&server).await;
        let h = harness(&server.uri());
        h.auth.login("alice", "s3cret").await.unwrap();

        h.auth.logout();

        assert!(!h.session.is_authenticated());
        assert!(h.session.user().is_none());
        assert!(h.session.permissions().is_empty());
        assert!(h.session.roles().is_empty());
        assert!(h.tokens.load().is_none());
    }

    #[tokio::test]
    async fn fetch_current_user_without_token_is_missing_token() {
        let server = MockServer::start().await;
        let h = harness(&server.uri());

        let err = h.auth.fetch_current_user().await.unwrap_err();
        assert!(matches!(err, AuthError::MissingToken));
    }

    #[tokio::test]
    async fn fetch_current_user_failure_cascades_into_logout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"detail": "token expired"})),
            )
            .mount(&server)
            .await;
        let h = harness(&server.uri());
        h.session.restore_token("stale".into());
        h.tokens.save("stale").unwrap();

        let err = h.auth.fetch_current_user().await.unwrap_err();

        assert!(matches!(err, AuthError::Authentication(_)));
        assert!(!h.session.is_authenticated());
        assert!(h.tokens.load().is_none());
        // The 401 interceptor issued the login redirect.
        assert_eq!(h.navigator.targets(), vec!["/login".to_string()]);
    }

    #[tokio::test]
    async fn fetch_user_permissions_is_a_noop_without_token() {
        let server = MockServer::start().await;
        let h = harness(&server.uri());

        // No mock mounted: a request would fail loudly. The call must
        // not make one.
        h.auth.fetch_user_permissions().await;
        assert!(h.session.permissions().is_empty());
    }

    #[tokio::test]
    async fn fetch_user_permissions_failure_keeps_previous_grants() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/permissions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;
        let h = harness(&server.uri());
        h.session.restore_token("tok-live".into());
        h.session.set_grants(vec!["knowledge:view".into()], vec![]);

        h.auth.fetch_user_permissions().await;

        // Swallowed failure, previous grants intact.
        assert!(h.session.permissions().contains("knowledge:view"));
    }

    #[tokio::test]
    async fn initialize_restores_persisted_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .and(header("Authorization", "Bearer tok-live"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
            .mount(&server)
            .await;
        mount_permissions_ok(&server).await;
        let h = harness(&server.uri());
        h.tokens.save("tok-live").unwrap();

        h.auth.initialize().await;

        assert!(h.session.is_authenticated());
        assert_eq!(h.session.user().unwrap().username, "alice");
        assert!(h.session.permissions().contains("knowledge:create"));
    }

    #[tokio::test]
    async fn initialize_with_rejected_token_leaves_session_cleared() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"detail": "token expired"})),
            )
            .mount(&server)
            .await;
        let h = harness(&server.uri());
        h.tokens.save("stale").unwrap();

        h.auth.initialize().await;

        assert!(!h.session.is_authenticated());
        assert!(h.tokens.load().is_none());
    }

    #[tokio::test]
    async fn initialize_without_persisted_token_does_nothing() {
        let server = MockServer::start().await;
        let h = harness(&server.uri());

        h.auth.initialize().await;

        assert!(!h.session.is_authenticated());
    }
}
