//! HTTP client for the admin backend.
//!
//! Every outbound call goes through one middleware path:
//! - Request phase: attach `Authorization: Bearer <token>` when the
//!   session holds a token.
//! - Response phase: a 401 clears the session, removes the persisted
//!   token, and pushes the login route on the navigator. The error is
//!   still returned to the caller so call sites can show local error UI.
//!
//! Non-success responses are turned into [`ApiError::Status`] carrying
//! the backend's `{detail}` message when one is present.

pub mod endpoints;

use crate::auth::token_file::TokenFile;
use crate::error::ApiError;
use crate::router::{Navigator, LOGIN_PATH};
use crate::session::SessionStore;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Error body shape used by the backend for failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Client for the admin REST API with bearer/401 middleware applied.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    tokens: TokenFile,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Build a client against `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        session: Arc<SessionStore>,
        tokens: TokenFile,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            session,
            tokens,
            navigator,
        })
    }

    /// The session store this client reads tokens from (and clears on 401).
    pub(crate) fn session_store(&self) -> Arc<SessionStore> {
        Arc::clone(&self.session)
    }

    /// The persisted-token handle this client clears on 401.
    pub(crate) fn token_file(&self) -> TokenFile {
        self.tokens.clone()
    }

    /// Resolve a request path against the configured base URL.
    fn url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url.trim_end_matches('/'), path)
        }
    }

    /// Apply request middleware, send, and apply response middleware.
    async fn execute(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let builder = match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let resp = builder.send().await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            let detail = response_detail(resp, "unauthorized").await;
            tracing::warn!(detail = %detail, "backend rejected credentials; clearing session");
            self.session.clear();
            if let Err(err) = self.tokens.clear() {
                tracing::warn!(error = %err, "failed to remove persisted token");
            }
            self.navigator.push(LOGIN_PATH);
            return Err(ApiError::Unauthorized { detail });
        }

        Ok(resp)
    }

    /// Read a JSON body, mapping non-success statuses to `ApiError::Status`.
    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            let detail = response_detail(resp, "request failed").await;
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(resp.json().await?)
    }

    /// GET a JSON resource.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.execute(self.http.get(self.url(path))).await?;
        Self::read_json(resp).await
    }

    /// POST a JSON body, returning the JSON response.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resp = self
            .execute(self.http.post(self.url(path)).json(body))
            .await?;
        Self::read_json(resp).await
    }

    /// PUT a JSON body, returning the JSON response.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resp = self
            .execute(self.http.put(self.url(path)).json(body))
            .await?;
        Self::read_json(resp).await
    }

    /// DELETE a resource, returning the JSON response.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.execute(self.http.delete(self.url(path))).await?;
        Self::read_json(resp).await
    }
}

/// Pull the backend `{detail}` message out of an error response, falling
/// back to the raw body, then to `fallback`.
async fn response_detail(resp: reqwest::Response, fallback: &str) -> String {
    let text = resp.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.detail,
        Err(_) if text.trim().is_empty() => fallback.to_string(),
        Err(_) => text,
    }
}
