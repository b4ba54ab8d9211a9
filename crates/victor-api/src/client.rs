// Authenticated HTTP session for the Victor Smart-Kill API
//
// Wraps `reqwest::Client` with token acquisition and the single
// retry-on-401 interception. Composition, not subclassing: the wrapper
// owns a transport handle plus token state and exposes its own
// `request` method. Resource endpoints live in `api.rs`.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, info};
use url::Url;

use crate::error::Error;

/// Production endpoint of the Victor Smart-Kill cloud service.
pub const DEFAULT_BASE_URL: &str = "https://www.victorsmartkill.com";

const TOKEN_PATH: &str = "api-token-auth/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
    /// Bearer token, absent until the first successful authentication.
    /// Invalidated before every re-fetch attempt and on 401 interception.
    token: RwLock<Option<String>>,
}

/// An authenticated HTTP session against the Victor Smart-Kill API.
///
/// Cheaply cloneable; clones share the token and the connection pool.
/// One coordinator is expected to own one session exclusively -- token
/// reads and writes are still serialized behind a lock so a shared
/// session stays coherent.
#[derive(Clone)]
pub struct VictorClient {
    inner: Arc<ClientInner>,
}

impl VictorClient {
    /// Create a session against the production endpoint.
    ///
    /// Fails fast with [`Error::Validation`] when the username or
    /// password is empty -- never deferred to the first request.
    pub fn new(username: impl Into<String>, password: SecretString) -> Result<Self, Error> {
        let base_url = Url::parse(DEFAULT_BASE_URL)?;
        Self::with_base_url(username, password, base_url)
    }

    /// Create a session against a custom endpoint (tests, mirrors).
    pub fn with_base_url(
        username: impl Into<String>,
        password: SecretString,
        base_url: Url,
    ) -> Result<Self, Error> {
        let username = username.into();
        if username.is_empty() {
            return Err(Error::Validation {
                message: "username is required".into(),
            });
        }
        if password.expose_secret().is_empty() {
            return Err(Error::Validation {
                message: "password is required".into(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("victor-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Transport)?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                username,
                password,
                token: RwLock::new(None),
            }),
        })
    }

    /// The base URL this session talks to.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Whether this session currently holds a token.
    pub fn has_token(&self) -> bool {
        self.inner.token.read().expect("token lock poisoned").is_some()
    }

    /// Fetch a fresh token and store it in the session.
    ///
    /// Any previously held token is cleared before the attempt, so a
    /// failed fetch never leaves a stale token behind. A 400 or 401 from
    /// the token endpoint means the credentials themselves were rejected;
    /// other HTTP failures propagate unchanged.
    ///
    /// Hosts can call this directly as a credential probe before
    /// committing a configuration entry.
    pub async fn fetch_token(&self) -> Result<(), Error> {
        self.clear_token();

        let url = self.inner.base_url.join(TOKEN_PATH)?;
        let body = json!({
            "username": self.inner.username,
            "password": self.inner.password.expose_secret(),
        });

        debug!("fetching token at {}", url);

        let response = self
            .inner
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            return Err(Error::InvalidCredentials {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        let payload: serde_json::Value = response.json().await.map_err(Error::Transport)?;
        match payload.get("token").and_then(serde_json::Value::as_str) {
            Some(token) if !token.is_empty() => {
                *self.inner.token.write().expect("token lock poisoned") = Some(token.to_owned());
                info!("fetched API token");
                Ok(())
            }
            _ => Err(Error::UnexpectedResponse {
                message: "token endpoint response is missing `token`".into(),
            }),
        }
    }

    /// Issue an authenticated request. The sole outbound entry point.
    ///
    /// Fetches a token first if none is held. The `Authorization` header
    /// is merged into a copy of the caller's headers -- the caller's map
    /// is never mutated. A 401 response triggers exactly one token
    /// re-fetch and retry; a second 401 is handed back as-is.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        headers: Option<&HeaderMap>,
    ) -> Result<Response, Error> {
        if !self.has_token() {
            debug!("token is missing, fetching before first request");
            self.fetch_token().await?;
        }

        let response = self.send_authorized(method.clone(), path, headers).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        info!("unauthorized response, fetching token and retrying once");
        self.fetch_token().await?;
        self.send_authorized(method, path, headers).await
    }

    /// Convenience GET used by the resource client.
    pub async fn get(&self, path: &str) -> Result<Response, Error> {
        self.request(Method::GET, path, None).await
    }

    fn clear_token(&self) {
        *self.inner.token.write().expect("token lock poisoned") = None;
    }

    async fn send_authorized(
        &self,
        method: Method,
        path: &str,
        headers: Option<&HeaderMap>,
    ) -> Result<Response, Error> {
        // Relative paths resolve against the base URL; absolute resource
        // URLs from the API pass through unchanged.
        let url = self.inner.base_url.join(path)?;

        let token = self
            .inner
            .token
            .read()
            .expect("token lock poisoned")
            .clone()
            .ok_or_else(|| Error::UnexpectedResponse {
                message: "no token held for authorized request".into(),
            })?;

        let mut merged = headers.cloned().unwrap_or_default();
        let value = HeaderValue::from_str(&format!("Token {token}")).map_err(|_| {
            Error::UnexpectedResponse {
                message: "token contains characters invalid in a header".into(),
            }
        })?;
        merged.insert(AUTHORIZATION, value);

        debug!("{} {}", method, url);

        self.inner
            .http
            .request(method, url)
            .headers(merged)
            .send()
            .await
            .map_err(Error::Transport)
    }
}

/// Truncate a response body for error messages.
pub(crate) fn preview(body: &str) -> String {
    let cut = body
        .char_indices()
        .nth(200)
        .map_or(body.len(), |(index, _)| index);
    body[..cut].to_owned()
}
