// favorcard HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer-token injection
// and error-body decoding. Endpoint groups (auth, cards, friends) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use std::sync::RwLock;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::ErrorBody;
use crate::transport::TransportConfig;

/// Default friends endpoint prefix, relative to `/api/`.
pub const DEFAULT_FRIENDS_PATH: &str = "users/friends";

/// Raw HTTP client for the favorcard REST API.
///
/// Authenticated calls carry `Authorization: Bearer <token>`. The token is
/// set after login/register (or restored from a session store) and can be
/// swapped at any time; the client itself never persists it.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    friends_path: String,
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the server root (e.g. `https://cards.example.com`);
    /// the `/api/` prefix is appended per request.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            friends_path: DEFAULT_FRIENDS_PATH.to_owned(),
            token: RwLock::new(None),
        }
    }

    /// Override the friends endpoint prefix (e.g. `"friends"`).
    pub fn with_friends_path(mut self, path: impl Into<String>) -> Self {
        self.friends_path = path.into().trim_matches('/').to_owned();
        self
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn friends_path(&self) -> &str {
        &self.friends_path
    }

    // ── Token management ─────────────────────────────────────────────

    /// Install the bearer token used for authenticated calls.
    pub fn set_token(&self, token: SecretString) {
        debug!("storing session token");
        *self.token.write().expect("token lock poisoned") = Some(token);
    }

    /// Forget the bearer token.
    pub fn clear_token(&self) {
        *self.token.write().expect("token lock poisoned") = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    /// Apply the stored token to a request builder, failing if absent.
    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, Error> {
        let guard = self.token.read().expect("token lock poisoned");
        match guard.as_ref() {
            Some(token) => Ok(builder.bearer_auth(token.expose_secret())),
            None => Err(Error::NotAuthenticated),
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Authenticated GET.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let builder = self.apply_auth(self.http.get(url))?;
        let resp = builder.send().await?;
        self.parse_response(resp).await
    }

    /// Authenticated POST with an optional JSON body.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let mut builder = self.apply_auth(self.http.post(url))?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let resp = builder.send().await?;
        self.parse_response(resp).await
    }

    /// Unauthenticated POST (login, register).
    pub(crate) async fn post_public<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {} (public)", url);
        let resp = self.http.post(url).json(body).send().await?;
        self.parse_response(resp).await
    }

    /// Map status codes to errors and decode the JSON body on success.
    async fn parse_response<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await?;
        trace!(%status, len = body.len(), "response received");

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: error_message(&body).unwrap_or_else(|| "session expired or invalid".into()),
            });
        }

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: error_message(&body)
                    .unwrap_or_else(|| format!("HTTP {status}: {}", preview(&body))),
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })
    }
}

/// Extract the server's error text from an error body, if it has one.
fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .error
        .or(parsed.message)
        .filter(|m| !m.trim().is_empty())
}

fn preview(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map_or(body.len(), |(idx, _)| idx);
    &body[..end]
}
