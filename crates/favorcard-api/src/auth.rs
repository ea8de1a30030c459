// Account endpoints
//
// Login and registration are the only unauthenticated calls. Both return
// a bearer token which is installed on the client before returning, so
// subsequent calls are authenticated without further plumbing.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ApiUser, AuthResponse, MessageResponse, UsersResponse};

impl ApiClient {
    /// Authenticate with username/password.
    ///
    /// `POST /api/login` with `{"username", "password"}`. Any non-2xx
    /// answer is reported as [`Error::Authentication`].
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<AuthResponse, Error> {
        let url = self.api_url("login")?;
        debug!(username, "logging in");

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let auth: AuthResponse = self
            .post_public(url, &body)
            .await
            .map_err(into_auth_error)?;

        self.set_token(SecretString::from(auth.token.clone()));
        info!(username, "login successful");
        Ok(auth)
    }

    /// Create an account and log in as it.
    ///
    /// `POST /api/register` with `{"username", "email", "nickname", "password"}`.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        nickname: Option<&str>,
        password: &SecretString,
    ) -> Result<AuthResponse, Error> {
        let url = self.api_url("register")?;
        debug!(username, email, "registering account");

        let body = json!({
            "username": username,
            "email": email,
            "nickname": nickname.unwrap_or_default(),
            "password": password.expose_secret(),
        });

        let auth: AuthResponse = self.post_public(url, &body).await?;
        self.set_token(SecretString::from(auth.token.clone()));
        info!(username, "registration successful");
        Ok(auth)
    }

    /// The authenticated user's profile.
    ///
    /// `GET /api/profile` (bare user object).
    pub async fn profile(&self) -> Result<ApiUser, Error> {
        let url = self.api_url("profile")?;
        self.get(url).await
    }

    /// Update profile fields.
    ///
    /// `POST /api/user/{id}/update` with `{"user": {...}}`. The server
    /// applies non-empty fields only.
    pub async fn update_profile(&self, user: &ApiUser) -> Result<MessageResponse, Error> {
        let id = user.id.as_deref().ok_or_else(|| Error::Api {
            status: 400,
            message: "user id is required".into(),
        })?;
        let url = self.api_url(&format!("user/{id}/update"))?;
        debug!(id, "updating profile");
        self.post(url, Some(&json!({ "user": user }))).await
    }

    /// Search all users by username or nickname.
    ///
    /// `GET /api/users/search?q=...` (at most 10 results server-side).
    pub async fn search_users(&self, query: &str) -> Result<Vec<ApiUser>, Error> {
        let mut url = self.api_url("users/search")?;
        url.query_pairs_mut().append_pair("q", query);
        debug!(query, "searching users");
        let resp: UsersResponse = self.get(url).await?;
        Ok(resp.users)
    }
}

/// Login failures of any kind surface as authentication errors.
fn into_auth_error(err: Error) -> Error {
    match err {
        Error::Api { status, message } => Error::Authentication {
            message: format!("login failed (HTTP {status}): {message}"),
        },
        other => other,
    }
}
