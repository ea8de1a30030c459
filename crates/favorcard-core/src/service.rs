// ── Card service ──
//
// The one object a front-end talks to. Owns the API client, the session
// store and the viewer's username. Every mutation is followed by a full
// reload of the list it affected, and the tiles are recomputed from
// scratch over that list.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;
use tracing::{debug, info, warn};

use favorcard_api::ApiClient;
use favorcard_api::models::CreateCardRequest;

use crate::error::CoreError;
use crate::model::{CardRecord, CardStatus, Friend, FriendCandidate, UserProfile};
use crate::session::SessionStore;
use crate::view::{self, CardTile};

/// Shortest accepted friend search query.
pub const MIN_SEARCH_LEN: usize = 2;

// ── Inputs / outputs ────────────────────────────────────────────────

/// Fields for a new card.
#[derive(Debug, Clone)]
pub struct NewCard {
    pub title: String,
    pub description: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Profile fields to change. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub nickname: Option<String>,
    pub email: Option<String>,
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardStats {
    pub created: usize,
    pub received: usize,
    /// Used cards across both lists.
    pub used: usize,
}

impl CardStats {
    pub fn from_lists(created: &[CardRecord], received: &[CardRecord]) -> Self {
        let used = created
            .iter()
            .chain(received)
            .filter(|c| c.status == CardStatus::Used)
            .count();
        Self {
            created: created.len(),
            received: received.len(),
            used,
        }
    }
}

// ── Service ─────────────────────────────────────────────────────────

pub struct CardService<S: SessionStore> {
    api: ApiClient,
    session: S,
    viewer: RwLock<Option<String>>,
}

impl<S: SessionStore> CardService<S> {
    /// Wrap `api`, restoring any saved token from `session`.
    ///
    /// An unreadable store counts as "not logged in": commands that need
    /// no session (login, register) must still work without one.
    pub fn new(api: ApiClient, session: S) -> Self {
        match session.get() {
            Ok(Some(token)) => {
                debug!("restoring saved session token");
                api.set_token(token);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "could not read saved session, continuing without it"),
        }
        Self {
            api,
            session,
            viewer: RwLock::new(None),
        }
    }

    /// Pre-seed the viewer's username (skips a profile fetch).
    pub fn with_viewer(self, username: impl Into<String>) -> Self {
        self.set_viewer(Some(username.into()));
        self
    }

    pub fn is_logged_in(&self) -> bool {
        self.api.has_token()
    }

    // ── Viewer ───────────────────────────────────────────────────────

    fn cached_viewer(&self) -> Option<String> {
        self.viewer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_viewer(&self, username: Option<String>) {
        *self.viewer.write().unwrap_or_else(PoisonError::into_inner) = username;
    }

    /// The authenticated username, fetched once and cached.
    pub async fn viewer(&self) -> Result<String, CoreError> {
        if let Some(name) = self.cached_viewer() {
            return Ok(name);
        }
        let profile = self.profile().await?;
        Ok(profile.username)
    }

    /// Save a freshly issued token. The client already holds it, so a
    /// store failure only costs persistence across runs.
    fn persist(&self, token: String) {
        if let Err(e) = self.session.set(&SecretString::from(token)) {
            warn!(error = %e, "could not save session token; it lasts for this run only");
        }
    }

    /// Translate an API error, dropping the saved session on auth failure.
    fn fail(&self, err: favorcard_api::Error) -> CoreError {
        let err = CoreError::from(err);
        if matches!(err, CoreError::AuthenticationFailed { .. }) {
            warn!("server rejected the session token, clearing it");
            self.api.clear_token();
            self.set_viewer(None);
            if let Err(e) = self.session.clear() {
                warn!(error = %e, "failed to clear saved session");
            }
        }
        err
    }

    // ── Account ──────────────────────────────────────────────────────

    /// Log in and persist the session token.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<UserProfile, CoreError> {
        let auth = self.api.login(username, password).await?;
        self.persist(auth.token);

        let mut user = auth.user;
        if user.username.is_empty() {
            username.clone_into(&mut user.username);
        }
        self.set_viewer(Some(user.username.clone()));
        info!(username = %user.username, "logged in");
        Ok(UserProfile::from(user))
    }

    /// Create an account and log in as it.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        nickname: Option<&str>,
        password: &SecretString,
    ) -> Result<UserProfile, CoreError> {
        if username.trim().is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "username must not be empty".into(),
            });
        }
        validate_email(email)?;

        let auth = self.api.register(username, email, nickname, password).await?;
        self.persist(auth.token);

        let mut user = auth.user;
        if user.username.is_empty() {
            username.clone_into(&mut user.username);
        }
        self.set_viewer(Some(user.username.clone()));
        info!(username = %user.username, "registered");
        Ok(UserProfile::from(user))
    }

    /// Forget the session locally. The server keeps no session state.
    pub fn logout(&self) -> Result<(), CoreError> {
        self.api.clear_token();
        self.set_viewer(None);
        self.session.clear()?;
        info!("logged out");
        Ok(())
    }

    pub async fn profile(&self) -> Result<UserProfile, CoreError> {
        let user = self.api.profile().await.map_err(|e| self.fail(e))?;
        self.set_viewer(Some(user.username.clone()));
        Ok(UserProfile::from(user))
    }

    /// Change nickname and/or email, returning the refreshed profile.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<UserProfile, CoreError> {
        let current = self.api.profile().await.map_err(|e| self.fail(e))?;
        let mut next = current.clone();

        if let Some(email) = update.email {
            let email = email.trim();
            validate_email(email)?;
            if current.email.as_deref() == Some(email) {
                return Err(CoreError::ValidationFailed {
                    message: "new email is the same as the current one".into(),
                });
            }
            next.email = Some(email.to_owned());
        }

        if let Some(nickname) = update.nickname {
            let nickname = nickname.trim();
            if nickname.is_empty() {
                return Err(CoreError::ValidationFailed {
                    message: "nickname must not be empty".into(),
                });
            }
            next.nickname = Some(nickname.to_owned());
        }

        if next == current {
            return Err(CoreError::ValidationFailed {
                message: "nothing to update".into(),
            });
        }

        self.api
            .update_profile(&next)
            .await
            .map_err(|e| self.fail(e))?;
        self.profile().await
    }

    // ── Cards ────────────────────────────────────────────────────────

    /// Cards the viewer created, as the server returns them.
    pub async fn created_records(&self) -> Result<Vec<CardRecord>, CoreError> {
        let cards = self.api.list_created_cards().await.map_err(|e| self.fail(e))?;
        Ok(cards.into_iter().map(CardRecord::from).collect())
    }

    /// Cards the viewer received from others.
    pub async fn received_records(&self) -> Result<Vec<CardRecord>, CoreError> {
        let cards = self
            .api
            .list_received_cards()
            .await
            .map_err(|e| self.fail(e))?;
        Ok(cards.into_iter().map(CardRecord::from).collect())
    }

    pub async fn created(&self, now: DateTime<Utc>) -> Result<Vec<CardTile>, CoreError> {
        let records = self.created_records().await?;
        let viewer = self.viewer().await?;
        Ok(view::tiles(&records, &viewer, now))
    }

    pub async fn received(&self, now: DateTime<Utc>) -> Result<Vec<CardTile>, CoreError> {
        let records = self.received_records().await?;
        let viewer = self.viewer().await?;
        Ok(view::tiles(&records, &viewer, now))
    }

    /// Create a card and return the refreshed created list.
    pub async fn create(
        &self,
        card: NewCard,
        now: DateTime<Utc>,
    ) -> Result<Vec<CardTile>, CoreError> {
        let title = card.title.trim();
        if title.is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "title must not be empty".into(),
            });
        }
        if let Some(at) = card.expires_at.filter(|at| *at <= now) {
            return Err(CoreError::ValidationFailed {
                message: format!("expiry {at} is not in the future"),
            });
        }

        let request = CreateCardRequest {
            title: title.to_owned(),
            description: card.description.trim().to_owned(),
            expires_at: card.expires_at,
        };
        self.api
            .create_card(&request)
            .await
            .map_err(|e| self.fail(e))?;
        self.created(now).await
    }

    /// Create another card with the same title, description and expiry
    /// as one of the viewer's cards. An already-passed expiry is dropped.
    pub async fn copy(&self, card_id: &str, now: DateTime<Utc>) -> Result<Vec<CardTile>, CoreError> {
        let records = self.created_records().await?;
        let source = records
            .iter()
            .find(|c| c.id == card_id)
            .ok_or_else(|| CoreError::NotFound {
                entity_type: "Card".into(),
                identifier: card_id.to_owned(),
            })?;

        let request = CreateCardRequest {
            title: source.title.clone(),
            description: source.description.clone(),
            expires_at: source.expires_at.filter(|at| *at > now),
        };
        debug!(card_id, "copying card");
        self.api
            .create_card(&request)
            .await
            .map_err(|e| self.fail(e))?;
        self.created(now).await
    }

    /// Give a card to another user; returns the refreshed created list.
    pub async fn send(
        &self,
        card_id: &str,
        to_username: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<CardTile>, CoreError> {
        let to = to_username.trim();
        if to.is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "recipient username must not be empty".into(),
            });
        }
        self.api
            .send_card(card_id, to)
            .await
            .map_err(|e| self.fail(e))?;
        self.created(now).await
    }

    /// Redeem a received card; returns the refreshed received list.
    pub async fn use_card(&self, card_id: &str, now: DateTime<Utc>) -> Result<Vec<CardTile>, CoreError> {
        self.api.use_card(card_id).await.map_err(|e| self.fail(e))?;
        self.received(now).await
    }

    /// Delete a card; returns the refreshed created list.
    pub async fn delete(&self, card_id: &str, now: DateTime<Utc>) -> Result<Vec<CardTile>, CoreError> {
        self.api
            .delete_card(card_id)
            .await
            .map_err(|e| self.fail(e))?;
        self.created(now).await
    }

    pub async fn stats(&self) -> Result<CardStats, CoreError> {
        let created = self.created_records().await?;
        let received = self.received_records().await?;
        Ok(CardStats::from_lists(&created, &received))
    }

    // ── Friends ──────────────────────────────────────────────────────

    pub async fn friends(&self) -> Result<Vec<Friend>, CoreError> {
        let users = self.api.list_friends().await.map_err(|e| self.fail(e))?;
        Ok(users.into_iter().map(Friend::from).collect())
    }

    /// Search for users to befriend. Queries shorter than
    /// [`MIN_SEARCH_LEN`] characters are rejected without a request.
    pub async fn search_friends(&self, query: &str) -> Result<Vec<FriendCandidate>, CoreError> {
        let query = search_query(query)?;
        let entries = self
            .api
            .search_friends(query)
            .await
            .map_err(|e| self.fail(e))?;
        Ok(entries.into_iter().map(FriendCandidate::from).collect())
    }

    /// Search all users, friends or not, by username or nickname.
    pub async fn search_users(&self, query: &str) -> Result<Vec<Friend>, CoreError> {
        let query = search_query(query)?;
        let users = self
            .api
            .search_users(query)
            .await
            .map_err(|e| self.fail(e))?;
        Ok(users.into_iter().map(Friend::from).collect())
    }

    pub async fn sent_invites(&self) -> Result<Vec<FriendCandidate>, CoreError> {
        let entries = self
            .api
            .list_sent_invites()
            .await
            .map_err(|e| self.fail(e))?;
        Ok(entries.into_iter().map(FriendCandidate::from).collect())
    }

    pub async fn received_invites(&self) -> Result<Vec<FriendCandidate>, CoreError> {
        let entries = self
            .api
            .list_received_invites()
            .await
            .map_err(|e| self.fail(e))?;
        Ok(entries.into_iter().map(FriendCandidate::from).collect())
    }

    /// Invite a user; returns the server's confirmation message.
    pub async fn invite(&self, user_id: &str) -> Result<Option<String>, CoreError> {
        let resp = self
            .api
            .invite_friend(user_id)
            .await
            .map_err(|e| self.fail(e))?;
        Ok(resp.message)
    }

    /// Accept a pending invitation from `user_id`.
    pub async fn accept(&self, user_id: &str) -> Result<Option<String>, CoreError> {
        let resp = self
            .api
            .accept_friend(user_id)
            .await
            .map_err(|e| self.fail(e))?;
        Ok(resp.message)
    }
}

// ── Validation ──────────────────────────────────────────────────────

/// Trimmed search text, or an error if it is shorter than
/// [`MIN_SEARCH_LEN`] characters.
fn search_query(query: &str) -> Result<&str, CoreError> {
    let query = query.trim();
    if query.chars().count() < MIN_SEARCH_LEN {
        return Err(CoreError::ValidationFailed {
            message: format!("search query needs at least {MIN_SEARCH_LEN} characters"),
        });
    }
    Ok(query)
}

/// Accept `local@domain.tld`: no whitespace, exactly one `@`, and a dot
/// in the domain with text on both sides.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    let invalid = || CoreError::ValidationFailed {
        message: format!("'{email}' is not a valid email address"),
    };

    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid());
    };
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let dotted = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());
    if dotted { Ok(()) } else { Err(invalid()) }
}
