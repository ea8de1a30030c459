// Wire types for the favorcard REST API
//
// The server is loose about shapes: ids arrive as numbers, optional
// relations may be missing, and empty lists sometimes serialize as
// `null`. Every type here deserializes leniently and leaves
// interpretation (timestamps, statuses) to `favorcard-core`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ── Lenient field helpers ───────────────────────────────────────────

/// Accept a string or a number, keeping its textual form. Anything
/// else (null, objects, booleans) becomes `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Like [`lenient_string`] but collapses missing and `null` values to `""`.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer).map(Option::unwrap_or_default)
}

/// Treat `null` the same as a missing list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Users ───────────────────────────────────────────────────────────

/// A user as embedded in card, friend and auth responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiUser {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub username: String,
    #[serde(deserialize_with = "lenient_string")]
    pub nickname: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
}

/// `POST /api/login` and `POST /api/register` response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub user: ApiUser,
    #[serde(default)]
    pub message: Option<String>,
}

/// `{ "users": [...] }` listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsersResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub users: Vec<ApiUser>,
}

// ── Cards ───────────────────────────────────────────────────────────

/// A card exactly as the server sends it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiCard {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(deserialize_with = "lenient_text")]
    pub status: String,
    #[serde(deserialize_with = "lenient_string")]
    pub expires_at: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub updated_at: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    pub creator: Option<ApiUser>,
    pub owner: Option<ApiUser>,
}

/// `GET /api/cards` and `GET /api/cards/received` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cards: Vec<ApiCard>,
}

/// Responses that wrap a single card (`create`, `send`, `use`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardEnvelope {
    #[serde(default)]
    pub card: Option<ApiCard>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /api/cards` body.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCardRequest {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// `POST /api/cards/{id}/send` body.
#[derive(Debug, Clone, Serialize)]
pub struct SendCardRequest {
    pub to_username: String,
}

// ── Friends ─────────────────────────────────────────────────────────

/// A user paired with the invitation state between them and the viewer.
///
/// `invited` is `"pending"`, `"accepted"`, `"rejected"` or `"default"`
/// (no invitation yet).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiFriendEntry {
    pub user: ApiUser,
    #[serde(deserialize_with = "lenient_text")]
    pub invited: String,
    #[serde(deserialize_with = "lenient_string")]
    pub updated_at: Option<String>,
}

/// Friend search and invitation listings.
///
/// Newer servers answer `{ "list": [...] }` with invitation state, older
/// ones `{ "users": [...] }` with bare users.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FriendListResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub list: Vec<ApiFriendEntry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub users: Vec<ApiUser>,
}

impl FriendListResponse {
    /// Normalize both shapes into entries. Bare users carry the
    /// `fallback_state` since the server did not report one.
    pub fn into_entries(self, fallback_state: &str) -> Vec<ApiFriendEntry> {
        if !self.list.is_empty() {
            return self.list;
        }
        self.users
            .into_iter()
            .map(|user| ApiFriendEntry {
                user,
                invited: fallback_state.to_owned(),
                updated_at: None,
            })
            .collect()
    }
}

// ── Generic ─────────────────────────────────────────────────────────

/// Acknowledgement body for actions that return no resource.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessageResponse {
    pub message: Option<String>,
    pub success: Option<bool>,
}

/// Error body: `{ "error": "..." }`, occasionally `{ "message": "..." }`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}
