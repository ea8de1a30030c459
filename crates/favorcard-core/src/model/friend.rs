// ── Friend and profile domain types ──

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user in the friends surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
}

/// Invitation state between the viewer and another user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteState {
    /// No invitation yet (wire value `"default"`).
    None,
    Pending,
    Accepted,
    Rejected,
}

impl InviteState {
    /// Parse the server's `invited` field. Empty and unknown values mean
    /// no invitation exists.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "pending" => Self::Pending,
            "accepted" => Self::Accepted,
            "rejected" => Self::Rejected,
            _ => Self::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "Can invite",
            Self::Pending => "Invited",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        }
    }

    /// Only users with no invitation on record can be invited.
    pub fn can_invite(self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for InviteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A search result or invitation row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendCandidate {
    pub user: Friend,
    pub state: InviteState,
    pub updated_at: Option<DateTime<Utc>>,
}

/// The authenticated user's own account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
}
