// ── Card domain types ──

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Card lifecycle state.
///
/// Values the client does not recognise are kept verbatim in
/// [`Other`](Self::Other) rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CardStatus {
    Active,
    Used,
    Expired,
    Other(String),
}

impl CardStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Used => "used",
            Self::Expired => "expired",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl From<String> for CardStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "active" => Self::Active,
            "used" => Self::Used,
            "expired" => Self::Expired,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for CardStatus {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_owned())
    }
}

impl From<CardStatus> for String {
    fn from(status: CardStatus) -> Self {
        match status {
            CardStatus::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user as referenced from a card (creator or owner).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRef {
    pub username: String,
    /// Nickname when the user set one, otherwise the username.
    pub display_name: String,
}

impl UserRef {
    pub fn new(username: impl Into<String>, nickname: Option<&str>) -> Self {
        let username = username.into();
        let display_name = nickname
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or_else(|| username.clone(), str::to_owned);
        Self {
            username,
            display_name,
        }
    }
}

/// Immutable snapshot of a card as the server last reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: CardStatus,
    pub creator: UserRef,
    pub owner: UserRef,
    /// `None` means the card never expires.
    pub expires_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_round_trips_verbatim() {
        let status = CardStatus::from("frozen");
        assert_eq!(status, CardStatus::Other("frozen".into()));
        assert_eq!(status.as_str(), "frozen");
        assert_eq!(String::from(status), "frozen");
    }

    #[test]
    fn known_statuses_parse() {
        assert_eq!(CardStatus::from("active"), CardStatus::Active);
        assert_eq!(CardStatus::from("used"), CardStatus::Used);
        assert_eq!(CardStatus::from("expired"), CardStatus::Expired);
        assert!(CardStatus::Active.is_active());
        assert!(!CardStatus::Used.is_active());
    }

    #[test]
    fn display_name_falls_back_to_username() {
        assert_eq!(UserRef::new("alice", Some("Ali")).display_name, "Ali");
        assert_eq!(UserRef::new("alice", Some("  ")).display_name, "alice");
        assert_eq!(UserRef::new("alice", None).display_name, "alice");
    }
}
