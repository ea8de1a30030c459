// ── API-to-domain type conversions ──
//
// Bridges raw `favorcard_api` response types into canonical
// `favorcard_core::model` types. Timestamps are parsed here; anything
// unparseable degrades silently instead of failing the whole listing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use favorcard_api::models::{ApiCard, ApiFriendEntry, ApiUser};

use crate::model::{
    CardRecord, CardStatus, Friend, FriendCandidate, InviteState, UserProfile, UserRef,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse a server timestamp.
///
/// Accepts RFC 3339 (what the server emits) and, leniently, naive
/// `YYYY-MM-DDTHH:MM[:SS]` / `YYYY-MM-DD` forms read as UTC. Returns
/// `None` for anything else.
pub fn parse_datetime(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn user_ref(user: Option<&ApiUser>) -> UserRef {
    user.map_or_else(UserRef::default, |u| {
        UserRef::new(u.username.clone(), u.nickname.as_deref())
    })
}

// ── Cards ──────────────────────────────────────────────────────────

impl From<ApiCard> for CardRecord {
    fn from(c: ApiCard) -> Self {
        CardRecord {
            creator: user_ref(c.creator.as_ref()),
            owner: user_ref(c.owner.as_ref()),
            expires_at: parse_datetime(c.expires_at.as_deref()),
            updated_at: parse_datetime(c.updated_at.as_deref()).unwrap_or_default(),
            created_at: parse_datetime(c.created_at.as_deref()),
            status: CardStatus::from(c.status),
            id: c.id,
            title: c.title,
            description: c.description,
        }
    }
}

// ── Users ──────────────────────────────────────────────────────────

impl From<ApiUser> for Friend {
    fn from(u: ApiUser) -> Self {
        let display = UserRef::new(u.username.clone(), u.nickname.as_deref());
        Friend {
            id: u.id.unwrap_or_default(),
            username: u.username,
            display_name: display.display_name,
            email: non_empty(u.email),
        }
    }
}

impl From<ApiFriendEntry> for FriendCandidate {
    fn from(e: ApiFriendEntry) -> Self {
        FriendCandidate {
            state: InviteState::from_wire(&e.invited),
            updated_at: parse_datetime(e.updated_at.as_deref()),
            user: Friend::from(e.user),
        }
    }
}

impl From<ApiUser> for UserProfile {
    fn from(u: ApiUser) -> Self {
        let display = UserRef::new(u.username.clone(), u.nickname.as_deref());
        UserProfile {
            id: u.id.unwrap_or_default(),
            username: u.username,
            display_name: display.display_name,
            nickname: non_empty(u.nickname),
            email: non_empty(u.email),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn api_card() -> ApiCard {
        ApiCard {
            id: "7".into(),
            title: "Coffee".into(),
            description: "one coffee".into(),
            status: "active".into(),
            expires_at: Some("2025-06-02T12:00:00+08:00".into()),
            updated_at: Some("2025-06-01T00:00:00Z".into()),
            created_at: None,
            creator: Some(ApiUser {
                id: Some("1".into()),
                username: "alice".into(),
                nickname: Some("Alice".into()),
                email: None,
            }),
            owner: Some(ApiUser {
                username: "bob".into(),
                ..ApiUser::default()
            }),
        }
    }

    #[test]
    fn card_converts_with_offsets_normalized() {
        let record = CardRecord::from(api_card());

        assert_eq!(record.id, "7");
        assert_eq!(record.status, CardStatus::Active);
        assert_eq!(record.creator.display_name, "Alice");
        assert_eq!(record.owner.display_name, "bob");
        assert_eq!(
            record.expires_at,
            Utc.with_ymd_and_hms(2025, 6, 2, 4, 0, 0).single()
        );
    }

    #[test]
    fn malformed_expiry_means_no_expiry() {
        let mut raw = api_card();
        raw.expires_at = Some("next tuesday".into());
        raw.updated_at = Some("garbage".into());

        let record = CardRecord::from(raw);
        assert_eq!(record.expires_at, None);
        assert_eq!(record.updated_at, DateTime::<Utc>::default());
    }

    #[test]
    fn missing_relations_become_empty_users() {
        let mut raw = api_card();
        raw.creator = None;
        raw.owner = None;

        let record = CardRecord::from(raw);
        assert_eq!(record.creator.username, "");
        assert_eq!(record.owner.username, "");
    }

    #[test]
    fn go_style_nanosecond_timestamps_parse() {
        let parsed = parse_datetime(Some("2025-10-16T09:30:00.123456789+08:00"));
        assert!(parsed.is_some());
    }

    #[test]
    fn naive_forms_are_read_as_utc() {
        assert_eq!(
            parse_datetime(Some("2025-06-02T12:30")),
            Utc.with_ymd_and_hms(2025, 6, 2, 12, 30, 0).single()
        );
        assert_eq!(
            parse_datetime(Some("2025-06-02")),
            Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).single()
        );
        assert_eq!(parse_datetime(Some("")), None);
        assert_eq!(parse_datetime(None), None);
    }

    #[test]
    fn friend_entry_maps_invite_state() {
        let entry = ApiFriendEntry {
            user: ApiUser {
                id: Some("3".into()),
                username: "carol".into(),
                nickname: Some(String::new()),
                email: Some("c@example.com".into()),
            },
            invited: "default".into(),
            updated_at: None,
        };

        let candidate = FriendCandidate::from(entry);
        assert_eq!(candidate.state, InviteState::None);
        assert_eq!(candidate.user.display_name, "carol");
        assert_eq!(candidate.user.email.as_deref(), Some("c@example.com"));
    }
}
