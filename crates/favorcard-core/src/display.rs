// ── Per-card display decisions ──
//
// Remaining-time badges, status labels and the action buttons a viewer
// is offered. These are suggestions for rendering only; the server is
// the sole authority on whether an action succeeds.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{CardRecord, CardStatus};

// ── Remaining time ──────────────────────────────────────────────────

/// Whole time left before a card expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum RemainingTime {
    Days(i64),
    Hours(i64),
}

impl fmt::Display for RemainingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(d) => write!(f, "{d}d"),
            Self::Hours(h) => write!(f, "{h}h"),
        }
    }
}

/// Time left until `expires_at`, or `None` when the card has no expiry
/// or has already expired.
///
/// Whole days are reported when at least one full day remains,
/// otherwise whole hours (floored, so anything under an hour is `0h`).
pub fn remaining_time(
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<RemainingTime> {
    let expires_at = expires_at?;
    if expires_at <= now {
        return None;
    }

    let left = expires_at - now;
    let days = left.num_days();
    if days > 0 {
        Some(RemainingTime::Days(days))
    } else {
        Some(RemainingTime::Hours(left.num_hours()))
    }
}

// ── Status label ────────────────────────────────────────────────────

/// Human label for a status. Unrecognised statuses are shown as-is.
pub fn status_label(status: &CardStatus) -> &str {
    match status {
        CardStatus::Active => "Active",
        CardStatus::Used => "Used",
        CardStatus::Expired => "Expired",
        CardStatus::Other(raw) => raw,
    }
}

// ── Actions ─────────────────────────────────────────────────────────

/// An action button a card may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardAction {
    Send,
    Use,
    Delete,
}

impl fmt::Display for CardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Send => "send",
            Self::Use => "use",
            Self::Delete => "delete",
        })
    }
}

/// The set of actions offered for one card. Empty means none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CardActions(Vec<CardAction>);

impl CardActions {
    pub fn none() -> Self {
        Self::default()
    }

    fn of(actions: &[CardAction]) -> Self {
        let mut v = actions.to_vec();
        v.sort_unstable();
        v.dedup();
        Self(v)
    }

    pub fn contains(&self, action: CardAction) -> bool {
        self.0.contains(&action)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CardAction> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for CardActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("-");
        }
        let names: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&names.join(", "))
    }
}

/// Actions to offer `viewer` for `record`.
///
/// - inactive card: delete, only for a viewer who both created and owns it
/// - active, viewer created and owns it: send and delete
/// - active, viewer created it but someone else owns it: send
/// - active, viewer did not create it: use
pub fn actions_for(record: &CardRecord, viewer: &str) -> CardActions {
    let is_creator = record.creator.username == viewer;
    let is_owner = record.owner.username == viewer;

    if !record.status.is_active() {
        return if is_creator && is_owner {
            CardActions::of(&[CardAction::Delete])
        } else {
            CardActions::none()
        };
    }

    match (is_creator, is_owner) {
        (true, true) => CardActions::of(&[CardAction::Send, CardAction::Delete]),
        (true, false) => CardActions::of(&[CardAction::Send]),
        (false, _) => CardActions::of(&[CardAction::Use]),
    }
}
