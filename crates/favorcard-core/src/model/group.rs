// ── Display groups ──
//
// A group collapses cards that look identical on screen (same title,
// description and creator) into one tile. Groups are only ever built by
// `aggregate::group`, which guarantees they are non-empty and sorted.

use serde::Serialize;

use super::card::CardRecord;

/// Identity of a display group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GroupKey {
    pub title: String,
    pub description: String,
    pub creator_username: String,
}

impl GroupKey {
    pub fn of(record: &CardRecord) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
            creator_username: record.creator.username.clone(),
        }
    }
}

/// One or more structurally identical cards, soonest expiry first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardGroup {
    key: GroupKey,
    members: Vec<CardRecord>,
}

impl CardGroup {
    /// `members` must be non-empty and already sorted.
    pub(crate) fn new(key: GroupKey, members: Vec<CardRecord>) -> Option<Self> {
        if members.is_empty() {
            return None;
        }
        Some(Self { key, members })
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn members(&self) -> &[CardRecord] {
        &self.members
    }

    /// The member shown on the tile: the one expiring soonest.
    pub fn representative(&self) -> &CardRecord {
        // Non-empty by construction.
        &self.members[0]
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.id.as_str())
    }
}
