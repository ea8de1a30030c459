// ── Presentation adapter ──
//
// Flattens a `CardGroup` into the fields a renderer needs for one tile,
// resolving the viewer-specific bits (actions, remaining time) up front.
// Stateless: callers rebuild tiles whenever the card list changes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregate;
use crate::display::{CardActions, RemainingTime, actions_for, remaining_time, status_label};
use crate::model::{CardGroup, CardRecord, CardStatus};

/// One rendered tile: a group's representative plus its count badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardTile {
    /// Id of the representative (soonest-expiring) card.
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: CardStatus,
    pub status_label: String,
    pub creator: String,
    pub owner: String,
    pub count: usize,
    /// Ids of every card in the group, representative first.
    pub member_ids: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub remaining: Option<RemainingTime>,
    pub actions: CardActions,
}

impl CardTile {
    pub fn from_group(group: &CardGroup, viewer: &str, now: DateTime<Utc>) -> Self {
        let rep = group.representative();
        Self {
            count: group.len(),
            member_ids: group.member_ids().map(str::to_owned).collect(),
            ..Self::from_record(rep, viewer, now)
        }
    }

    /// A tile for a single card, used when groups are expanded.
    pub fn from_record(record: &CardRecord, viewer: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            status: record.status.clone(),
            status_label: status_label(&record.status).to_owned(),
            creator: record.creator.display_name.clone(),
            owner: record.owner.display_name.clone(),
            count: 1,
            member_ids: vec![record.id.clone()],
            expires_at: record.expires_at,
            remaining: remaining_time(record.expires_at, now),
            actions: actions_for(record, viewer),
        }
    }
}

/// Group `records` and render every group as a tile.
pub fn tiles(records: &[CardRecord], viewer: &str, now: DateTime<Utc>) -> Vec<CardTile> {
    aggregate::group(records)
        .iter()
        .map(|g| CardTile::from_group(g, viewer, now))
        .collect()
}

/// One tile per card, in group order then expiry order.
pub fn expanded_tiles(records: &[CardRecord], viewer: &str, now: DateTime<Utc>) -> Vec<CardTile> {
    aggregate::group(records)
        .iter()
        .flat_map(|g| g.members().iter())
        .map(|r| CardTile::from_record(r, viewer, now))
        .collect()
}
