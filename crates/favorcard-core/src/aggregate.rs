// ── Card grouping ──
//
// Collapses a flat card list into display groups. Pure: no clock, no
// state, no failure modes. Groups keep the order in which their key
// first appears; members are ranked by effective expiry with "never
// expires" sorting last.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::model::{CardGroup, CardRecord, GroupKey};

/// Group `records` by (title, description, creator).
///
/// Every record lands in exactly one group. Within a group the sort is
/// stable, so cards with equal expiry keep their input order.
pub fn group<'a, I>(records: I) -> Vec<CardGroup>
where
    I: IntoIterator<Item = &'a CardRecord>,
{
    let mut buckets: IndexMap<GroupKey, Vec<CardRecord>> = IndexMap::new();
    for record in records {
        buckets
            .entry(GroupKey::of(record))
            .or_default()
            .push(record.clone());
    }

    buckets
        .into_iter()
        .filter_map(|(key, mut members)| {
            members.sort_by(|a, b| cmp_expiry(a.expires_at, b.expires_at));
            CardGroup::new(key, members)
        })
        .collect()
}

/// Order two expiries ascending, treating `None` as +infinity.
pub fn cmp_expiry(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
