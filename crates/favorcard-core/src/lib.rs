//! Domain layer between `favorcard-api` and front-ends (the CLI).
//!
//! - **Aggregation** ([`aggregate`]): collapses duplicate cards (same
//!   title, description and creator) into [`CardGroup`]s, ranked by expiry.
//!   Pure and clock-free; callers pass `now` where it matters.
//!
//! - **Display decisions** ([`display`]): remaining-time badges, status
//!   labels and the per-viewer action set for a card.
//!
//! - **Tiles** ([`view`]): one flattened, serializable row per group.
//!
//! - **[`CardService`]**: wraps the HTTP client and a [`SessionStore`],
//!   reloading and re-aggregating after every mutation.

pub mod aggregate;
pub mod convert;
pub mod display;
pub mod error;
pub mod model;
pub mod service;
pub mod session;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::group;
pub use display::{CardAction, CardActions, RemainingTime, actions_for, remaining_time, status_label};
pub use error::CoreError;
pub use service::{CardService, CardStats, NewCard, ProfileUpdate};
pub use session::{MemorySessionStore, SessionStore};
pub use view::{CardTile, expanded_tiles, tiles};

pub use model::{
    CardGroup, CardRecord, CardStatus, Friend, FriendCandidate, GroupKey, InviteState,
    UserProfile, UserRef,
};
