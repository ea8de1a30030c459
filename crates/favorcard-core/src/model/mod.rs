// ── Domain model ──

pub mod card;
pub mod friend;
pub mod group;

pub use card::{CardRecord, CardStatus, UserRef};
pub use friend::{Friend, FriendCandidate, InviteState, UserProfile};
pub use group::{CardGroup, GroupKey};
