//! Domain entities - platform objects the relay reads

mod member;
mod presence;
mod user;

pub use member::GuildMember;
pub use presence::{Activity, ActivityAssets, ActivityType, Presence, PresenceStatus};
pub use user::UserIdentity;
