//! Member entity - a user's membership in a guild, with its live presence

use crate::entities::{Presence, UserIdentity};
use crate::value_objects::Snowflake;

/// Guild member as resolved from the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildMember {
    pub guild_id: Snowflake,
    pub user: UserIdentity,
    /// `None` when the platform holds no presence for the member (offline)
    pub presence: Option<Presence>,
}

impl GuildMember {
    /// Create a new GuildMember without presence
    pub fn new(guild_id: Snowflake, user: UserIdentity) -> Self {
        Self {
            guild_id,
            user,
            presence: None,
        }
    }

    /// Attach the member's presence
    #[must_use]
    pub fn with_presence(mut self, presence: Presence) -> Self {
        self.presence = Some(presence);
        self
    }

    /// Get the user ID
    #[inline]
    pub fn user_id(&self) -> Snowflake {
        self.user.id
    }
}
