//! User identity - the public profile fields of a platform user

use crate::value_objects::Snowflake;

/// Base URL of the platform CDN
pub const CDN_BASE_URL: &str = "https://cdn.discordapp.com";

/// Identity of a platform user as seen by other members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: Snowflake,
    pub username: String,
    /// Legacy 4-digit tag; `"0"` (or absent) for migrated usernames
    pub discriminator: Option<String>,
    pub global_name: Option<String>,
    /// Avatar hash, `None` when the user has no custom avatar
    pub avatar: Option<String>,
}

impl UserIdentity {
    /// Create an identity with only the required fields
    pub fn new(id: Snowflake, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            discriminator: None,
            global_name: None,
            avatar: None,
        }
    }

    /// Set the avatar hash
    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Set the legacy discriminator
    #[must_use]
    pub fn with_discriminator(mut self, discriminator: impl Into<String>) -> Self {
        self.discriminator = Some(discriminator.into());
        self
    }

    /// Whether the avatar is animated
    pub fn has_animated_avatar(&self) -> bool {
        self.avatar.as_deref().is_some_and(|hash| hash.starts_with("a_"))
    }

    /// URL of the custom avatar, if any
    ///
    /// Animated avatars resolve to `.gif`, static ones to `.webp`.
    pub fn avatar_url(&self) -> Option<String> {
        let hash = self.avatar.as_deref()?;
        let extension = if self.has_animated_avatar() { "gif" } else { "webp" };
        Some(format!("{CDN_BASE_URL}/avatars/{}/{hash}.{extension}", self.id))
    }

    /// URL of the default avatar assigned by the platform
    pub fn default_avatar_url(&self) -> String {
        format!(
            "{CDN_BASE_URL}/embed/avatars/{}.png",
            self.default_avatar_index()
        )
    }

    /// Avatar shown by clients: custom avatar, or the default one
    pub fn display_avatar_url(&self) -> String {
        self.avatar_url()
            .unwrap_or_else(|| self.default_avatar_url())
    }

    /// Default avatar index
    ///
    /// Migrated usernames use `(id >> 22) % 6`, legacy tags use `discriminator % 5`.
    fn default_avatar_index(&self) -> i64 {
        match self.discriminator.as_deref() {
            None | Some("0") => self.id.epoch_offset() % 6,
            Some(tag) => tag.parse::<i64>().unwrap_or(0) % 5,
        }
    }
}
