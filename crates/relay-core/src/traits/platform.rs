//! Platform port - how the relay reads members and presences
//!
//! The domain layer defines what it needs; the gateway crate provides
//! the Discord-backed implementation.

use async_trait::async_trait;

use crate::entities::GuildMember;
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, DomainError>;

// ============================================================================
// Presence Platform
// ============================================================================

#[async_trait]
pub trait PresencePlatform: Send + Sync {
    /// Resolve a guild member together with its current presence
    ///
    /// Fails with `GuildNotFound` when the guild is unknown or inaccessible,
    /// with `MemberNotFound`/`UserNotFound` when the user is not a member,
    /// and with a transport error for anything else.
    async fn fetch_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> PlatformResult<GuildMember>;

    /// Whether the platform session is connected and has finished its initial sync
    fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::UserIdentity;

    struct SingleMember;

    #[async_trait]
    impl PresencePlatform for SingleMember {
        async fn fetch_member(
            &self,
            guild_id: Snowflake,
            user_id: Snowflake,
        ) -> PlatformResult<GuildMember> {
            if user_id == Snowflake::new(2) {
                Ok(GuildMember::new(guild_id, UserIdentity::new(user_id, "only")))
            } else {
                Err(DomainError::MemberNotFound { guild_id, user_id })
            }
        }
    }

    #[tokio::test]
    async fn test_platform_object_safety() {
        let platform: Box<dyn PresencePlatform> = Box::new(SingleMember);
        assert!(platform.is_ready());

        let member = platform
            .fetch_member(Snowflake::new(1), Snowflake::new(2))
            .await
            .unwrap();
        assert_eq!(member.user.username, "only");

        let err = platform
            .fetch_member(Snowflake::new(1), Snowflake::new(3))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
