//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Guild not found: {0}")]
    GuildNotFound(Snowflake),

    #[error("Member {user_id} not found in guild {guild_id}")]
    MemberNotFound {
        guild_id: Snowflake,
        user_id: Snowflake,
    },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    // =========================================================================
    // Platform Errors (wrapped)
    // =========================================================================
    #[error("Platform rate limit hit, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("Platform transport error: {0}")]
    TransportError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::GuildNotFound(_) => "UNKNOWN_GUILD",
            Self::MemberNotFound { .. } => "UNKNOWN_MEMBER",

            // Validation
            Self::InvalidId(_) => "INVALID_ID",

            // Platform
            Self::RateLimited { .. } => "PLATFORM_RATE_LIMITED",
            Self::TransportError(_) => "PLATFORM_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::GuildNotFound(_) | Self::MemberNotFound { .. }
        )
    }
}
