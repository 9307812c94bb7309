//! REST error types and their mapping onto domain errors

use relay_core::{DomainError, Snowflake};
use serde::Deserialize;
use thiserror::Error;

/// JSON error codes the relay distinguishes
pub mod codes {
    pub const UNKNOWN_GUILD: u64 = 10004;
    pub const UNKNOWN_MEMBER: u64 = 10007;
    pub const UNKNOWN_USER: u64 = 10013;
    pub const MISSING_ACCESS: u64 = 50001;
}

/// Error body returned by the platform API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: u64,
    #[serde(default)]
    pub message: String,
    /// Seconds, only on 429
    #[serde(default)]
    pub retry_after: Option<f64>,
}

/// REST client errors
#[derive(Debug, Error)]
pub enum RestError {
    /// Connection, TLS, timeout, or body decode failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status with the platform's error body
    #[error("API error {status} (code {code}): {message}")]
    Api {
        status: u16,
        code: u64,
        message: String,
    },

    /// Token cannot be sent as a header value
    #[error("Bot token is not a valid header value")]
    InvalidToken,

    /// 429 from the platform
    #[error("Rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },
}

impl RestError {
    /// Build an error from a non-success response
    pub fn from_status(status: u16, body: ApiErrorBody) -> Self {
        if status == 429 {
            let seconds = body.retry_after.unwrap_or(1.0).max(0.0);
            return Self::RateLimited {
                retry_after_ms: (seconds * 1000.0).ceil() as u64,
            };
        }
        Self::Api {
            status,
            code: body.code,
            message: body.message,
        }
    }

    /// Map onto the domain error for a member lookup
    pub fn into_domain(self, guild_id: Snowflake, user_id: Snowflake) -> DomainError {
        match self {
            Self::Api { code, .. } if code == codes::UNKNOWN_GUILD || code == codes::MISSING_ACCESS => {
                DomainError::GuildNotFound(guild_id)
            }
            Self::Api { code, .. } if code == codes::UNKNOWN_USER => DomainError::UserNotFound(user_id),
            Self::Api { code, .. } if code == codes::UNKNOWN_MEMBER => {
                DomainError::MemberNotFound { guild_id, user_id }
            }
            Self::Api { status: 404, .. } => DomainError::MemberNotFound { guild_id, user_id },
            Self::RateLimited { retry_after_ms } => DomainError::RateLimited { retry_after_ms },
            other => DomainError::TransportError(other.to_string()),
        }
    }
}
