//! # relay-core
//!
//! Domain layer containing presence entities, value objects, the platform port and domain errors.
//! This crate has zero dependencies on infrastructure (gateway, HTTP client, web framework).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Activity, ActivityAssets, ActivityType, GuildMember, Presence, PresenceStatus, UserIdentity,
};
pub use error::DomainError;
pub use traits::{PlatformResult, PresencePlatform};
pub use value_objects::{Snowflake, SnowflakeParseError};
