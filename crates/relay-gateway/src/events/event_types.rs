//! Gateway event types
//!
//! Dispatch event names the relay consumes. Anything else is ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gateway event types
///
/// These are the event names sent in the `t` field of dispatch messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayEventType {
    // Connection events
    /// Sent after successful Identify
    Ready,
    /// Sent after successful Resume
    Resumed,

    // Guild events
    /// Guild became available or was joined
    GuildCreate,
    /// Guild became unavailable or was left
    GuildDelete,

    // Member events
    GuildMemberAdd,
    GuildMemberUpdate,
    GuildMemberRemove,

    // Presence events
    /// User status or activities changed
    PresenceUpdate,
}

impl GatewayEventType {
    /// Get the string representation of the event type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::Resumed => "RESUMED",
            Self::GuildCreate => "GUILD_CREATE",
            Self::GuildDelete => "GUILD_DELETE",
            Self::GuildMemberAdd => "GUILD_MEMBER_ADD",
            Self::GuildMemberUpdate => "GUILD_MEMBER_UPDATE",
            Self::GuildMemberRemove => "GUILD_MEMBER_REMOVE",
            Self::PresenceUpdate => "PRESENCE_UPDATE",
        }
    }

    /// Parse an event type from a string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "READY" => Some(Self::Ready),
            "RESUMED" => Some(Self::Resumed),
            "GUILD_CREATE" => Some(Self::GuildCreate),
            "GUILD_DELETE" => Some(Self::GuildDelete),
            "GUILD_MEMBER_ADD" => Some(Self::GuildMemberAdd),
            "GUILD_MEMBER_UPDATE" => Some(Self::GuildMemberUpdate),
            "GUILD_MEMBER_REMOVE" => Some(Self::GuildMemberRemove),
            "PRESENCE_UPDATE" => Some(Self::PresenceUpdate),
            _ => None,
        }
    }
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_round_trip_names() {
        for event in [
            GatewayEventType::Ready,
            GatewayEventType::Resumed,
            GatewayEventType::GuildCreate,
            GatewayEventType::GuildDelete,
            GatewayEventType::GuildMemberAdd,
            GatewayEventType::GuildMemberUpdate,
            GatewayEventType::GuildMemberRemove,
            GatewayEventType::PresenceUpdate,
        ] {
            assert_eq!(GatewayEventType::from_str(event.as_str()), Some(event));
        }
    }

    #[test]
    fn test_unconsumed_events_are_unknown() {
        assert_eq!(GatewayEventType::from_str("MESSAGE_CREATE"), None);
        assert_eq!(GatewayEventType::from_str("TYPING_START"), None);
    }

    #[test]
    fn test_event_type_serialization() {
        let json = serde_json::to_string(&GatewayEventType::PresenceUpdate).unwrap();
        assert_eq!(json, "\"PRESENCE_UPDATE\"");
    }
}
