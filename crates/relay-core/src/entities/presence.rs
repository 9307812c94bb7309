//! Presence entity - a user's live status and activities

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::entities::UserIdentity;
use crate::value_objects::Snowflake;

/// Online status reported by the platform
///
/// Unknown values are kept verbatim in `Other` and forwarded unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PresenceStatus {
    /// User is online and active
    Online,
    /// User is idle (away from keyboard)
    Idle,
    /// Do not disturb
    Dnd,
    /// User is offline (or invisible)
    #[default]
    Offline,
    /// Any status string the platform sends that is not one of the above
    Other(String),
}

impl PresenceStatus {
    /// Get the wire representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::Online => "online",
            Self::Idle => "idle",
            Self::Dnd => "dnd",
            Self::Offline => "offline",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for PresenceStatus {
    fn from(s: &str) -> Self {
        match s {
            "online" => Self::Online,
            "idle" => Self::Idle,
            "dnd" => Self::Dnd,
            "offline" => Self::Offline,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for PresenceStatus {
    fn from(s: String) -> Self {
        match Self::from(s.as_str()) {
            Self::Other(_) => Self::Other(s),
            known => known,
        }
    }
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PresenceStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PresenceStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// Activity type code
///
/// Serialized as the platform's integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActivityType {
    #[default]
    Playing,
    Streaming,
    Listening,
    Watching,
    Custom,
    Competing,
    /// A code this build does not know about
    Unknown(u8),
}

impl ActivityType {
    /// Create an `ActivityType` from a raw integer value
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Playing,
            1 => Self::Streaming,
            2 => Self::Listening,
            3 => Self::Watching,
            4 => Self::Custom,
            5 => Self::Competing,
            other => Self::Unknown(other),
        }
    }

    /// Get the raw integer value
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Playing => 0,
            Self::Streaming => 1,
            Self::Listening => 2,
            Self::Watching => 3,
            Self::Custom => 4,
            Self::Competing => 5,
            Self::Unknown(other) => other,
        }
    }
}

impl Serialize for ActivityType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for ActivityType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u8::deserialize(deserializer).map(Self::from_u8)
    }
}

/// Images and hover texts attached to an activity
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivityAssets {
    /// Large image identifier, e.g. `spotify:ab67616d0000b273...`
    pub large_image: Option<String>,
    pub large_text: Option<String>,
    pub small_image: Option<String>,
    pub small_text: Option<String>,
}

/// Something a user is currently doing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Activity {
    pub kind: ActivityType,
    pub name: Option<String>,
    pub details: Option<String>,
    pub state: Option<String>,
    pub url: Option<String>,
    pub assets: Option<ActivityAssets>,
}

impl Activity {
    /// Create an activity with a name and type
    pub fn new(kind: ActivityType, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the details line
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Set the state line
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Set the assets
    #[must_use]
    pub fn with_assets(mut self, assets: ActivityAssets) -> Self {
        self.assets = Some(assets);
        self
    }

    /// The name, if present and non-empty
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

/// A user's presence in a guild
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presence {
    pub user_id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub status: PresenceStatus,
    pub activities: Vec<Activity>,
    /// Full identity, when the platform sent one along with the presence
    pub user: Option<UserIdentity>,
}

impl Presence {
    /// Create a presence with no activities
    pub fn new(user_id: Snowflake, status: impl Into<PresenceStatus>) -> Self {
        Self {
            user_id,
            guild_id: None,
            status: status.into(),
            activities: Vec::new(),
            user: None,
        }
    }

    /// Set the activity list
    #[must_use]
    pub fn with_activities(mut self, activities: Vec<Activity>) -> Self {
        self.activities = activities;
        self
    }

    /// Attach the embedded user identity
    #[must_use]
    pub fn with_user(mut self, user: UserIdentity) -> Self {
        self.user = Some(user);
        self
    }
}
