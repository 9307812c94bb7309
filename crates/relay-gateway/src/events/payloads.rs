//! Event payload definitions
//!
//! Only the fields the relay reads are modelled; everything else in the
//! platform's payloads is ignored on decode.

use relay_core::{
    Activity, ActivityAssets, ActivityType, GuildMember, Presence, Snowflake, UserIdentity,
};
use serde::{Deserialize, Serialize};

// === Connection Events ===

/// READY event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyEvent {
    /// Gateway protocol version
    pub v: u8,

    /// The bot user
    pub user: UserPayload,

    /// Guilds the bot is in, all initially unavailable
    #[serde(default)]
    pub guilds: Vec<UnavailableGuild>,

    /// Session ID for resuming
    pub session_id: String,

    /// Gateway URL to use when resuming
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_gateway_url: Option<String>,
}

/// Guild stub listed in READY
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnavailableGuild {
    pub id: Snowflake,
    #[serde(default)]
    pub unavailable: bool,
}

// === User Payload ===

/// User object as carried by events
///
/// Presence updates may carry only `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
    pub id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl UserPayload {
    /// Full identity, if the payload is not partial
    pub fn to_identity(&self) -> Option<UserIdentity> {
        let username = self.username.clone()?;
        Some(UserIdentity {
            id: self.id,
            username,
            discriminator: self.discriminator.clone(),
            global_name: self.global_name.clone(),
            avatar: self.avatar.clone(),
        })
    }

    /// Copy the fields this payload carries onto an existing identity
    pub fn patch(&self, identity: &mut UserIdentity) {
        if let Some(username) = &self.username {
            identity.username.clone_from(username);
            // A partial user never carries the avatar key without the username
            identity.avatar.clone_from(&self.avatar);
            if self.discriminator.is_some() {
                identity.discriminator.clone_from(&self.discriminator);
            }
            if self.global_name.is_some() {
                identity.global_name.clone_from(&self.global_name);
            }
        }
    }
}

// === Guild Events ===

/// GUILD_CREATE event payload
///
/// Sent for each guild after READY, or when the bot joins one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildCreateEvent {
    pub id: Snowflake,
    #[serde(default)]
    pub unavailable: bool,
    #[serde(default)]
    pub members: Vec<MemberPayload>,
    /// Presences of online members; these carry no `guild_id`
    #[serde(default)]
    pub presences: Vec<PresenceUpdateEvent>,
}

/// GUILD_DELETE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildDeleteEvent {
    pub id: Snowflake,
    /// True for an outage, false when the bot left or was removed
    #[serde(default)]
    pub unavailable: bool,
}

// === Member Events ===

/// Member object, from GUILD_CREATE, member events, or REST
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberPayload {
    pub user: UserPayload,
    /// Present on GUILD_MEMBER_ADD / GUILD_MEMBER_UPDATE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
}

impl MemberPayload {
    /// Convert to a domain member without presence
    ///
    /// Returns `None` when the user object is partial.
    pub fn to_member(&self, guild_id: Snowflake) -> Option<GuildMember> {
        Some(GuildMember::new(guild_id, self.user.to_identity()?))
    }
}

/// GUILD_MEMBER_REMOVE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildMemberRemoveEvent {
    pub guild_id: Snowflake,
    pub user: UserPayload,
}

// === Presence Events ===

/// PRESENCE_UPDATE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceUpdateEvent {
    pub user: UserPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    pub status: String,
    #[serde(default)]
    pub activities: Vec<ActivityPayload>,
}

impl PresenceUpdateEvent {
    /// Convert to a domain presence in `guild_id`
    pub fn to_presence(&self, guild_id: Snowflake) -> Presence {
        let mut presence = Presence::new(self.user.id, self.status.as_str())
            .with_activities(self.activities.iter().map(Activity::from).collect());
        presence.guild_id = Some(guild_id);
        presence.user = self.user.to_identity();
        presence
    }
}

/// Activity object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<AssetsPayload>,
}

/// Activity assets object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetsPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small_text: Option<String>,
}

impl From<&ActivityPayload> for Activity {
    fn from(payload: &ActivityPayload) -> Self {
        Self {
            kind: ActivityType::from_u8(payload.kind),
            name: payload.name.clone(),
            details: payload.details.clone(),
            state: payload.state.clone(),
            url: payload.url.clone(),
            assets: payload.assets.as_ref().map(|assets| ActivityAssets {
                large_image: assets.large_image.clone(),
                large_text: assets.large_text.clone(),
                small_image: assets.small_image.clone(),
                small_text: assets.small_text.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::PresenceStatus;
    use serde_json::json;

    #[test]
    fn test_ready_event() {
        let ready: ReadyEvent = serde_json::from_value(json!({
            "v": 10,
            "user": {"id": "1", "username": "relay-bot", "discriminator": "0", "bot": true},
            "guilds": [{"id": "100", "unavailable": true}],
            "session_id": "abc",
            "resume_gateway_url": "wss://gateway-us-east1-b.discord.gg",
            "shard": [0, 1],
            "application": {"id": "1", "flags": 0}
        }))
        .unwrap();

        assert_eq!(ready.session_id, "abc");
        assert_eq!(ready.guilds[0].id, Snowflake::new(100));
        assert!(ready.user.bot);
    }

    #[test]
    fn test_presence_update_to_presence() {
        let event: PresenceUpdateEvent = serde_json::from_value(json!({
            "user": {"id": "20"},
            "guild_id": "100",
            "status": "dnd",
            "activities": [
                {"name": "Spotify", "type": 2, "details": "Song", "state": "Artist",
                 "assets": {"large_image": "spotify:abc123"}},
                {"type": 4, "state": "custom status"}
            ],
            "client_status": {"desktop": "dnd"}
        }))
        .unwrap();

        let presence = event.to_presence(Snowflake::new(100));
        assert_eq!(presence.status, PresenceStatus::Dnd);
        assert_eq!(presence.guild_id, Some(Snowflake::new(100)));
        assert!(presence.user.is_none());
        assert_eq!(presence.activities.len(), 2);
        assert_eq!(presence.activities[0].kind, ActivityType::Listening);
        assert_eq!(
            presence.activities[0].assets.as_ref().unwrap().large_image.as_deref(),
            Some("spotify:abc123")
        );
        assert_eq!(presence.activities[1].name, None);
    }

    #[test]
    fn test_guild_create_event() {
        let event: GuildCreateEvent = serde_json::from_value(json!({
            "id": "100",
            "name": "guild",
            "members": [{"user": {"id": "20", "username": "owner", "avatar": null}}],
            "presences": [{"user": {"id": "20"}, "status": "online", "activities": []}]
        }))
        .unwrap();

        assert!(!event.unavailable);
        let member = event.members[0].to_member(event.id).unwrap();
        assert_eq!(member.user.username, "owner");
        assert_eq!(member.guild_id, event.id);
        assert!(event.presences[0].guild_id.is_none());
    }

    #[test]
    fn test_partial_user_has_no_identity() {
        let user: UserPayload = serde_json::from_value(json!({"id": "5"})).unwrap();
        assert!(user.to_identity().is_none());

        let member = MemberPayload {
            user,
            guild_id: None,
        };
        assert!(member.to_member(Snowflake::new(1)).is_none());
    }

    #[test]
    fn test_patch_identity() {
        let mut identity = UserIdentity::new(Snowflake::new(5), "old").with_avatar("old_hash");

        let partial: UserPayload = serde_json::from_value(json!({"id": "5"})).unwrap();
        partial.patch(&mut identity);
        assert_eq!(identity.username, "old");
        assert_eq!(identity.avatar.as_deref(), Some("old_hash"));

        let full: UserPayload = serde_json::from_value(json!({
            "id": "5", "username": "new", "avatar": null
        }))
        .unwrap();
        full.patch(&mut identity);
        assert_eq!(identity.username, "new");
        assert_eq!(identity.avatar, None);
    }
}
