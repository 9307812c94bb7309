//! Guild, member, and presence cache
//!
//! Uses DashMap so the gateway read loop and concurrent HTTP lookups can
//! touch the cache without a global lock.

use dashmap::{DashMap, DashSet};
use relay_core::{GuildMember, Presence, Snowflake};
use std::sync::Arc;

use crate::events::{GuildCreateEvent, PresenceUpdateEvent, UserPayload};

type MemberKey = (Snowflake, Snowflake);

/// Cache of everything the gateway told us about guilds
#[derive(Debug, Default)]
pub struct GuildCache {
    /// Guilds that are currently available
    guilds: DashSet<Snowflake>,

    /// Member identities by (guild, user), stored without presence
    members: DashMap<MemberKey, GuildMember>,

    /// Latest presence by (guild, user)
    presences: DashMap<MemberKey, Presence>,
}

impl GuildCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    // === Guilds ===

    /// Load a guild from GUILD_CREATE
    ///
    /// Unavailable guilds are not marked available. Returns whether the guild
    /// is now available.
    pub fn add_guild(&self, event: &GuildCreateEvent) -> bool {
        if event.unavailable {
            return false;
        }

        self.guilds.insert(event.id);

        for payload in &event.members {
            if let Some(member) = payload.to_member(event.id) {
                self.members.insert((event.id, member.user_id()), member);
            }
        }

        for presence in &event.presences {
            self.apply_presence(event.id, presence);
        }

        tracing::debug!(
            guild_id = %event.id,
            members = event.members.len(),
            presences = event.presences.len(),
            "Guild cached"
        );

        true
    }

    /// Forget a guild and everything cached for it
    pub fn remove_guild(&self, guild_id: Snowflake) {
        self.guilds.remove(&guild_id);
        self.members.retain(|(guild, _), _| *guild != guild_id);
        self.presences.retain(|(guild, _), _| *guild != guild_id);

        tracing::debug!(guild_id = %guild_id, "Guild evicted");
    }

    /// Whether a GUILD_CREATE was seen for this guild
    pub fn has_guild(&self, guild_id: Snowflake) -> bool {
        self.guilds.contains(&guild_id)
    }

    pub fn guild_count(&self) -> usize {
        self.guilds.len()
    }

    // === Members ===

    /// Insert or replace a member identity; any presence on it is ignored
    pub fn upsert_member(&self, mut member: GuildMember) {
        member.presence = None;
        self.members.insert((member.guild_id, member.user_id()), member);
    }

    /// Remove a member and its presence
    pub fn remove_member(&self, guild_id: Snowflake, user_id: Snowflake) {
        self.members.remove(&(guild_id, user_id));
        self.presences.remove(&(guild_id, user_id));
    }

    /// Cached member with its cached presence attached
    pub fn member(&self, guild_id: Snowflake, user_id: Snowflake) -> Option<GuildMember> {
        let mut member = self.members.get(&(guild_id, user_id))?.clone();
        member.presence = self.presence(guild_id, user_id);
        Some(member)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    // === Presences ===

    /// Store a presence update
    ///
    /// The update's `guild_id` wins over `guild_id` when present. User fields
    /// carried by the update refresh the cached member identity.
    pub fn apply_presence(&self, guild_id: Snowflake, event: &PresenceUpdateEvent) {
        let guild_id = event.guild_id.unwrap_or(guild_id);
        let key = (guild_id, event.user.id);

        self.patch_member(guild_id, &event.user);
        self.presences.insert(key, event.to_presence(guild_id));
    }

    /// Latest presence for a member, if the gateway sent one
    pub fn presence(&self, guild_id: Snowflake, user_id: Snowflake) -> Option<Presence> {
        self.presences
            .get(&(guild_id, user_id))
            .map(|entry| entry.value().clone())
    }

    fn patch_member(&self, guild_id: Snowflake, user: &UserPayload) {
        if let Some(mut member) = self.members.get_mut(&(guild_id, user.id)) {
            user.patch(&mut member.user);
            return;
        }
        if let Some(identity) = user.to_identity() {
            self.members
                .insert((guild_id, user.id), GuildMember::new(guild_id, identity));
        }
    }

    /// Drop everything, e.g. when a fresh session starts
    pub fn clear(&self) {
        self.guilds.clear();
        self.members.clear();
        self.presences.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::{PresenceStatus, UserIdentity};
    use serde_json::json;

    const GUILD: Snowflake = Snowflake::new(100);
    const OWNER: Snowflake = Snowflake::new(20);

    fn guild_create() -> GuildCreateEvent {
        serde_json::from_value(json!({
            "id": "100",
            "members": [
                {"user": {"id": "20", "username": "owner", "avatar": "hash"}},
                {"user": {"id": "21", "username": "other"}}
            ],
            "presences": [
                {"user": {"id": "20"}, "status": "online",
                 "activities": [{"name": "Factorio", "type": 0}]}
            ]
        }))
        .unwrap()
    }

    fn presence_update(status: &str, user: serde_json::Value) -> PresenceUpdateEvent {
        serde_json::from_value(json!({
            "user": user, "guild_id": "100", "status": status, "activities": []
        }))
        .unwrap()
    }

    #[test]
    fn test_add_guild() {
        let cache = GuildCache::new();
        assert!(cache.add_guild(&guild_create()));

        assert!(cache.has_guild(GUILD));
        assert_eq!(cache.member_count(), 2);

        let owner = cache.member(GUILD, OWNER).unwrap();
        assert_eq!(owner.user.username, "owner");
        let presence = owner.presence.unwrap();
        assert_eq!(presence.status, PresenceStatus::Online);
        assert_eq!(presence.activities.len(), 1);

        let other = cache.member(GUILD, Snowflake::new(21)).unwrap();
        assert!(other.presence.is_none());
    }

    #[test]
    fn test_unavailable_guild_is_skipped() {
        let cache = GuildCache::new();
        let event: GuildCreateEvent =
            serde_json::from_value(json!({"id": "100", "unavailable": true})).unwrap();
        assert!(!cache.add_guild(&event));
        assert!(!cache.has_guild(GUILD));
    }

    #[test]
    fn test_presence_update_replaces_and_patches() {
        let cache = GuildCache::new();
        cache.add_guild(&guild_create());

        cache.apply_presence(
            GUILD,
            &presence_update("idle", json!({"id": "20", "username": "renamed", "avatar": null})),
        );

        let owner = cache.member(GUILD, OWNER).unwrap();
        assert_eq!(owner.user.username, "renamed");
        assert_eq!(owner.user.avatar, None);
        let presence = owner.presence.unwrap();
        assert_eq!(presence.status, PresenceStatus::Idle);
        assert!(presence.activities.is_empty());
    }

    #[test]
    fn test_presence_for_unknown_member_with_partial_user() {
        let cache = GuildCache::new();
        cache.apply_presence(GUILD, &presence_update("online", json!({"id": "30"})));

        assert!(cache.member(GUILD, Snowflake::new(30)).is_none());
        assert!(cache.presence(GUILD, Snowflake::new(30)).is_some());
    }

    #[test]
    fn test_upsert_member_then_presence() {
        let cache = GuildCache::new();
        let member = GuildMember::new(GUILD, UserIdentity::new(OWNER, "owner"))
            .with_presence(relay_core::Presence::new(OWNER, "dnd"));
        cache.upsert_member(member);

        // Presence attached to the upserted member is not trusted
        assert!(cache.member(GUILD, OWNER).unwrap().presence.is_none());

        cache.apply_presence(GUILD, &presence_update("dnd", json!({"id": "20"})));
        assert_eq!(
            cache.member(GUILD, OWNER).unwrap().presence.unwrap().status,
            PresenceStatus::Dnd
        );
    }

    #[test]
    fn test_remove_member_and_guild() {
        let cache = GuildCache::new();
        cache.add_guild(&guild_create());

        cache.remove_member(GUILD, OWNER);
        assert!(cache.member(GUILD, OWNER).is_none());
        assert!(cache.presence(GUILD, OWNER).is_none());

        cache.remove_guild(GUILD);
        assert!(!cache.has_guild(GUILD));
        assert_eq!(cache.member_count(), 0);
    }

    #[test]
    fn test_clear() {
        let cache = GuildCache::new();
        cache.add_guild(&guild_create());
        cache.clear();
        assert_eq!(cache.guild_count(), 0);
        assert_eq!(cache.member_count(), 0);
    }
}
