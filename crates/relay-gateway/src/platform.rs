//! Discord-backed presence platform
//!
//! Member lookups hit the gateway cache first and fall back to REST. The
//! presence always comes from the cache: REST does not carry presences.

use async_trait::async_trait;
use relay_core::{DomainError, GuildMember, PlatformResult, PresencePlatform, Snowflake};
use std::sync::Arc;

use crate::rest::DiscordHttp;
use crate::state::GatewayState;

/// [`PresencePlatform`] over the gateway cache and REST
#[derive(Debug, Clone)]
pub struct DiscordPlatform {
    state: Arc<GatewayState>,
    http: DiscordHttp,
}

impl DiscordPlatform {
    pub fn new(state: Arc<GatewayState>, http: DiscordHttp) -> Self {
        Self { state, http }
    }

    pub fn state(&self) -> &GatewayState {
        &self.state
    }
}

#[async_trait]
impl PresencePlatform for DiscordPlatform {
    async fn fetch_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> PlatformResult<GuildMember> {
        let cache = self.state.cache();

        // Once synced, a guild we never received is one the bot is not in
        if self.state.is_ready() && !cache.has_guild(guild_id) {
            return Err(DomainError::GuildNotFound(guild_id));
        }

        if let Some(member) = cache.member(guild_id, user_id) {
            tracing::trace!(%guild_id, %user_id, "Member served from cache");
            return Ok(member);
        }

        let payload = self
            .http
            .get_guild_member(guild_id, user_id)
            .await
            .map_err(|e| e.into_domain(guild_id, user_id))?;

        let member = payload.to_member(guild_id).ok_or_else(|| {
            DomainError::TransportError("member payload without a full user".to_string())
        })?;
        cache.upsert_member(member.clone());

        Ok(GuildMember {
            presence: cache.presence(guild_id, user_id),
            ..member
        })
    }

    fn is_ready(&self) -> bool {
        self.state.is_ready()
    }
}
