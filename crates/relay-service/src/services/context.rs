//! Service context - dependency container for services
//!
//! Holds the platform handle, the owner record, and the normalizer. Cloning
//! is cheap and every clone shares the same record.

use std::fmt;
use std::sync::Arc;

use relay_core::{PresencePlatform, Snowflake};

use crate::cache::SelfPresenceCache;
use crate::normalizer::Normalizer;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    platform: Arc<dyn PresencePlatform>,
    self_cache: Arc<SelfPresenceCache>,
    normalizer: Arc<Normalizer>,
    guild_id: Snowflake,
    owner_id: Snowflake,
}

impl ServiceContext {
    /// Create a context with a fresh owner record and the default normalizer
    pub fn new(
        platform: Arc<dyn PresencePlatform>,
        guild_id: Snowflake,
        owner_id: Snowflake,
    ) -> Self {
        Self {
            platform,
            self_cache: Arc::new(SelfPresenceCache::new()),
            normalizer: Arc::new(Normalizer::default()),
            guild_id,
            owner_id,
        }
    }

    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    /// Platform used for member lookups
    pub fn platform(&self) -> &dyn PresencePlatform {
        self.platform.as_ref()
    }

    /// The cached owner record
    pub fn self_cache(&self) -> &SelfPresenceCache {
        &self.self_cache
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Guild all lookups are resolved in
    pub fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    /// The owner whose presence is cached
    pub fn owner_id(&self) -> Snowflake {
        self.owner_id
    }

    /// Whether `user_id` is the owner
    pub fn is_owner(&self, user_id: Snowflake) -> bool {
        self.owner_id == user_id
    }
}

impl fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContext")
            .field("guild_id", &self.guild_id)
            .field("owner_id", &self.owner_id)
            .field("normalizer", &self.normalizer)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    platform: Option<Arc<dyn PresencePlatform>>,
    self_cache: Option<Arc<SelfPresenceCache>>,
    normalizer: Option<Normalizer>,
    guild_id: Option<Snowflake>,
    owner_id: Option<Snowflake>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            platform: None,
            self_cache: None,
            normalizer: None,
            guild_id: None,
            owner_id: None,
        }
    }

    pub fn platform(mut self, platform: Arc<dyn PresencePlatform>) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Share an existing owner record
    pub fn self_cache(mut self, cache: Arc<SelfPresenceCache>) -> Self {
        self.self_cache = Some(cache);
        self
    }

    pub fn normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn guild_id(mut self, guild_id: Snowflake) -> Self {
        self.guild_id = Some(guild_id);
        self
    }

    pub fn owner_id(mut self, owner_id: Snowflake) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Build the context
    ///
    /// # Errors
    /// Returns a validation error if the platform or an identifier is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            platform: self
                .platform
                .ok_or_else(|| ServiceError::validation("platform is required"))?,
            self_cache: self.self_cache.unwrap_or_default(),
            normalizer: Arc::new(self.normalizer.unwrap_or_default()),
            guild_id: self
                .guild_id
                .ok_or_else(|| ServiceError::validation("guild_id is required"))?,
            owner_id: self
                .owner_id
                .ok_or_else(|| ServiceError::validation("owner_id is required"))?,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
