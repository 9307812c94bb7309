//! Status service
//!
//! Refreshes the cached owner record and answers presence lookups.

use std::sync::Arc;

use relay_core::Snowflake;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn, Instrument};

use crate::cache::RecordState;
use crate::dto::{PresenceSnapshot, ReadinessResponse};
use crate::normalizer::has_unrecognized_status;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Status service
pub struct StatusService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StatusService<'a> {
    /// Create a new StatusService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Re-resolve the owner and overwrite the cached record
    ///
    /// Failures are logged and degrade the record to offline, keeping the
    /// last known avatar and username. Overlapping calls are not serialized;
    /// whichever finishes last wins.
    #[instrument(skip(self), fields(guild_id = %self.ctx.guild_id(), user_id = %self.ctx.owner_id()))]
    pub async fn refresh_self(&self) -> RecordState {
        let result = self
            .ctx
            .platform()
            .fetch_member(self.ctx.guild_id(), self.ctx.owner_id())
            .await;

        match result {
            Ok(member) => {
                let snapshot = self
                    .ctx
                    .normalizer()
                    .normalize(member.presence.as_ref(), Some(&member.user));
                if has_unrecognized_status(&snapshot) {
                    debug!(status = %snapshot.status, "Forwarding unrecognized status");
                }
                info!(
                    status = %snapshot.status,
                    activities = snapshot.activities.len(),
                    "Owner presence refreshed"
                );
                self.ctx.self_cache().replace(snapshot);
                RecordState::Fresh
            }
            Err(e) => {
                warn!(error = %e, code = e.code(), "Owner presence refresh failed, record degraded");
                self.ctx.self_cache().degrade();
                RecordState::Degraded
            }
        }
    }

    /// The cached owner record; no platform call
    pub fn get_self(&self) -> Arc<PresenceSnapshot> {
        self.ctx.self_cache().snapshot()
    }

    /// Live lookup of any user in the configured guild, uncached
    ///
    /// # Errors
    /// Not found when the guild, member, or user is unknown; internal for a
    /// malformed identifier or any transport failure.
    #[instrument(skip(self))]
    pub async fn get_user(&self, raw_user_id: &str) -> ServiceResult<PresenceSnapshot> {
        let user_id = Snowflake::parse(raw_user_id).map_err(|e| {
            warn!(user_id = raw_user_id, error = %e, "Rejected malformed user id");
            ServiceError::from(relay_core::DomainError::InvalidId(raw_user_id.to_string()))
        })?;

        let member = self
            .ctx
            .platform()
            .fetch_member(self.ctx.guild_id(), user_id)
            .await
            .map_err(|e| {
                warn!(%user_id, error = %e, code = e.code(), "User lookup failed");
                ServiceError::from(e)
            })?;

        Ok(self
            .ctx
            .normalizer()
            .normalize(member.presence.as_ref(), Some(&member.user)))
    }

    /// Gateway and owner record readiness
    pub fn readiness(&self) -> ReadinessResponse {
        ReadinessResponse::ready(
            self.ctx.platform().is_ready(),
            self.ctx.self_cache().state() == RecordState::Fresh,
        )
    }
}

/// Run [`StatusService::refresh_self`] on its own task
///
/// Used by event handlers so the gateway read loop never waits on REST.
pub fn spawn_refresh(ctx: &ServiceContext, trigger: &'static str) -> JoinHandle<RecordState> {
    let ctx = ctx.clone();
    let span = tracing::info_span!("refresh", trigger);
    tokio::spawn(async move { StatusService::new(&ctx).refresh_self().await }.instrument(span))
}
