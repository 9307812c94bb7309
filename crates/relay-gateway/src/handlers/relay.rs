//! Handler that keeps the owner record current

use async_trait::async_trait;
use relay_core::Presence;
use relay_service::{spawn_refresh, ServiceContext};
use tracing::debug;

use super::{EventHandler, ReadyInfo};

/// Refreshes the owner record on ready and on the owner's presence changes
///
/// Both triggers spawn an independent refresh.
#[derive(Debug, Clone)]
pub struct RelayHandler {
    ctx: ServiceContext,
}

impl RelayHandler {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl EventHandler for RelayHandler {
    async fn on_ready(&self, ready: &ReadyInfo) {
        debug!(session_id = %ready.session_id, guilds = ready.guilds, "Refreshing owner after ready");
        spawn_refresh(&self.ctx, "ready");
    }

    async fn on_presence_update(&self, presence: &Presence) {
        if self.ctx.is_owner(presence.user_id) {
            debug!(status = %presence.status, "Owner presence changed");
            spawn_refresh(&self.ctx, "presence_update");
        }
    }
}
