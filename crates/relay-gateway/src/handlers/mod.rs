//! Event handlers
//!
//! The gateway client calls an [`EventHandler`] after it has applied an
//! event to the cache.

mod relay;

pub use relay::RelayHandler;

use async_trait::async_trait;
use relay_core::Presence;

/// Summary of a session that finished its initial sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyInfo {
    pub session_id: String,
    /// Guilds received through GUILD_CREATE before ready fired
    pub guilds: usize,
    /// Guilds listed in READY that never arrived
    pub missing_guilds: usize,
}

/// Receiver of gateway events
///
/// Implementations must not block: the read loop waits for each call.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// The session is identified and guilds are synced
    async fn on_ready(&self, _ready: &ReadyInfo) {}

    /// A presence changed; the cache already holds the new value
    async fn on_presence_update(&self, _presence: &Presence) {}
}
