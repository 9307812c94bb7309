//! Gateway events
//!
//! Dispatch payloads the relay consumes, and their mapping onto domain
//! entities.

mod event_types;
mod payloads;

pub use event_types::GatewayEventType;
pub use payloads::{
    ActivityPayload, AssetsPayload, GuildCreateEvent, GuildDeleteEvent, GuildMemberRemoveEvent,
    MemberPayload, PresenceUpdateEvent, ReadyEvent, UnavailableGuild, UserPayload,
};
