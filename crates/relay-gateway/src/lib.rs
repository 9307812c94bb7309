//! # relay-gateway
//!
//! Discord gateway client and the [`PresencePlatform`](relay_core::PresencePlatform)
//! adapter built on it.
//!
//! The client keeps a session open, mirrors guilds, members, and presences
//! into a [`GuildCache`], and reports events to an [`EventHandler`].
//! [`DiscordPlatform`] answers member lookups from that cache with a REST
//! fallback.

pub mod client;
pub mod connection;
pub mod error;
pub mod events;
pub mod handlers;
pub mod platform;
pub mod protocol;
pub mod rest;
pub mod state;
pub mod store;

pub use client::{GatewayClient, GatewayConfig, DEFAULT_GATEWAY_URL};
pub use error::{GatewayError, GatewayResult};
pub use handlers::{EventHandler, ReadyInfo, RelayHandler};
pub use platform::DiscordPlatform;
pub use rest::{DiscordHttp, RestError, DEFAULT_API_URL};
pub use state::GatewayState;
pub use store::GuildCache;
