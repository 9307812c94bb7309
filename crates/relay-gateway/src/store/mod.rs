//! In-memory platform state fed by gateway events

mod guild_cache;

pub use guild_cache::GuildCache;
