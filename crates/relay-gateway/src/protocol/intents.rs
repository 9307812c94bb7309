//! Gateway intents

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Event groups the session subscribes to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Intents: u64 {
        const GUILDS = 1 << 0;
        /// Privileged
        const GUILD_MEMBERS = 1 << 1;
        /// Privileged
        const GUILD_PRESENCES = 1 << 8;
    }
}

impl Intents {
    /// What the relay needs: guild sync, member identities, presences
    #[must_use]
    pub const fn relay() -> Self {
        Self::GUILDS
            .union(Self::GUILD_MEMBERS)
            .union(Self::GUILD_PRESENCES)
    }
}

impl Default for Intents {
    fn default() -> Self {
        Self::relay()
    }
}

impl Serialize for Intents {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.bits())
    }
}

impl<'de> Deserialize<'de> for Intents {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Self::from_bits_retain)
    }
}
