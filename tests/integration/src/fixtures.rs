//! Test fixtures and a scripted platform

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use relay_core::{
    Activity, ActivityAssets, ActivityType, DomainError, GuildMember, PlatformResult, Presence,
    PresencePlatform, Snowflake, UserIdentity,
};
use serde::Deserialize;

pub const GUILD_ID: Snowflake = Snowflake::new(81_384_788_765_712_384);
pub const OWNER_ID: Snowflake = Snowflake::new(175_928_847_299_117_063);

/// What the platform answers for one user
#[derive(Debug, Clone)]
pub enum Scripted {
    Member(GuildMember),
    /// Answers alternate between the listed members, each after a delay
    Rotating(Vec<(Duration, GuildMember)>),
    MemberMissing,
    GuildMissing,
    Transport,
}

/// [`PresencePlatform`] answering from a per-user script
#[derive(Debug, Default)]
pub struct ScriptedPlatform {
    scripts: RwLock<HashMap<Snowflake, Scripted>>,
    calls: AtomicUsize,
    ready: bool,
}

impl ScriptedPlatform {
    pub fn new() -> Self {
        Self {
            ready: true,
            ..Self::default()
        }
    }

    pub fn set(&self, user_id: Snowflake, script: Scripted) {
        self.scripts.write().insert(user_id, script);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PresencePlatform for ScriptedPlatform {
    async fn fetch_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> PlatformResult<GuildMember> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let script = self.scripts.read().get(&user_id).cloned();

        match script {
            Some(Scripted::Member(member)) => Ok(member),
            Some(Scripted::Rotating(members)) if !members.is_empty() => {
                let (delay, member) = members[call % members.len()].clone();
                tokio::time::sleep(delay).await;
                Ok(member)
            }
            Some(Scripted::GuildMissing) => Err(DomainError::GuildNotFound(guild_id)),
            Some(Scripted::Transport) => {
                Err(DomainError::TransportError("connection reset".to_string()))
            }
            _ => Err(DomainError::MemberNotFound { guild_id, user_id }),
        }
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

/// Member of the test guild with an optional presence
pub fn member(user_id: Snowflake, username: &str, presence: Option<Presence>) -> GuildMember {
    let identity = UserIdentity::new(user_id, username).with_avatar(format!("{username}hash"));
    let member = GuildMember::new(GUILD_ID, identity);
    match presence {
        Some(presence) => member.with_presence(presence),
        None => member,
    }
}

pub fn presence(user_id: Snowflake, status: &str, activities: Vec<Activity>) -> Presence {
    Presence::new(user_id, status).with_activities(activities)
}

pub fn spotify(song: &str, artist: &str, track_image: &str) -> Activity {
    Activity::new(ActivityType::Listening, "Spotify")
        .with_details(song)
        .with_state(artist)
        .with_assets(ActivityAssets {
            large_image: Some(format!("spotify:{track_image}")),
            ..ActivityAssets::default()
        })
}

/// Error response body
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
