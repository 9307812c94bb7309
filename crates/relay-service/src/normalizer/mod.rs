//! Presence normalization
//!
//! Maps platform presence and identity into a [`PresenceSnapshot`]. Pure:
//! no I/O, no shared state.

mod rules;

pub use rules::{ActivityRule, SpotifyRule, SPOTIFY_IMAGE_BASE_URL};

use std::collections::HashMap;
use std::fmt;

use relay_core::{Activity, Presence, PresenceStatus, UserIdentity};

use crate::dto::{ActivityRecord, PresenceSnapshot};

/// Presence normalizer with a set of activity rules keyed by activity name
pub struct Normalizer {
    rules: HashMap<String, Box<dyn ActivityRule>>,
}

impl Normalizer {
    /// Normalizer with no activity rules
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Register a rule, replacing any rule for the same activity name
    #[must_use]
    pub fn with_rule(mut self, rule: impl ActivityRule + 'static) -> Self {
        self.rules
            .insert(rule.activity_name().to_string(), Box::new(rule));
        self
    }

    /// Names of activities that get extra fields
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Normalize a presence and an optional identity
    ///
    /// Each identity field comes from `identity` when it has one, otherwise
    /// from the user embedded in `presence`, otherwise an empty string. A
    /// missing presence means offline with no activities.
    pub fn normalize(
        &self,
        presence: Option<&Presence>,
        identity: Option<&UserIdentity>,
    ) -> PresenceSnapshot {
        let embedded = presence.and_then(|p| p.user.as_ref());
        let (avatar, username) = resolve_identity(identity, embedded);

        let Some(presence) = presence else {
            return PresenceSnapshot::offline(avatar, username);
        };

        PresenceSnapshot {
            status: presence.status.clone(),
            avatar,
            username,
            activities: presence
                .activities
                .iter()
                .filter_map(|activity| self.map_activity(activity))
                .collect(),
        }
    }

    /// Shortcut for a subject with no presence at all
    pub fn offline(&self, identity: Option<&UserIdentity>) -> PresenceSnapshot {
        self.normalize(None, identity)
    }

    fn map_activity(&self, activity: &Activity) -> Option<ActivityRecord> {
        let name = activity.display_name()?;

        let mut record = ActivityRecord::new(activity.kind, name);
        record.details = non_empty(activity.details.as_deref());
        record.state = non_empty(activity.state.as_deref());

        if let Some(rule) = self.rules.get(name) {
            rule.apply(activity, &mut record);
        }

        Some(record)
    }
}

impl Default for Normalizer {
    /// Normalizer with the built-in rules (Spotify)
    fn default() -> Self {
        Self::empty().with_rule(SpotifyRule)
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Avatar URL and username, field by field
///
/// A custom avatar on either identity beats a default avatar.
fn resolve_identity(
    identity: Option<&UserIdentity>,
    embedded: Option<&UserIdentity>,
) -> (String, String) {
    let candidates = || identity.into_iter().chain(embedded);

    let username = candidates()
        .map(|user| user.username.as_str())
        .find(|name| !name.is_empty())
        .unwrap_or_default()
        .to_string();

    let avatar = candidates()
        .find_map(UserIdentity::avatar_url)
        .or_else(|| candidates().next().map(UserIdentity::default_avatar_url))
        .unwrap_or_default();

    (avatar, username)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

/// Whether a snapshot reports a status outside the four known values
pub fn has_unrecognized_status(snapshot: &PresenceSnapshot) -> bool {
    matches!(snapshot.status, PresenceStatus::Other(_))
}
