//! Activity rules keyed by activity name
//!
//! A rule adds platform-specific fields to an already mapped record.

use relay_core::Activity;
use serde_json::Value;

use crate::dto::ActivityRecord;

/// Image CDN used for Spotify album art
pub const SPOTIFY_IMAGE_BASE_URL: &str = "https://i.scdn.co/image";

/// Extra formatting for activities with a specific name
pub trait ActivityRule: Send + Sync {
    /// Activity name this rule applies to (exact match)
    fn activity_name(&self) -> &str;

    /// Add fields to `record`, derived from the raw `activity`
    fn apply(&self, activity: &Activity, record: &mut ActivityRecord);
}

/// Album art, song, and artist for Spotify listening activities
///
/// Only applies when the activity carries assets.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpotifyRule;

impl SpotifyRule {
    /// Build the album art URL from a `spotify:<id>` large image key
    ///
    /// Takes the segment after the first `:`; a key without one yields an
    /// empty id.
    #[must_use]
    pub fn album_art_url(large_image: Option<&str>) -> String {
        let id = large_image
            .and_then(|key| key.split(':').nth(1))
            .unwrap_or_default();
        format!("{SPOTIFY_IMAGE_BASE_URL}/{id}")
    }
}

impl ActivityRule for SpotifyRule {
    fn activity_name(&self) -> &str {
        "Spotify"
    }

    fn apply(&self, activity: &Activity, record: &mut ActivityRecord) {
        let Some(assets) = &activity.assets else {
            return;
        };

        record.extras.insert(
            "albumArtUrl".to_string(),
            Value::String(Self::album_art_url(assets.large_image.as_deref())),
        );
        // Raw values; empty strings are not nulled here
        record
            .extras
            .insert("song".to_string(), optional_string(activity.details.as_deref()));
        record
            .extras
            .insert("artist".to_string(), optional_string(activity.state.as_deref()));
    }
}

fn optional_string(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |s| Value::String(s.to_string()))
}
