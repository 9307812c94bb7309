//! Cached presence of the owner
//!
//! The record is swapped as a whole under a write lock, so readers always see
//! a snapshot produced by exactly one refresh.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::dto::PresenceSnapshot;

/// Whether the last write came from a successful refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordState {
    Fresh,
    /// Last refresh failed; status and activities were reset
    #[default]
    Degraded,
}

impl RecordState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Degraded => "degraded",
        }
    }
}

/// Snapshot plus bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct SelfRecord {
    pub snapshot: Arc<PresenceSnapshot>,
    pub state: RecordState,
    /// `None` until the first write
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for SelfRecord {
    fn default() -> Self {
        Self {
            snapshot: Arc::new(PresenceSnapshot::default()),
            state: RecordState::Degraded,
            updated_at: None,
        }
    }
}

/// Holder of the owner's last-known presence
///
/// Starts as an all-default offline snapshot.
#[derive(Debug, Default)]
pub struct SelfPresenceCache {
    record: RwLock<SelfRecord>,
}

impl SelfPresenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot, never blocks on a refresh in flight
    pub fn snapshot(&self) -> Arc<PresenceSnapshot> {
        Arc::clone(&self.record.read().snapshot)
    }

    /// Current snapshot and its bookkeeping
    pub fn record(&self) -> SelfRecord {
        self.record.read().clone()
    }

    pub fn state(&self) -> RecordState {
        self.record.read().state
    }

    /// Replace the record after a successful refresh
    pub fn replace(&self, snapshot: PresenceSnapshot) {
        *self.record.write() = SelfRecord {
            snapshot: Arc::new(snapshot),
            state: RecordState::Fresh,
            updated_at: Some(Utc::now()),
        };
    }

    /// Reset to offline after a failed refresh, keeping avatar and username
    pub fn degrade(&self) {
        let mut record = self.record.write();
        let degraded = record.snapshot.degraded();
        *record = SelfRecord {
            snapshot: Arc::new(degraded),
            state: RecordState::Degraded,
            updated_at: Some(Utc::now()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::ActivityRecord;
    use relay_core::{ActivityType, PresenceStatus};
    use std::thread;

    fn online(username: &str) -> PresenceSnapshot {
        PresenceSnapshot {
            status: PresenceStatus::Online,
            avatar: format!("https://cdn/{username}.png"),
            username: username.to_string(),
            activities: vec![ActivityRecord::new(ActivityType::Playing, username)],
        }
    }

    #[test]
    fn test_initial_record() {
        let cache = SelfPresenceCache::new();
        let record = cache.record();
        assert_eq!(*record.snapshot, PresenceSnapshot::default());
        assert_eq!(record.state, RecordState::Degraded);
        assert!(record.updated_at.is_none());
    }

    #[test]
    fn test_replace_marks_fresh() {
        let cache = SelfPresenceCache::new();
        cache.replace(online("owner"));

        assert_eq!(cache.state(), RecordState::Fresh);
        assert_eq!(cache.snapshot().username, "owner");
        assert!(cache.record().updated_at.is_some());
    }

    #[test]
    fn test_degrade_keeps_identity() {
        let cache = SelfPresenceCache::new();
        cache.replace(online("owner"));
        cache.degrade();

        let snapshot = cache.snapshot();
        assert_eq!(cache.state(), RecordState::Degraded);
        assert_eq!(snapshot.status, PresenceStatus::Offline);
        assert!(snapshot.activities.is_empty());
        assert_eq!(snapshot.username, "owner");
        assert_eq!(snapshot.avatar, "https://cdn/owner.png");
    }

    #[test]
    fn test_degrade_twice_and_recover() {
        let cache = SelfPresenceCache::new();
        cache.replace(online("owner"));
        cache.degrade();
        cache.degrade();
        assert_eq!(cache.snapshot().username, "owner");

        cache.replace(online("owner"));
        assert_eq!(cache.state(), RecordState::Fresh);
        assert_eq!(cache.snapshot().status, PresenceStatus::Online);
    }

    #[test]
    fn test_snapshot_is_stable_between_writes() {
        let cache = SelfPresenceCache::new();
        cache.replace(online("owner"));
        assert_eq!(cache.snapshot(), cache.snapshot());
    }

    #[test]
    fn test_concurrent_writers_never_mix_fields() {
        let cache = Arc::new(SelfPresenceCache::new());
        let writers: Vec<_> = ["alpha", "beta"]
            .into_iter()
            .map(|name| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for _ in 0..500 {
                        cache.replace(online(name));
                    }
                })
            })
            .collect();

        for _ in 0..2000 {
            let snapshot = cache.snapshot();
            if snapshot.username.is_empty() {
                continue;
            }
            let expected = format!("https://cdn/{}.png", snapshot.username);
            assert_eq!(snapshot.avatar, expected);
            assert_eq!(snapshot.activities[0].name, snapshot.username);
        }

        for writer in writers {
            writer.join().unwrap();
        }
    }
}
