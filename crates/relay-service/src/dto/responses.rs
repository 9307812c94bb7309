//! Response DTOs
//!
//! `PresenceSnapshot` is the stable client-facing shape returned by both
//! status endpoints.

use chrono::{DateTime, Utc};
use relay_core::{ActivityType, PresenceStatus};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Presence Responses
// ============================================================================

/// Normalized presence of one user
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PresenceSnapshot {
    pub status: PresenceStatus,
    /// Avatar URL, empty when unknown
    pub avatar: String,
    /// Username, empty when unknown
    pub username: String,
    pub activities: Vec<ActivityRecord>,
}

impl PresenceSnapshot {
    /// Offline snapshot carrying only identity fields
    pub fn offline(avatar: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            status: PresenceStatus::Offline,
            avatar: avatar.into(),
            username: username.into(),
            activities: Vec::new(),
        }
    }

    /// Same identity, status forced to offline and activities cleared
    #[must_use]
    pub fn degraded(&self) -> Self {
        Self::offline(self.avatar.clone(), self.username.clone())
    }
}

/// One activity in a snapshot
///
/// Rule-specific fields (e.g. `albumArtUrl`) are flattened into the object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub name: String,
    pub details: Option<String>,
    pub state: Option<String>,
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

impl ActivityRecord {
    pub fn new(kind: ActivityType, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            details: None,
            state: None,
            extras: Map::new(),
        }
    }

    /// Look up an extra field as a string
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extras.get(key).and_then(Value::as_str)
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Per-component readiness
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub gateway: String,
    pub self_record: String,
}

impl ReadinessResponse {
    pub fn ready(gateway_ready: bool, record_fresh: bool) -> Self {
        let all_ready = gateway_ready && record_fresh;
        Self {
            status: if all_ready { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                gateway: if gateway_ready { "connected" } else { "disconnected" }.to_string(),
                self_record: if record_fresh { "fresh" } else { "degraded" }.to_string(),
            },
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
