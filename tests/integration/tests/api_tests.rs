//! API Integration Tests
//!
//! Each test spawns the server on an ephemeral port in front of a scripted
//! platform. No credentials or network access needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use integration_tests::{
    assert_json, assert_status, fixtures::*, TestServer,
};
use relay_common::RateLimitConfig;
use relay_core::{Activity, ActivityType, PresenceStatus, Snowflake};
use relay_service::{spawn_refresh, PresenceSnapshot, RecordState};
use reqwest::StatusCode;
use serde_json::Value;

const OTHER_ID: Snowflake = Snowflake::new(300);

fn owner_online() -> Scripted {
    Scripted::Member(member(
        OWNER_ID,
        "owner",
        Some(presence(
            OWNER_ID,
            "dnd",
            vec![
                Activity::new(ActivityType::Playing, "Factorio").with_details("Building a bus"),
                Activity::new(ActivityType::Custom, ""),
                spotify("Song Title", "Artist Name", "ab67616d0000b273"),
            ],
        )),
    ))
}

async fn server_with_owner() -> TestServer {
    let platform = Arc::new(ScriptedPlatform::new());
    platform.set(OWNER_ID, owner_online());
    TestServer::start(platform).await.expect("Failed to start server")
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = server_with_owner().await;
    let response = server.get("/health").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready_follows_owner_record() {
    let server = server_with_owner().await;

    let response = server.get("/health/ready").await.unwrap();
    assert_status(response, StatusCode::SERVICE_UNAVAILABLE)
        .await
        .unwrap();

    assert_eq!(server.refresh_self().await, RecordState::Fresh);

    let response = server.get("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["self_record"], "fresh");
}

// ============================================================================
// Owner Status Tests
// ============================================================================

#[tokio::test]
async fn test_self_status_before_first_refresh() {
    let server = server_with_owner().await;

    let response = server.get("/api/status").await.unwrap();
    let snapshot: PresenceSnapshot = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(snapshot, PresenceSnapshot::default());

    // Served from the cache only
    assert_eq!(server.platform.calls(), 0);
}

#[tokio::test]
async fn test_self_status_after_refresh() {
    let server = server_with_owner().await;
    server.refresh_self().await;

    let response = server.get("/api/status").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["status"], "dnd");
    assert_eq!(body["username"], "owner");
    assert_eq!(
        body["avatar"],
        "https://cdn.discordapp.com/avatars/175928847299117063/ownerhash.webp"
    );

    let activities = body["activities"].as_array().unwrap();
    assert_eq!(activities.len(), 2);
    assert_eq!(activities[0]["name"], "Factorio");
    assert_eq!(activities[0]["type"], 0);
    assert_eq!(activities[0]["details"], "Building a bus");
    assert_eq!(activities[0]["state"], Value::Null);

    let spotify = &activities[1];
    assert_eq!(spotify["type"], 2);
    assert_eq!(
        spotify["albumArtUrl"],
        "https://i.scdn.co/image/ab67616d0000b273"
    );
    assert_eq!(spotify["song"], "Song Title");
    assert_eq!(spotify["artist"], "Artist Name");

    // Repeated reads are identical
    let again: Value = assert_json(server.get("/api/status").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(body, again);
}

#[tokio::test]
async fn test_self_status_degrades_on_failed_refresh() {
    let server = server_with_owner().await;
    server.refresh_self().await;

    server.platform.set(OWNER_ID, Scripted::Transport);
    assert_eq!(server.refresh_self().await, RecordState::Degraded);

    let response = server.get("/api/status").await.unwrap();
    let snapshot: PresenceSnapshot = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(snapshot.status, PresenceStatus::Offline);
    assert!(snapshot.activities.is_empty());
    assert_eq!(snapshot.username, "owner");
    assert!(snapshot.avatar.ends_with("ownerhash.webp"));
}

#[tokio::test]
async fn test_self_status_never_mixes_refreshes() {
    let platform = Arc::new(ScriptedPlatform::new());
    let alpha = member(
        OWNER_ID,
        "alpha",
        Some(presence(
            OWNER_ID,
            "online",
            vec![Activity::new(ActivityType::Playing, "alpha")],
        )),
    );
    let beta = member(
        OWNER_ID,
        "beta",
        Some(presence(
            OWNER_ID,
            "idle",
            vec![Activity::new(ActivityType::Watching, "beta")],
        )),
    );
    platform.set(
        OWNER_ID,
        Scripted::Rotating(vec![
            (Duration::from_millis(3), alpha),
            (Duration::from_millis(1), beta),
        ]),
    );
    let server = TestServer::start(platform).await.unwrap();

    let refreshes: Vec<_> = (0..20)
        .map(|_| spawn_refresh(server.context(), "test"))
        .collect();

    let mut seen = HashSet::new();
    for _ in 0..20 {
        let snapshot: PresenceSnapshot =
            assert_json(server.get("/api/status").await.unwrap(), StatusCode::OK)
                .await
                .unwrap();

        let consistent = match snapshot.username.as_str() {
            "" => snapshot == PresenceSnapshot::default(),
            "alpha" => {
                snapshot.status == PresenceStatus::Online && snapshot.activities[0].name == "alpha"
            }
            "beta" => {
                snapshot.status == PresenceStatus::Idle && snapshot.activities[0].name == "beta"
            }
            other => panic!("unexpected username {other}"),
        };
        assert!(consistent, "mixed record: {snapshot:?}");
        seen.insert(snapshot.username);
    }

    for refresh in refreshes {
        assert_eq!(refresh.await.unwrap(), RecordState::Fresh);
    }
    assert!(!seen.is_empty());
}

// ============================================================================
// User Lookup Tests
// ============================================================================

#[tokio::test]
async fn test_user_lookup_with_presence() {
    let server = server_with_owner().await;
    server.platform.set(
        OTHER_ID,
        Scripted::Member(member(
            OTHER_ID,
            "someone",
            Some(presence(OTHER_ID, "idle", vec![])),
        )),
    );

    let response = server.get("/api/status/300").await.unwrap();
    let snapshot: PresenceSnapshot = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(snapshot.status, PresenceStatus::Idle);
    assert_eq!(snapshot.username, "someone");

    // Lookups leave the owner record alone
    let own: PresenceSnapshot = assert_json(server.get("/api/status").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(own, PresenceSnapshot::default());
}

#[tokio::test]
async fn test_user_lookup_without_presence_is_offline() {
    let server = server_with_owner().await;
    server
        .platform
        .set(OTHER_ID, Scripted::Member(member(OTHER_ID, "quiet", None)));

    let response = server.get("/api/status/300").await.unwrap();
    let snapshot: PresenceSnapshot = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(snapshot.status, PresenceStatus::Offline);
    assert!(snapshot.activities.is_empty());
    assert_eq!(snapshot.username, "quiet");
    assert!(snapshot.avatar.ends_with("quiethash.webp"));
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let server = server_with_owner().await;

    let response = server.get("/api/status/999").await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert!(!body.error.is_empty());
}

#[tokio::test]
async fn test_missing_guild_is_not_found() {
    let server = server_with_owner().await;
    server.platform.set(OTHER_ID, Scripted::GuildMissing);

    let response = server.get("/api/status/300").await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body.error, "Guild not found");
}

#[tokio::test]
async fn test_platform_failure_is_internal_error() {
    let server = server_with_owner().await;
    server.platform.set(OTHER_ID, Scripted::Transport);

    let response = server.get("/api/status/300").await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::INTERNAL_SERVER_ERROR)
        .await
        .unwrap();
    assert_eq!(body.error, "Internal server error");
}

#[tokio::test]
async fn test_malformed_user_id_is_internal_error() {
    let server = server_with_owner().await;

    let response = server.get("/api/status/not-a-snowflake").await.unwrap();
    assert_status(response, StatusCode::INTERNAL_SERVER_ERROR)
        .await
        .unwrap();
    assert_eq!(server.platform.calls(), 0);
}

// ============================================================================
// Cross-cutting Tests
// ============================================================================

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let server = server_with_owner().await;

    for path in ["/api/status", "/api/status/999", "/health"] {
        let response = server
            .get_with_origin(path, "https://portfolio.example")
            .await
            .unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*",
            "missing CORS header on {path}"
        );
        assert!(response.headers().contains_key("x-request-id"));
    }
}

#[tokio::test]
async fn test_rate_limit_spares_cached_status() {
    let platform = Arc::new(ScriptedPlatform::new());
    let server = TestServer::start_with_rate_limit(
        platform,
        RateLimitConfig {
            requests_per_second: 5,
            burst: 2,
        },
    )
    .await
    .unwrap();

    for _ in 0..30 {
        let response = server.get("/api/status").await.unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }

    let mut limited = None;
    for _ in 0..10 {
        let response = server.get("/api/status/999").await.unwrap();
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            limited = Some(response);
            break;
        }
    }
    let response = limited.expect("live lookups should be rate limited");
    let body: ErrorBody = assert_json(response, StatusCode::TOO_MANY_REQUESTS)
        .await
        .unwrap();
    assert!(!body.error.is_empty());

    for _ in 0..4 {
        let response = server.get("/health").await.unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }
}
