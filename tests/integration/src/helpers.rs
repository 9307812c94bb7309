//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and making HTTP requests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use relay_api::{create_app, AppState};
use relay_common::RateLimitConfig;
use relay_service::{RecordState, ServiceContext, StatusService};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{ScriptedPlatform, GUILD_ID, OWNER_ID};

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub platform: Arc<ScriptedPlatform>,
    ctx: ServiceContext,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server in front of `platform` with a generous rate limit
    pub async fn start(platform: Arc<ScriptedPlatform>) -> Result<Self> {
        Self::start_with_rate_limit(
            platform,
            RateLimitConfig {
                requests_per_second: 1_000,
                burst: 1_000,
            },
        )
        .await
    }

    pub async fn start_with_rate_limit(
        platform: Arc<ScriptedPlatform>,
        rate_limit: RateLimitConfig,
    ) -> Result<Self> {
        let ctx = ServiceContext::new(platform.clone(), GUILD_ID, OWNER_ID);
        let app = create_app(AppState::new(ctx.clone()), &rate_limit)?;

        // Ephemeral port; the listener is bound before the task starts
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            platform,
            ctx,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// The context the server reads from
    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }

    /// Refresh the owner record, as the gateway handler would
    pub async fn refresh_self(&self) -> RecordState {
        StatusService::new(&self.ctx).refresh_self().await
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request from a browser origin
    pub async fn get_with_origin(&self, path: &str, origin: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .get(&url)
            .header(reqwest::header::ORIGIN, origin)
            .send()
            .await?)
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
