//! reqwest-backed REST client

use relay_core::Snowflake;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use std::time::Duration;

use super::error::{ApiErrorBody, RestError};
use crate::events::MemberPayload;

/// Default REST base URL
pub const DEFAULT_API_URL: &str = "https://discord.com/api/v10";

/// Thin REST client authenticated as the bot
#[derive(Debug, Clone)]
pub struct DiscordHttp {
    http: reqwest::Client,
    base_url: String,
}

impl DiscordHttp {
    /// Create a client with the bot token and a per-request timeout
    pub fn new(
        token: &str,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RestError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bot {token}"))
            .map_err(|_| RestError::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!(
                "DiscordBot (",
                env!("CARGO_PKG_NAME"),
                ", ",
                env!("CARGO_PKG_VERSION"),
                ")"
            )),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /guilds/{guild_id}/members/{user_id}
    pub async fn get_guild_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> Result<MemberPayload, RestError> {
        let url = format!("{}/guilds/{guild_id}/members/{user_id}", self.base_url);
        tracing::debug!(%guild_id, %user_id, "Fetching guild member over REST");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<MemberPayload>().await?);
        }

        let body = response.json::<ApiErrorBody>().await.unwrap_or_default();
        Err(RestError::from_status(status.as_u16(), body))
    }
}
