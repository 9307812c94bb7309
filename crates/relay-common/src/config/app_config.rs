//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use relay_core::Snowflake;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub discord: DiscordConfig,
    pub gateway: GatewaySettings,
    pub rate_limit: RateLimitConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Platform credentials and the identifiers the relay watches
#[derive(Clone)]
pub struct DiscordConfig {
    /// Bot token used for both the gateway and REST
    pub token: String,
    /// Guild the owner and looked-up users are resolved in
    pub guild_id: Snowflake,
    /// The owner whose presence is cached
    pub user_id: Snowflake,
    pub api_url: String,
    pub request_timeout_secs: u64,
}

impl DiscordConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &"[redacted]")
            .field("guild_id", &self.guild_id)
            .field("user_id", &self.user_id)
            .field("api_url", &self.api_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Gateway connection settings
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub url: String,
    pub reconnect_delay_secs: u64,
    pub max_reconnect_delay_secs: u64,
    /// How long to wait for the guilds listed in READY before declaring the session ready
    pub ready_timeout_secs: u64,
}

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

// Default value functions
fn default_app_name() -> String {
    "presence-relay".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_api_url() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_gateway_url() -> String {
    "wss://gateway.discord.gg/?v=10&encoding=json".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

fn default_reconnect_delay() -> u64 {
    1
}

fn default_max_reconnect_delay() -> u64 {
    60
}

fn default_ready_timeout() -> u64 {
    15
}

fn default_requests_per_second() -> u32 {
    5
}

fn default_burst() -> u32 {
    20
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let snowflake = |key: &'static str| -> Result<Snowflake, ConfigError> {
            let raw = lookup(key).ok_or(ConfigError::MissingVar(key))?;
            Snowflake::parse(raw.trim()).map_err(|_| ConfigError::InvalidValue(key, raw))
        };

        let parsed = |key: &'static str| parse_var::<u64, _>(&lookup, key);
        let port = parse_var(&lookup, "PORT")?.unwrap_or_else(default_port);

        let token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingVar("DISCORD_TOKEN"))?;

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .as_deref()
                    .and_then(Environment::parse)
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(default_host),
                port,
            },
            discord: DiscordConfig {
                token: token.trim().to_string(),
                guild_id: snowflake("GUILD_ID")?,
                user_id: snowflake("USER_ID")?,
                api_url: lookup("DISCORD_API_URL").unwrap_or_else(default_api_url),
                request_timeout_secs: parsed("DISCORD_REQUEST_TIMEOUT_SECS")?
                    .unwrap_or_else(default_request_timeout),
            },
            gateway: GatewaySettings {
                url: lookup("DISCORD_GATEWAY_URL").unwrap_or_else(default_gateway_url),
                reconnect_delay_secs: parsed("GATEWAY_RECONNECT_DELAY_SECS")?
                    .unwrap_or_else(default_reconnect_delay),
                max_reconnect_delay_secs: parsed("GATEWAY_MAX_RECONNECT_DELAY_SECS")?
                    .unwrap_or_else(default_max_reconnect_delay),
                ready_timeout_secs: parsed("GATEWAY_READY_TIMEOUT_SECS")?
                    .unwrap_or_else(default_ready_timeout),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_var(&lookup, "RATE_LIMIT_REQUESTS_PER_SECOND")?
                    .unwrap_or_else(default_requests_per_second),
                burst: parse_var(&lookup, "RATE_LIMIT_BURST")?.unwrap_or_else(default_burst),
            },
        })
    }
}

/// Parse an optional variable; present but malformed is an error
fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key, raw.clone()))
        })
        .transpose()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
