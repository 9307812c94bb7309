//! Gateway client
//!
//! Keeps one gateway session alive: reconnects with exponential backoff,
//! resumes when the session allows it, and stops only on a fatal close.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use relay_common::{DiscordConfig, GatewaySettings};
use tracing::{error, info, warn};

use crate::connection::{Connection, Session};
use crate::error::{GatewayError, GatewayResult};
use crate::handlers::EventHandler;
use crate::protocol::Intents;
use crate::state::GatewayState;

/// Default gateway endpoint, API v10 with JSON encoding
pub const DEFAULT_GATEWAY_URL: &str = "wss://gateway.discord.gg/?v=10&encoding=json";

/// Gateway client settings
#[derive(Clone)]
pub struct GatewayConfig {
    pub token: String,
    pub url: String,
    pub intents: Intents,
    /// First reconnect delay; doubles up to `max_reconnect_delay`
    pub reconnect_delay: Duration,
    pub max_reconnect_delay: Duration,
    /// How long to wait for the guilds listed in READY
    pub ready_timeout: Duration,
    /// Applies to the TCP/TLS connect and to waiting for Hello
    pub connect_timeout: Duration,
}

impl GatewayConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            url: DEFAULT_GATEWAY_URL.to_string(),
            intents: Intents::relay(),
            reconnect_delay: Duration::from_secs(1),
            max_reconnect_delay: Duration::from_secs(60),
            ready_timeout: Duration::from_secs(15),
            connect_timeout: Duration::from_secs(15),
        }
    }

    /// Settings from the application configuration
    pub fn from_settings(discord: &DiscordConfig, gateway: &GatewaySettings) -> Self {
        Self {
            url: gateway.url.clone(),
            reconnect_delay: Duration::from_secs(gateway.reconnect_delay_secs.max(1)),
            max_reconnect_delay: Duration::from_secs(gateway.max_reconnect_delay_secs.max(1)),
            ready_timeout: Duration::from_secs(gateway.ready_timeout_secs),
            connect_timeout: discord.request_timeout(),
            ..Self::new(discord.token.clone())
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    #[must_use]
    pub fn with_reconnect_delay(mut self, base: Duration, max: Duration) -> Self {
        self.reconnect_delay = base;
        self.max_reconnect_delay = max.max(base);
        self
    }

    #[must_use]
    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("token", &"[redacted]")
            .field("url", &self.url)
            .field("intents", &self.intents)
            .field("reconnect_delay", &self.reconnect_delay)
            .field("max_reconnect_delay", &self.max_reconnect_delay)
            .field("ready_timeout", &self.ready_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Long-running gateway client
pub struct GatewayClient {
    config: GatewayConfig,
    state: Arc<GatewayState>,
    handler: Arc<dyn EventHandler>,
    session: Session,
}

impl GatewayClient {
    pub fn new(
        config: GatewayConfig,
        state: Arc<GatewayState>,
        handler: Arc<dyn EventHandler>,
    ) -> Self {
        Self {
            config,
            state,
            handler,
            session: Session::new(),
        }
    }

    pub fn state(&self) -> &Arc<GatewayState> {
        &self.state
    }

    /// Connect and stay connected
    ///
    /// # Errors
    /// Returns only when the gateway closes with a code that reconnecting
    /// cannot fix, such as a bad token or disallowed intents.
    pub async fn run(mut self) -> GatewayResult<()> {
        let mut delay = self.config.reconnect_delay;

        loop {
            let mut connection = Connection::new(
                &self.config,
                &self.state,
                self.handler.as_ref(),
                &mut self.session,
            );
            let result = connection.run().await;
            let established = connection.established();

            self.state.set_ready(false);

            let err = match result {
                Ok(()) => GatewayError::Closed {
                    code: None,
                    reason: "stream ended".to_string(),
                },
                Err(e) => e,
            };

            if err.is_fatal() {
                error!(error = %err, "Gateway connection failed permanently");
                return Err(err);
            }

            if !err.can_resume() && self.session.resumable().is_some() {
                info!("Session cannot be resumed, identifying on next connect");
                self.session.reset();
            }

            if established {
                delay = self.config.reconnect_delay;
            }

            let wait = match err {
                // Identify again only after a short random pause
                GatewayError::InvalidSession { .. } => {
                    Duration::from_millis(rand::thread_rng().gen_range(1_000..=5_000))
                }
                _ => delay,
            };

            warn!(
                error = %err,
                close_code = ?err.close_code(),
                wait_ms = wait.as_millis() as u64,
                "Gateway disconnected, reconnecting"
            );
            tokio::time::sleep(wait).await;

            if !established {
                delay = (delay * 2).min(self.config.max_reconnect_delay);
            }
        }
    }
}

impl fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayClient")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
