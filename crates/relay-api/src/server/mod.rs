//! Server setup and initialization
//!
//! Wires the gateway client, the platform adapter, and the HTTP server
//! together and runs them until shutdown.

use std::future::IntoFuture;
use std::sync::Arc;

use axum::Router;
use relay_common::{AppConfig, AppError, RateLimitConfig};
use relay_gateway::{
    DiscordHttp, DiscordPlatform, GatewayClient, GatewayConfig, GatewayError, GatewayState,
    RelayHandler,
};
use relay_service::ServiceContext;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::middleware::{apply_middleware, apply_rate_limit};
use crate::routes::{health_routes, lookup_routes, self_status_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Only live lookups are rate limited.
///
/// # Errors
/// Fails when the rate limit settings are unusable.
pub fn create_app(state: AppState, rate_limit: &RateLimitConfig) -> Result<Router, AppError> {
    let lookups = apply_rate_limit(lookup_routes(), rate_limit)?;
    let api = self_status_routes().merge(lookups);
    let router = Router::new().nest("/api", api).merge(health_routes());
    Ok(apply_middleware(router).with_state(state))
}

/// Build the platform adapter, the service context, and the gateway client
pub fn create_components(
    config: &AppConfig,
) -> Result<(ServiceContext, GatewayClient), AppError> {
    let gateway_state = GatewayState::new_shared();
    let http = DiscordHttp::new(
        &config.discord.token,
        config.discord.api_url.clone(),
        config.discord.request_timeout(),
    )
    .map_err(AppError::config)?;

    let platform = Arc::new(DiscordPlatform::new(Arc::clone(&gateway_state), http));
    let service_context = ServiceContext::builder()
        .platform(platform)
        .guild_id(config.discord.guild_id)
        .owner_id(config.discord.user_id)
        .build()?;

    let handler = Arc::new(RelayHandler::new(service_context.clone()));
    let client = GatewayClient::new(
        GatewayConfig::from_settings(&config.discord, &config.gateway),
        gateway_state,
        handler,
    );

    Ok((service_context, client))
}

/// Run the complete server with configuration
///
/// Returns when a shutdown signal arrives, or with an error when the gateway
/// rejects the bot's credentials or intents.
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let (service_context, client) = create_components(&config)?;
    let app = create_app(AppState::new(service_context), &config.rate_limit)?;

    let addr = config.api.address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::config(format!("Failed to bind to {addr}: {e}")))?;
    info!(address = %addr, "Server listening");

    let mut gateway: JoinHandle<Result<(), GatewayError>> = tokio::spawn(client.run());
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    tokio::select! {
        result = server => {
            gateway.abort();
            result.map_err(AppError::internal)?;
            info!("Server shut down");
            Ok(())
        }
        joined = &mut gateway => {
            let err = match joined {
                Ok(Ok(())) => return Ok(()),
                Ok(Err(e)) => e.to_string(),
                Err(e) => format!("gateway task ended: {e}"),
            };
            error!(error = %err, "Gateway stopped");
            Err(AppError::ExternalService(err))
        }
    }
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received");
}
