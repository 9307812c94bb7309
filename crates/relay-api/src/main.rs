//! presence-relay entry point
//!
//! Run with:
//! ```bash
//! cargo run -p relay-api --bin presence-relay
//! ```
//!
//! Configuration is loaded from environment variables or a `.env` file.

use anyhow::Context;
use relay_common::{try_init_tracing, try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = ?e, "Presence relay stopped");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Log with defaults so the failure is still visible
            let _ = try_init_tracing();
            return Err(e).context("Failed to load configuration");
        }
    };

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        name = %config.app.name,
        env = ?config.app.env,
        port = config.api.port,
        guild_id = %config.discord.guild_id,
        user_id = %config.discord.user_id,
        "Starting presence relay"
    );

    relay_api::run(config).await.context("Server failed")?;

    Ok(())
}
