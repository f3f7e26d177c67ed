//! Moderation API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p curator-api
//! ```
//!
//! Configuration is loaded from environment variables or a `.env` file.

use curator_common::{init_tracing, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Loads .env before reading the environment
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_tracing(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        port = config.api.port,
        redis = config.redis.is_some(),
        "Configuration loaded"
    );

    if let Err(e) = curator_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
