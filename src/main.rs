/**
 * XFChat Gateway Entry Point
 *
 * Loads the environment, initializes tracing, and runs the gateway. Any
 * fatal error is logged and the process exits non-zero, so supervisors
 * see a failed start instead of a silently degraded one.
 */

use xfchat::config::GatewayConfig;
use xfchat::routes::ApiRouters;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    // Initialize tracing, filtered by RUST_LOG
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Starting xfchat gateway: mode={}, policy={}, port={}",
        config.mode.as_str(),
        config.startup_policy.as_str(),
        config.port
    );

    if let Err(e) = xfchat::server::run(config, ApiRouters::defaults()).await {
        tracing::error!("Gateway failed: {}", e);
        std::process::exit(1);
    }
}
