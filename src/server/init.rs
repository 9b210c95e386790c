/**
 * Server Initialization
 *
 * This module assembles the gateway and sequences startup against the
 * storage connection.
 *
 * # Initialization Process
 *
 * 1. Create the storage connector and shared state
 * 2. Resolve the content-delivery strategy for the runtime mode
 * 3. Assemble the router (API routes, catch-all, layers)
 * 4. Order listening against `connect()` per the startup policy
 *
 * # Startup Policies
 *
 * - `connect-first` (default): storage must be reachable before the
 *   listener is bound. A connect failure aborts startup, so the process
 *   never accepts a request it cannot serve.
 * - `listen-first`: the listener is bound immediately and the connect
 *   runs in the background. A connect failure is logged and requests keep
 *   being served; the status endpoints report the failed state.
 */

use axum::Router;

use crate::config::{GatewayConfig, StartupPolicy};
use crate::content::ContentDelivery;
use crate::error::GatewayError;
use crate::routes::api::ApiRouters;
use crate::routes::create_router;
use crate::server::state::AppState;
use crate::storage::StorageConnector;

/// Assemble the gateway application.
///
/// The storage connector and handler groups are passed in rather than
/// created here, so callers (the binary, tests) control both.
///
/// # Errors
///
/// Fails when the content-delivery strategy cannot be resolved (missing
/// asset bundle in production) or the trusted origin is not a valid
/// header value.
pub fn create_app(
    config: &GatewayConfig,
    groups: ApiRouters,
    storage: StorageConnector,
) -> Result<Router, GatewayError> {
    tracing::info!("Initializing xfchat gateway ({} mode)", config.mode.as_str());

    // Step 1: Shared state
    let state = AppState::new(storage);

    // Step 2: Resolve the content-delivery strategy once
    let delivery = ContentDelivery::from_config(config)?;

    // Step 3: Assemble the router
    create_router(config, state, groups, &delivery)
}

/// Run the gateway to completion.
///
/// Applies the configured startup policy, binds the listener, and serves
/// until a shutdown signal arrives.
///
/// # Errors
///
/// Everything fatal: configuration problems surfaced during assembly, a
/// storage connect failure under `connect-first`, a bind failure, or an
/// accept-loop failure.
pub async fn run(config: GatewayConfig, groups: ApiRouters) -> Result<(), GatewayError> {
    let storage = StorageConnector::new(config.database_url.clone());
    let app = create_app(&config, groups, storage.clone())?;

    match config.startup_policy {
        StartupPolicy::ConnectFirst => {
            // No listener until storage is ready.
            storage.connect().await?;
        }
        StartupPolicy::ListenFirst => {
            let connector = storage.clone();
            tokio::spawn(async move {
                if let Err(e) = connector.connect().await {
                    tracing::error!("DB connect failed: {}", e);
                }
            });
        }
    }

    serve(&config, app).await
}

async fn serve(config: &GatewayConfig, app: Router) -> Result<(), GatewayError> {
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| GatewayError::Bind { addr, source })?;

    tracing::info!("Server is running on port {}", config.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
