/**
 * Router Configuration
 *
 * This module assembles the gateway router from its parts, in priority
 * order:
 *
 * 1. API routes (`/api/auth`, `/api/users`, `/api/chat`)
 * 2. Content delivery as the catch-all (static bundle or dev proxy)
 * 3. Cross-origin layer (one trusted origin, credentials allowed)
 * 4. Request tracing (outermost)
 *
 * # Route Priority
 *
 * Registered routes always win over the catch-all, so content delivery
 * only ever sees requests no API route claimed. The catch-all is the
 * router's fallback, never a wildcard route pattern, which keeps the
 * route table free of overlapping registrations.
 */

use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{ConfigError, GatewayConfig};
use crate::content::ContentDelivery;
use crate::error::GatewayError;
use crate::routes::api::{configure_api_routes, ApiRouters};
use crate::server::state::AppState;

/// Assemble the gateway router.
///
/// # Arguments
///
/// * `config` - validated gateway configuration
/// * `state` - shared application state
/// * `groups` - the API handler groups to mount
/// * `delivery` - the resolved content-delivery strategy
///
/// # Returns
///
/// A router ready to serve, with state applied.
pub fn create_router(
    config: &GatewayConfig,
    state: AppState,
    groups: ApiRouters,
    delivery: &ContentDelivery,
) -> Result<Router, GatewayError> {
    let cors = build_cors_layer(&config.frontend_origin)?;

    // API routes first, then the catch-all for everything unclaimed.
    let router = configure_api_routes(Router::new(), groups);
    let router = delivery.attach(router);

    Ok(router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Cross-origin layer for the single trusted origin.
///
/// Credentialed requests are allowed, so the origin is always echoed
/// exactly and the allowed headers mirror the preflight request instead
/// of using a wildcard.
fn build_cors_layer(origin: &str) -> Result<CorsLayer, GatewayError> {
    let origin = HeaderValue::from_str(origin).map_err(|_| {
        GatewayError::from(ConfigError::InvalidValue {
            var: "FRONTEND_ORIGIN",
            value: origin.to_string(),
            reason: "not a valid header value",
        })
    })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request()))
}
