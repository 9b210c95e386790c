//! Content delivery
//!
//! Everything the API routes do not claim resolves here. Exactly one
//! strategy is wired per process, chosen once at startup from the runtime
//! mode:
//!
//! - production: the built asset bundle with SPA fallback ([`StaticSite`])
//! - development: a transparent bridge to the frontend dev server
//!   ([`DevProxy`])

pub mod assets;
pub mod proxy;

pub use assets::StaticSite;
pub use proxy::DevProxy;

use axum::Router;

use crate::config::{GatewayConfig, RuntimeMode};
use crate::error::GatewayError;

/// The resolved content-delivery strategy.
///
/// The runtime mode is read exactly once, here; requests never re-check it.
#[derive(Debug, Clone)]
pub enum ContentDelivery {
    Static(StaticSite),
    Proxy(DevProxy),
}

impl ContentDelivery {
    /// Resolve the strategy for the configured runtime mode.
    ///
    /// # Errors
    ///
    /// Production fails when the asset bundle is missing or incomplete;
    /// development fails only if the proxy client cannot be built.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        match config.mode {
            RuntimeMode::Production => Ok(Self::Static(StaticSite::new(&config.asset_dir)?)),
            RuntimeMode::Development => Ok(Self::Proxy(DevProxy::new(&config.dev_server)?)),
        }
    }

    /// Install the strategy as the router's catch-all.
    pub fn attach<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        match self {
            Self::Static(site) => site.attach(router),
            Self::Proxy(proxy) => proxy.attach(router),
        }
    }
}
