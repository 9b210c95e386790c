/**
 * Gateway Configuration
 *
 * This module loads and validates the gateway configuration from
 * environment variables. Every value is resolved exactly once, before any
 * socket is bound, so a bad environment fails the process immediately
 * instead of surfacing mid-request.
 *
 * # Configuration Sources
 *
 * Environment variables, with development-friendly defaults:
 *
 * - `APP_ENV` - `development` (default) or `production`
 * - `PORT` - listen port, default 5001
 * - `VITE_SERVER` - frontend dev server origin, default `http://localhost:5173`
 * - `FRONTEND_ORIGIN` - trusted browser origin; defaults to `VITE_SERVER`
 *   in development, required in production
 * - `ASSET_DIR` - built frontend bundle, default `frontend/dist`
 * - `DATABASE_URL` - storage backend; required under `connect-first`
 * - `STARTUP_POLICY` - `connect-first` (default) or `listen-first`
 *
 * # Error Handling
 *
 * All failures are `ConfigError` values. The binary treats any of them as
 * fatal before the listener exists.
 */

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::HeaderValue;
use thiserror::Error;

/// Runtime mode, resolved once at startup and immutable afterwards.
///
/// The mode selects the content-delivery strategy: `Production` serves the
/// built asset bundle, `Development` proxies to the frontend dev server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
    Development,
    Production,
}

impl RuntimeMode {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "development" => Some(Self::Development),
            "production" => Some(Self::Production),
            _ => None,
        }
    }

    /// Label used in startup logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

/// Ordering of "begin listening" against "storage connected".
///
/// - `ConnectFirst` (default): connect storage before binding the listener;
///   a connect failure aborts startup.
/// - `ListenFirst`: bind immediately and connect in the background; a
///   connect failure is logged and the server keeps serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupPolicy {
    ConnectFirst,
    ListenFirst,
}

impl StartupPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "connect-first" => Some(Self::ConnectFirst),
            "listen-first" => Some(Self::ListenFirst),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConnectFirst => "connect-first",
            Self::ListenFirst => "listen-first",
        }
    }
}

/// Gateway configuration, fully validated.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Runtime mode (content-delivery selector).
    pub mode: RuntimeMode,
    /// Listen port.
    pub port: u16,
    /// Browser origin allowed to make credentialed cross-origin requests.
    pub frontend_origin: String,
    /// Frontend dev server origin (proxy target in development).
    pub dev_server: String,
    /// Built frontend bundle directory (canonicalized in production).
    pub asset_dir: PathBuf,
    /// Storage backend URL, when configured.
    pub database_url: Option<String>,
    /// Startup ordering policy.
    pub startup_policy: StartupPolicy,
}

impl GatewayConfig {
    /// Load the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when a value fails to parse, a required
    /// value is absent, or (in production) the asset directory does not
    /// hold an `index.html`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mode = match env_value("APP_ENV") {
            None => RuntimeMode::Development,
            Some(raw) => RuntimeMode::parse(&raw)
                .ok_or_else(|| ConfigError::invalid("APP_ENV", &raw, "expected development or production"))?,
        };

        let port = match env_value("PORT") {
            None => 5001,
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::invalid("PORT", &raw, "expected a port number"))?,
        };

        let startup_policy = match env_value("STARTUP_POLICY") {
            None => StartupPolicy::ConnectFirst,
            Some(raw) => StartupPolicy::parse(&raw)
                .ok_or_else(|| ConfigError::invalid("STARTUP_POLICY", &raw, "expected connect-first or listen-first"))?,
        };

        let dev_server = env_value("VITE_SERVER").unwrap_or_else(|| "http://localhost:5173".to_string());
        require_http_origin("VITE_SERVER", &dev_server)?;

        let frontend_origin = match env_value("FRONTEND_ORIGIN") {
            Some(origin) => origin,
            None => match mode {
                RuntimeMode::Development => dev_server.clone(),
                RuntimeMode::Production => return Err(ConfigError::MissingValue("FRONTEND_ORIGIN")),
            },
        };
        require_http_origin("FRONTEND_ORIGIN", &frontend_origin)?;
        if HeaderValue::from_str(&frontend_origin).is_err() {
            return Err(ConfigError::invalid(
                "FRONTEND_ORIGIN",
                &frontend_origin,
                "not a valid header value",
            ));
        }

        let asset_dir = PathBuf::from(env_value("ASSET_DIR").unwrap_or_else(|| "frontend/dist".to_string()));
        let asset_dir = match mode {
            RuntimeMode::Development => asset_dir,
            RuntimeMode::Production => resolve_asset_dir(asset_dir)?,
        };

        let database_url = env_value("DATABASE_URL");
        if database_url.is_none() && startup_policy == StartupPolicy::ConnectFirst {
            return Err(ConfigError::MissingValue("DATABASE_URL"));
        }

        Ok(Self {
            mode,
            port,
            frontend_origin,
            dev_server,
            asset_dir,
            database_url,
            startup_policy,
        })
    }

    /// Socket address the gateway binds to.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Read an environment variable, treating empty strings as unset.
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn require_http_origin(var: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::invalid(var, value, "expected an http(s) origin"))
    }
}

/// Canonicalize the asset directory and verify the entry document exists.
fn resolve_asset_dir(dir: PathBuf) -> Result<PathBuf, ConfigError> {
    let resolved = std::fs::canonicalize(&dir).map_err(|e| ConfigError::AssetDir {
        path: dir.clone(),
        reason: e.to_string(),
    })?;
    let index = resolved.join("index.html");
    if !index.is_file() {
        return Err(ConfigError::AssetDir {
            path: resolved,
            reason: "index.html not found".to_string(),
        });
    }
    Ok(resolved)
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error("asset directory {}: {reason}", .path.display())]
    AssetDir { path: PathBuf, reason: String },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: &'static str) -> Self {
        Self::InvalidValue {
            var,
            value: value.to_string(),
            reason,
        }
    }
}
