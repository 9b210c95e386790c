//! Gateway error types
//!
//! Fatal errors surfaced by `server::run`. These never become HTTP
//! responses; the binary logs them and exits non-zero. Per-request
//! failures are handled where they occur (proxy 502, handler errors).

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::ConfigError;
use crate::storage::StorageError;

/// Errors that abort the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Invalid or incomplete environment configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage connection failure under the connect-first policy.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The dev proxy's HTTP client could not be built.
    #[error("failed to build proxy client: {0}")]
    ProxyClient(#[from] reqwest::Error),

    /// The listen socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// The accept loop failed after startup.
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_conversion() {
        let err: GatewayError = ConfigError::MissingValue("DATABASE_URL").into();
        match &err {
            GatewayError::Config(_) => {}
            other => panic!("Expected Config, got {other:?}"),
        }
        assert!(err_to_string(&err).contains("DATABASE_URL"));
    }

    #[test]
    fn test_bind_error_names_address() {
        let err = GatewayError::Bind {
            addr: SocketAddr::from(([0, 0, 0, 0], 5001)),
            source: std::io::Error::from(std::io::ErrorKind::AddrInUse),
        };
        assert!(err_to_string(&err).contains("0.0.0.0:5001"));
    }

    fn err_to_string(err: &GatewayError) -> String {
        format!("{err}")
    }
}
