//! XFChat Gateway - Main Library
//!
//! The single HTTP entry point of the XFChat web application: it mounts
//! the API route groups, delivers the frontend (built bundle in
//! production, live dev server in development), and sequences process
//! startup against the storage connection.
//!
//! # Overview
//!
//! The gateway provides:
//! - API composition: `/api/auth`, `/api/users` and `/api/chat` delegate
//!   to mountable handler groups
//! - Environment-conditional content delivery: static assets with SPA
//!   fallback, or a transparent proxy to the frontend dev server with
//!   WebSocket bridging
//! - Startup sequencing: connect-first (default) or listen-first ordering
//!   of the listener against the storage connection
//! - A credentialed cross-origin policy for one trusted browser origin
//!
//! # Module Structure
//!
//! ```text
//! src/
//! ├── config.rs  - environment configuration, validated before startup
//! ├── storage.rs - storage connector facade with observable state
//! ├── error.rs   - fatal gateway errors
//! ├── server/    - state, assembly, startup sequencing
//! ├── routes/    - router assembly and API route groups
//! └── content/   - content delivery (static bundle, dev proxy)
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use xfchat::config::GatewayConfig;
//! use xfchat::routes::ApiRouters;
//!
//! # async fn example() -> Result<(), xfchat::error::GatewayError> {
//! let config = GatewayConfig::from_env()?;
//! xfchat::server::run(config, ApiRouters::defaults()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Fallible operations return `Result` with the error types in `config`,
//! `storage` and `error`. Configuration problems fail the process before
//! the listener exists; per-request failures are handled where they occur.

/// Environment configuration
pub mod config;

/// Content delivery strategies (static bundle, dev proxy)
pub mod content;

/// Fatal gateway errors
pub mod error;

/// Router assembly and API route groups
pub mod routes;

/// Server assembly and startup sequencing
pub mod server;

/// Storage connector facade
pub mod storage;
