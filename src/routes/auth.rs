//! Auth route group
//!
//! Mounted under `/api/auth`. Credential and session handling live behind
//! this mount in the full application; the gateway ships a status probe so
//! the mount point is observable end to end.

use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};

use crate::server::state::AppState;
use crate::storage::StorageConnector;

/// Routes mounted under `/api/auth`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/status", get(status))
}

/// Report the area name and the observed storage state.
async fn status(State(storage): State<StorageConnector>) -> Json<Value> {
    Json(json!({
        "area": "auth",
        "storage": storage.state().await.label(),
    }))
}
