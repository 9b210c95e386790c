//! User route group
//!
//! Mounted under `/api/users`. Profile and contact handling replace the
//! status probe in the full application.

use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};

use crate::server::state::AppState;
use crate::storage::StorageConnector;

/// Routes mounted under `/api/users`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/status", get(status))
}

async fn status(State(storage): State<StorageConnector>) -> Json<Value> {
    Json(json!({
        "area": "users",
        "storage": storage.state().await.label(),
    }))
}
