/**
 * Application State Management
 *
 * This module defines the application state structure and implements the
 * `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is the central state container handed to the router. It holds
 * the storage connector; configuration never lands here because it is
 * consumed during assembly and not needed per request.
 *
 * # State Extraction
 *
 * The `FromRef` implementation lets handlers extract the storage connector
 * directly with `State(storage): State<StorageConnector>` instead of
 * taking the whole `AppState`.
 */

use axum::extract::FromRef;

use crate::storage::StorageConnector;

/// Application state for the gateway router.
#[derive(Clone)]
pub struct AppState {
    /// Shared storage connector. Handlers observe it; only the startup
    /// sequencer drives `connect()`.
    pub storage: StorageConnector,
}

impl AppState {
    pub fn new(storage: StorageConnector) -> Self {
        Self { storage }
    }
}

/// Allow handlers to extract the storage connector directly.
impl FromRef<AppState> for StorageConnector {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.storage.clone()
    }
}
