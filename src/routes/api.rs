/**
 * API Route Composition
 *
 * This module mounts the three API areas under their fixed prefixes:
 *
 * - `/api/auth` - credentials and sessions
 * - `/api/users` - user data
 * - `/api/chat` - chat messages
 *
 * The gateway owns the mount points, not the handlers. `ApiRouters` is the
 * injection seam: tests mount probe groups, the full application mounts its
 * real services, and `ApiRouters::defaults()` supplies the in-repo groups.
 *
 * # Dispatch
 *
 * Prefix dispatch only: the router picks the matching prefix and hands the
 * remaining path to the group untouched. Paths inside a prefix that the
 * group does not claim fall through to the outer catch-all, the same as
 * the rest of the unclaimed space.
 */

use axum::Router;

use crate::routes::{auth, chat, users};
use crate::server::state::AppState;

/// Mountable handler groups for the three API areas.
#[derive(Clone)]
pub struct ApiRouters {
    /// Mounted under `/api/auth`.
    pub auth: Router<AppState>,
    /// Mounted under `/api/users`.
    pub users: Router<AppState>,
    /// Mounted under `/api/chat`.
    pub chat: Router<AppState>,
}

impl ApiRouters {
    /// The route groups shipped with the gateway.
    pub fn defaults() -> Self {
        Self {
            auth: auth::routes(),
            users: users::routes(),
            chat: chat::routes(),
        }
    }
}

impl Default for ApiRouters {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Mount the API areas on the router.
pub fn configure_api_routes(router: Router<AppState>, groups: ApiRouters) -> Router<AppState> {
    router
        .nest("/api/auth", groups.auth)
        .nest("/api/users", groups.users)
        .nest("/api/chat", groups.chat)
}
