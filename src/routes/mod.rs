//! HTTP routes
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── router.rs - router assembly (API + catch-all + layers)
//! ├── api.rs    - API area composition and the `ApiRouters` seam
//! ├── auth.rs   - `/api/auth` group
//! ├── users.rs  - `/api/users` group
//! └── chat.rs   - `/api/chat` group
//! ```

pub mod api;
pub mod auth;
pub mod chat;
pub mod router;
pub mod users;

pub use api::ApiRouters;
pub use router::create_router;
