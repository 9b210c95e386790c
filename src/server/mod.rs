//! Server assembly and startup sequencing

pub mod init;
pub mod state;

pub use init::{create_app, run};
pub use state::AppState;
