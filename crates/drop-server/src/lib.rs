//! HTTP front end for the shared drop.
//!
//! Routes:
//! - `/login`, `/logout` - shared-password sessions
//! - `/files`, `/upload`, `/download/{name}`, `/delete/{name}` - the file store
//! - `/get_text`, `/share_text` - the shared text box
//! - `/` - the browser page, `/health` - liveness

pub mod config;
pub mod error;
pub mod pages;
pub mod routes;
pub mod session;
pub mod state;

pub use config::{Cli, Config};
pub use routes::router;
pub use state::AppState;
