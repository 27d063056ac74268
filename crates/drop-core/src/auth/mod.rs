//! Shared-secret authentication and server-side sessions.

pub mod gate;
pub mod session;

pub use gate::AuthGate;
pub use session::{Session, SessionStore};
