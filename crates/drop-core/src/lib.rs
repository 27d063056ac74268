//! Core of the shared drop: one password, one directory of files, one text slot.
//!
//! Provides:
//! - [`AuthGate`] - shared-secret check and the per-session authenticated flag
//! - [`SessionStore`] - server-side session records with an idle timeout
//! - [`FileStore`] - listing, collision-free storing, retrieval and deletion
//! - [`TextSlot`] - a single persisted text value with replace-on-write
//! - [`Exchange`] - the gated facade every request goes through
//!
//! Transport concerns (HTTP, cookies, pages) live in `drop-server`.

pub mod auth;
pub mod error;
pub mod exchange;
pub mod files;
pub mod text;

pub use auth::{AuthGate, Session, SessionStore};
pub use error::{Error, Result};
pub use exchange::Exchange;
pub use files::{format_size, FileRecord, FileStore};
pub use text::TextSlot;
