//! Application state shared by every handler.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use drop_core::{AuthGate, Exchange, FileStore, SessionStore, TextSlot};
use rand::Rng;
use sha2::{Digest, Sha512};

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    exchange: Exchange,
    sessions: SessionStore,
    cookie_key: Key,
    secure_cookies: bool,
}

impl AppState {
    /// Open the store and text slot described by `config`.
    pub async fn from_config(config: &Config) -> drop_core::Result<Self> {
        let gate = AuthGate::new(config.password.clone(), config.session_idle_timeout);
        let files = FileStore::open(&config.upload_dir, config.max_upload_bytes).await?;
        let text = TextSlot::open(&config.shared_text_path).await?;

        Ok(Self::new(
            Exchange::new(gate, files, text),
            SessionStore::new(config.session_idle_timeout),
            cookie_key(config.secret_key.as_deref()),
            config.secure_cookies,
        ))
    }

    pub fn new(
        exchange: Exchange,
        sessions: SessionStore,
        cookie_key: Key,
        secure_cookies: bool,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                exchange,
                sessions,
                cookie_key,
                secure_cookies,
            }),
        }
    }

    pub fn exchange(&self) -> &Exchange {
        &self.inner.exchange
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    pub fn secure_cookies(&self) -> bool {
        self.inner.secure_cookies
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.inner.exchange.files().max_upload_bytes()
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.inner.cookie_key.clone()
    }
}

/// Signing key for session cookies.
///
/// A configured secret of any length is stretched to the 64 bytes the
/// cookie crate expects; without one, a random key is used and logins do not
/// survive a restart.
pub fn cookie_key(secret: Option<&str>) -> Key {
    match secret {
        Some(secret) => Key::from(Sha512::digest(secret.as_bytes()).as_slice()),
        None => {
            let mut bytes = [0u8; 64];
            rand::rng().fill(&mut bytes[..]);
            Key::from(&bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_key_is_stable() {
        let a = cookie_key(Some("short"));
        let b = cookie_key(Some("short"));
        let c = cookie_key(Some("other"));
        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }

    #[test]
    fn test_random_keys_differ() {
        assert_ne!(cookie_key(None).master(), cookie_key(None).master());
    }
}
