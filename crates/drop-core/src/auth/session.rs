//! Server-side session records.
//!
//! A session is an opaque random id mapped to an authenticated flag and the
//! time it was last seen. Only authenticated sessions are kept; anything else
//! is a fresh, anonymous session handed out per request.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::sync::RwLock;
use tracing::debug;

const SESSION_ID_LEN: usize = 32;

/// One caller's view of the gate.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    authenticated: bool,
    last_seen: DateTime<Utc>,
    /// Id this session carried before it was rotated on login.
    rotated_from: Option<String>,
}

impl Session {
    /// A new anonymous session with a fresh id.
    pub fn new() -> Self {
        Self {
            id: generate_session_id(),
            authenticated: false,
            last_seen: Utc::now(),
            rotated_from: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Raw flag, without the idle check. Use [`crate::AuthGate::is_authenticated`]
    /// for access decisions.
    pub fn authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }

    /// Whether more than `timeout` has passed since the session was last seen.
    pub fn is_idle(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        (now - self.last_seen)
            .to_std()
            .map(|elapsed| elapsed > timeout)
            .unwrap_or(false)
    }

    pub(crate) fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.last_seen = now;
    }

    /// Swap to a fresh id, remembering the old one so the store can drop it.
    pub(crate) fn rotate_id(&mut self) {
        let old = std::mem::replace(&mut self.id, generate_session_id());
        self.rotated_from.get_or_insert(old);
    }

    #[cfg(test)]
    pub(crate) fn set_last_seen(&mut self, at: DateTime<Utc>) {
        self.last_seen = at;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory store of authenticated sessions.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Resolve a session id presented by a caller.
    ///
    /// Unknown or idle-expired ids yield a fresh anonymous session. A live
    /// session has its `last_seen` refreshed.
    pub async fn load(&self, id: Option<&str>) -> Session {
        let Some(id) = id else {
            return Session::new();
        };

        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(id) {
            Some(session) if !session.is_idle(now, self.idle_timeout) => {
                session.touch(now);
                session.clone()
            }
            Some(_) => {
                sessions.remove(id);
                debug!("Session expired after idle timeout");
                Session::new()
            }
            None => Session::new(),
        }
    }

    /// Write back a session after a request has mutated it.
    ///
    /// Authenticated sessions are kept under their current id; anything else
    /// is removed. A rotated-away id is always dropped.
    pub async fn save(&self, session: &Session) {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        if let Some(old) = &session.rotated_from {
            sessions.remove(old);
        }

        if session.authenticated {
            let mut stored = session.clone();
            stored.rotated_from = None;
            sessions.insert(stored.id.clone(), stored);
        } else {
            sessions.remove(&session.id);
        }

        let before = sessions.len();
        sessions.retain(|_, s| !s.is_idle(now, self.idle_timeout));
        let purged = before - sessions.len();
        if purged > 0 {
            debug!("Purged {} idle sessions", purged);
        }
    }

    /// Number of live session records.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    #[cfg(test)]
    pub(crate) async fn insert_raw(&self, session: Session) {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session);
    }
}

fn generate_session_id() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..SESSION_ID_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
