//! The shared-secret gate.

use std::time::Duration;

use chrono::Utc;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::session::Session;
use crate::error::{Error, Result};

/// Validates the single shared secret and flips the authenticated flag on
/// the caller's [`Session`].
///
/// There are no identities: every authenticated session has the same rights.
pub struct AuthGate {
    secret: String,
    idle_timeout: Duration,
}

impl AuthGate {
    pub fn new(secret: impl Into<String>, idle_timeout: Duration) -> Self {
        Self {
            secret: secret.into(),
            idle_timeout,
        }
    }

    /// Check `attempt` against the shared secret.
    ///
    /// On success the session is flagged and given a new id. On failure the
    /// session is left as it was.
    pub fn authenticate(&self, attempt: &str, session: &mut Session) -> Result<()> {
        if !secret_matches(attempt, &self.secret) {
            warn!("Rejected login attempt with wrong password");
            return Err(Error::Auth);
        }

        session.rotate_id();
        session.set_authenticated(true);
        session.touch(Utc::now());
        debug!("Session authenticated");
        Ok(())
    }

    /// Flag set and the session has not gone idle.
    pub fn is_authenticated(&self, session: &Session) -> bool {
        session.authenticated() && !session.is_idle(Utc::now(), self.idle_timeout)
    }

    pub fn logout(&self, session: &mut Session) {
        session.set_authenticated(false);
    }

    /// Gate check for every operation on shared state.
    pub fn require(&self, session: &Session) -> Result<()> {
        if self.is_authenticated(session) {
            Ok(())
        } else {
            Err(Error::Auth)
        }
    }
}

fn secret_matches(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> AuthGate {
        AuthGate::new("hunter2", Duration::from_secs(3600))
    }

    #[test]
    fn test_correct_secret_authenticates() {
        let gate = gate();
        let mut session = Session::new();
        let original_id = session.id().to_string();

        gate.authenticate("hunter2", &mut session).unwrap();

        assert!(gate.is_authenticated(&session));
        assert_ne!(session.id(), original_id);
        assert!(gate.require(&session).is_ok());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let gate = gate();
        let mut session = Session::new();
        let original_id = session.id().to_string();

        for attempt in ["hunter", "hunter22", "HUNTER2", ""] {
            let err = gate.authenticate(attempt, &mut session).unwrap_err();
            assert!(matches!(err, Error::Auth));
        }

        assert!(!gate.is_authenticated(&session));
        assert_eq!(session.id(), original_id);
        assert!(matches!(gate.require(&session), Err(Error::Auth)));
    }

    #[test]
    fn test_logout_clears_flag() {
        let gate = gate();
        let mut session = Session::new();
        gate.authenticate("hunter2", &mut session).unwrap();

        gate.logout(&mut session);

        assert!(!gate.is_authenticated(&session));
        assert!(matches!(gate.require(&session), Err(Error::Auth)));
    }

    #[test]
    fn test_idle_session_is_not_authenticated() {
        let gate = gate();
        let mut session = Session::new();
        gate.authenticate("hunter2", &mut session).unwrap();
        session.set_last_seen(Utc::now() - chrono::Duration::hours(2));

        assert!(session.authenticated());
        assert!(!gate.is_authenticated(&session));
    }
}
