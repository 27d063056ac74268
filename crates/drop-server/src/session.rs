//! Cookie transport for server-side sessions.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use drop_core::Session;

use crate::error::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE_NAME: &str = "drop_session";

/// The caller's session, resolved from the signed session cookie.
///
/// Handlers that change the session (login, logout) must [`commit`] it so the
/// store and the cookie agree.
///
/// [`commit`]: CallerSession::commit
pub struct CallerSession {
    pub session: Session,
    jar: SignedCookieJar,
}

impl FromRequestParts<AppState> for CallerSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::<Key>::from_request_parts(parts, state).await?;
        let id = jar
            .get(SESSION_COOKIE_NAME)
            .map(|cookie| cookie.value().to_string());
        let session = state.sessions().load(id.as_deref()).await;

        Ok(Self { session, jar })
    }
}

/// A caller that has passed the gate.
///
/// Rejects with the uniform auth error before any request body is read, so
/// it must come ahead of body extractors such as `Form` or `Multipart`.
pub struct AuthenticatedCaller(pub CallerSession);

impl FromRequestParts<AppState> for AuthenticatedCaller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let caller = match CallerSession::from_request_parts(parts, state).await {
            Ok(caller) => caller,
            Err(never) => match never {},
        };
        if !state.exchange().is_authenticated(&caller.session) {
            return Err(drop_core::Error::Auth.into());
        }
        Ok(Self(caller))
    }
}

impl CallerSession {
    /// Save the session and return the cookie jar to send back.
    pub async fn commit(self, state: &AppState) -> SignedCookieJar {
        state.sessions().save(&self.session).await;

        if self.session.authenticated() {
            let cookie = Cookie::build((SESSION_COOKIE_NAME, self.session.id().to_string()))
                .path("/")
                .http_only(true)
                .secure(state.secure_cookies())
                .same_site(SameSite::Lax);
            self.jar.add(cookie)
        } else {
            self.jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"))
        }
    }
}
