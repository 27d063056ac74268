//! Login and logout.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::pages;
use crate::session::CallerSession;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
}

/// Where the logout redirect lands.
const LOGGED_OUT_LOCATION: &str = "/login?logged_out=true";

#[derive(Debug, Default, Deserialize)]
pub struct LoginPageQuery {
    #[serde(default)]
    pub logged_out: bool,
}

/// GET /login
pub async fn login_page(query: Result<Query<LoginPageQuery>, QueryRejection>) -> Html<String> {
    let Query(query) = query.unwrap_or_default();
    let notice = query.logged_out.then_some("You have been logged out");
    Html(pages::login_page(None, notice))
}

/// POST /login - check the shared password and start a session
pub async fn login(
    State(state): State<AppState>,
    mut caller: CallerSession,
    Form(form): Form<LoginForm>,
) -> Response {
    match state
        .exchange()
        .authenticate(&form.password, &mut caller.session)
    {
        Ok(()) => {
            tracing::info!("Login succeeded");
            let jar = caller.commit(&state).await;
            (jar, Redirect::to("/")).into_response()
        }
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Html(pages::login_page(Some("Wrong password, please try again"), None)),
        )
            .into_response(),
    }
}

/// GET|POST /logout - clear the session
pub async fn logout(State(state): State<AppState>, mut caller: CallerSession) -> Response {
    state.exchange().logout(&mut caller.session);
    let jar = caller.commit(&state).await;
    tracing::info!("Logged out");
    (jar, Redirect::to(LOGGED_OUT_LOCATION)).into_response()
}
