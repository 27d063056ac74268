//! HTTP routes.

pub mod auth;
pub mod files;
pub mod text;

use axum::{
    extract::{DefaultBodyLimit, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::pages;
use crate::session::CallerSession;
use crate::state::AppState;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.max_upload_bytes().saturating_add(MULTIPART_OVERHEAD))
        .unwrap_or(usize::MAX);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout).post(auth::logout))
        .route("/files", get(files::list))
        .route("/upload", post(files::upload))
        .route("/download/{name}", get(files::download))
        .route("/delete/{name}", post(files::delete))
        .route("/get_text", get(text::get_text))
        .route("/share_text", post(text::share_text))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Success body shared by the mutating JSON endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
        })
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET / - the drop itself, or a redirect to the login page
async fn index(State(state): State<AppState>, caller: CallerSession) -> Response {
    if !state.exchange().is_authenticated(&caller.session) {
        return Redirect::to("/login").into_response();
    }
    Html(pages::index_page(state.max_upload_bytes())).into_response()
}
