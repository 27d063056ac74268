//! The shared text box.

use axum::{
    extract::{rejection::FormRejection, State},
    Form, Json,
};
use serde::{Deserialize, Serialize};

use super::MessageResponse;
use crate::error::ApiError;
use crate::session::{AuthenticatedCaller, CallerSession};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TextResponse {
    pub success: bool,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ShareTextForm {
    #[serde(default)]
    pub content: String,
}

/// GET /get_text
pub async fn get_text(
    State(state): State<AppState>,
    caller: CallerSession,
) -> Result<Json<TextResponse>, ApiError> {
    let content = state.exchange().shared_text(&caller.session).await?;
    Ok(Json(TextResponse {
        success: true,
        content,
    }))
}

/// POST /share_text - replace the shared text
pub async fn share_text(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    form: Result<Form<ShareTextForm>, FormRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Form(form) = form?;
    state
        .exchange()
        .set_shared_text(&caller.session, &form.content)
        .await?;
    Ok(MessageResponse::ok("Text shared"))
}
