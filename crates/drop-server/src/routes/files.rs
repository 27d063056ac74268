//! File listing, upload, download and deletion.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use drop_core::FileRecord;
use serde::Serialize;

use super::MessageResponse;
use crate::error::ApiError;
use crate::session::{AuthenticatedCaller, CallerSession};
use crate::state::AppState;

/// Multipart field carrying the upload.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub files: Vec<FileRecord>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
}

/// GET /files
pub async fn list(
    State(state): State<AppState>,
    caller: CallerSession,
) -> Result<Json<ListResponse>, ApiError> {
    let files = state.exchange().list_files(&caller.session).await?;
    Ok(Json(ListResponse {
        success: true,
        files,
    }))
}

/// POST /upload - multipart upload of a single `file` field
pub async fn upload(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart?;

    let mut received = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        received = Some((name, bytes));
        break;
    }

    // A missing field is reported like an unnamed one
    let (name, bytes) = received.unwrap_or_default();
    let filename = state
        .exchange()
        .upload(&caller.session, &name, &bytes)
        .await?;

    Ok(Json(UploadResponse {
        success: true,
        message: format!("File {} uploaded", filename),
        filename,
    }))
}

/// GET /download/{name} - file contents as an attachment
///
/// Browsers that are not logged in are sent to the login page.
pub async fn download(
    State(state): State<AppState>,
    caller: CallerSession,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    if !state.exchange().is_authenticated(&caller.session) {
        return Ok(Redirect::to("/login").into_response());
    }

    let bytes = state.exchange().download(&caller.session, &name).await?;
    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_string()),
        (header::CONTENT_DISPOSITION, content_disposition(name.trim())),
    ];
    Ok((headers, bytes).into_response())
}

/// POST /delete/{name}
pub async fn delete(
    State(state): State<AppState>,
    caller: CallerSession,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.exchange().delete(&caller.session, &name).await?;
    Ok(MessageResponse::ok(format!("File {} deleted", name.trim())))
}

/// `attachment` disposition with an ASCII fallback and the RFC 5987 UTF-8 name.
fn content_disposition(name: &str) -> String {
    let fallback: String = name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_ascii() {
        assert_eq!(
            content_disposition("report 1.pdf"),
            "attachment; filename=\"report 1.pdf\"; filename*=UTF-8''report%201.pdf"
        );
    }

    #[test]
    fn test_content_disposition_unicode_and_quotes() {
        let value = content_disposition("照片\"x\".jpg");
        assert!(value.starts_with("attachment; filename=\"___x_.jpg\""));
        assert!(value.ends_with("filename*=UTF-8''%E7%85%A7%E7%89%87%22x%22.jpg"));
    }
}
