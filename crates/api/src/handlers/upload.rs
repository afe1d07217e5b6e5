//! Multipart file upload handler.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use spectra_core::error::CoreError;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{ApiResponse, RequestId};
use crate::state::AppState;

/// Accepted MIME types and the extension each is stored with.
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
    ("video/mp4", "mp4"),
    ("audio/mpeg", "mp3"),
];

/// POST /upload
///
/// Accepts a single multipart field named `image`, checks its MIME type
/// against the allowlist and its size against the configured limit, then
/// writes it under a random filename and returns the public URL.
pub async fn upload(
    State(state): State<AppState>,
    user: AuthUser,
    request_id: RequestId,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let field = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("image") => break field,
            Ok(Some(_)) => continue,
            Ok(None) => {
                return Err(AppError::BadRequest(
                    "Missing multipart field 'image'".into(),
                ))
            }
            Err(e) => return Err(AppError::BadRequest(format!("Invalid multipart body: {e}"))),
        }
    };

    let content_type = field
        .content_type()
        .map(|ct| ct.to_string())
        .unwrap_or_default();
    let extension = ALLOWED_TYPES
        .iter()
        .find(|(mime, _)| *mime == content_type)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Unsupported file type: {content_type}"
            )))
        })?;

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
    if data.len() > state.config.max_upload_bytes {
        return Err(AppError::Core(CoreError::Validation(format!(
            "File exceeds the {} byte limit",
            state.config.max_upload_bytes
        ))));
    }
    if data.is_empty() {
        return Err(AppError::Core(CoreError::Validation("File is empty".into())));
    }

    let filename = format!("{}.{extension}", Uuid::new_v4().simple());
    let dir = std::path::Path::new(&state.config.upload_dir);
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {e}")))?;
    tokio::fs::write(dir.join(&filename), &data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to write upload: {e}")))?;

    tracing::info!(
        user_id = user.user_id,
        %filename,
        bytes = data.len(),
        "File uploaded"
    );

    let body = serde_json::json!({
        "url": format!("/uploads/{filename}"),
        "filename": filename,
        "size": data.len(),
        "contentType": content_type,
    });

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(body, request_id)),
    )
        .into_response())
}
