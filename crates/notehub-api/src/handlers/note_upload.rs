//! Note upload (admin only)
//!
//! Accepts `multipart/form-data` with `unit_id`, `title` and `file`. The file is
//! stored under its unit's catalog path, then the note row is inserted. If the
//! insert fails the stored object is removed again.

use crate::auth::AdminContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::DataResponse;
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use bytes::Bytes;
use chrono::Utc;
use notehub_core::models::{NewNote, Note};
use notehub_core::AppError;
use notehub_storage::keys::note_object_key;
use std::sync::Arc;
use uuid::Uuid;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Default)]
struct UploadForm {
    unit_id: Option<Uuid>,
    title: Option<String>,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Option<Bytes>,
}

fn multipart_error(err: MultipartError, max_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("File exceeds the {} byte limit", max_bytes))
    } else {
        AppError::InvalidInput(format!("Invalid multipart body: {}", err.body_text()))
    }
}

async fn read_form(mut multipart: Multipart, max_bytes: usize) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        match field.name() {
            Some("unit_id") => {
                let text = field.text().await.map_err(|e| multipart_error(e, max_bytes))?;
                let id = Uuid::parse_str(text.trim())
                    .map_err(|_| AppError::InvalidInput("unit_id must be a UUID".to_string()))?;
                form.unit_id = Some(id);
            }
            Some("title") => {
                let text = field.text().await.map_err(|e| multipart_error(e, max_bytes))?;
                form.title = Some(text.trim().to_string());
            }
            Some("file") => {
                form.file_name = field.file_name().map(str::to_string);
                form.content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|e| multipart_error(e, max_bytes))?;
                if data.len() > max_bytes {
                    return Err(AppError::PayloadTooLarge(format!(
                        "File exceeds the {} byte limit",
                        max_bytes
                    )));
                }
                form.data = Some(data);
            }
            _ => {}
        }
    }

    Ok(form)
}

#[utoipa::path(
    post,
    path = "/api/v0/notes",
    tag = "notes",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Note uploaded", body = DataResponse<Note>),
        (status = 400, description = "Missing field or empty file", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Unit not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin, multipart), fields(admin = %admin.user.email))]
pub async fn upload_note(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = read_form(multipart, state.max_upload_size_bytes).await?;

    let unit_id = form
        .unit_id
        .ok_or_else(|| AppError::InvalidInput("Missing unit_id".to_string()))?;
    let title = form
        .title
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Missing title".to_string()))?;
    let data = form
        .data
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Missing or empty file".to_string()))?;
    let file_name = form
        .file_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::InvalidInput("File has no name".to_string()))?;
    let content_type = form
        .content_type
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

    let lineage = state
        .catalog
        .unit_lineage(unit_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Unit not found".to_string()))?;

    let storage_key = note_object_key(&lineage, Utc::now().timestamp_millis(), &file_name);
    let size = data.len();
    let file_url = state
        .storage
        .upload_with_key(&storage_key, data, &content_type)
        .await?;

    let note = match state
        .notes
        .create_note(NewNote {
            unit_id,
            title,
            file_name,
            file_url,
            file_path: storage_key.clone(),
        })
        .await
    {
        Ok(note) => note,
        Err(e) => {
            if let Err(cleanup_err) = state.storage.delete(&storage_key).await {
                tracing::warn!(
                    error = %cleanup_err,
                    storage_key = %storage_key,
                    "Failed to remove uploaded file after insert error"
                );
            }
            return Err(e.into());
        }
    };

    tracing::info!(note_id = %note.id, storage_key = %storage_key, size, "Note uploaded");
    Ok((StatusCode::CREATED, Json(DataResponse::new(note))))
}
