use crate::auth::admin::{authorization_token, MISSING_AUTH_MESSAGE};
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::MessageResponse;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Json},
};
use notehub_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

pub const MISSING_ID_MESSAGE: &str = "Missing id in body";
pub const INVALID_ID_MESSAGE: &str = "Invalid id in body";

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteNoteRequest {
    /// Note to delete
    pub id: Uuid,
}

/// Pull the note id out of a request body.
///
/// The body is read leniently: an unparseable body, a missing key, `null` and
/// `""` all count as a missing id.
fn note_id_from_body(body: &[u8]) -> Result<Uuid, AppError> {
    let value: serde_json::Value = serde_json::from_slice(body).unwrap_or_default();
    match value.get("id") {
        None | Some(serde_json::Value::Null) => {
            Err(AppError::InvalidInput(MISSING_ID_MESSAGE.to_string()))
        }
        Some(serde_json::Value::String(s)) if s.is_empty() => {
            Err(AppError::InvalidInput(MISSING_ID_MESSAGE.to_string()))
        }
        Some(serde_json::Value::String(s)) => Uuid::parse_str(s.trim())
            .map_err(|_| AppError::InvalidInput(INVALID_ID_MESSAGE.to_string())),
        Some(_) => Err(AppError::InvalidInput(INVALID_ID_MESSAGE.to_string())),
    }
}

/// Delete a note's stored file and database record (admin only)
#[utoipa::path(
    post,
    path = "/delete-note",
    tag = "notes",
    request_body = DeleteNoteRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Note deleted", body = MessageResponse),
        (status = 400, description = "Missing or malformed id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 500, description = "A dependency failed; message names the step", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, body), fields(operation = "delete_note"))]
pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, HttpAppError> {
    let note_id = note_id_from_body(&body)?;

    let token = authorization_token(&headers)
        .ok_or_else(|| AppError::Unauthorized(MISSING_AUTH_MESSAGE.to_string()))?;

    state.deletion.delete(note_id, token).await?;

    Ok(Json(MessageResponse::new("Deleted")))
}
