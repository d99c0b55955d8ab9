use crate::constants::{DEFAULT_RECENT_NOTES_LIMIT, MAX_RECENT_NOTES_LIMIT};
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::DataResponse;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use notehub_core::models::{Note, NoteWithPath};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
pub struct RecentNotesQuery {
    /// Number of notes to return (default 50, max 200)
    pub limit: Option<i64>,
}

impl RecentNotesQuery {
    fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_RECENT_NOTES_LIMIT)
            .clamp(1, MAX_RECENT_NOTES_LIMIT)
    }
}

#[utoipa::path(
    get,
    path = "/api/v0/units/{id}/notes",
    tag = "notes",
    params(("id" = Uuid, Path, description = "Unit ID")),
    responses(
        (status = 200, description = "Notes of the unit, newest first", body = DataResponse<Vec<Note>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_unit_notes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let notes = state.notes.list_unit_notes(id).await?;
    Ok(Json(DataResponse::new(notes)))
}

#[utoipa::path(
    get,
    path = "/api/v0/notes/recent",
    tag = "notes",
    params(RecentNotesQuery),
    responses(
        (status = 200, description = "Newest notes with their catalog path", body = DataResponse<Vec<NoteWithPath>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_recent_notes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecentNotesQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let notes = state.notes.list_recent_notes(query.effective_limit()).await?;
    Ok(Json(DataResponse::new(notes)))
}
