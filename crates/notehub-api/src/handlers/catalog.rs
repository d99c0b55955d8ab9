//! Catalog hierarchy handlers
//!
//! Listing is public. Creating and deleting nodes requires an admin; deleting a
//! node removes its whole subtree through the schema's cascades.

use crate::auth::AdminContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::{DataResponse, MessageResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use notehub_core::models::{
    normalize_name, Branch, CatalogLevel, CatalogNode, CreateBranchRequest, CreateSemesterRequest,
    CreateSubjectRequest, CreateUnitRequest, Semester, Subject, Unit,
};
use notehub_core::AppError;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/api/v0/branches",
    tag = "catalog",
    responses(
        (status = 200, description = "Branches ordered by name", body = DataResponse<Vec<Branch>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_branches(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let branches = state.catalog.list_branches().await?;
    Ok(Json(DataResponse::new(branches)))
}

#[utoipa::path(
    get,
    path = "/api/v0/branches/{id}/semesters",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "Branch ID")),
    responses(
        (status = 200, description = "Semesters of the branch", body = DataResponse<Vec<Semester>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_semesters(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let semesters = state.catalog.list_semesters(id).await?;
    Ok(Json(DataResponse::new(semesters)))
}

#[utoipa::path(
    get,
    path = "/api/v0/semesters/{id}/subjects",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "Semester ID")),
    responses(
        (status = 200, description = "Subjects of the semester", body = DataResponse<Vec<Subject>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_subjects(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let subjects = state.catalog.list_subjects(id).await?;
    Ok(Json(DataResponse::new(subjects)))
}

#[utoipa::path(
    get,
    path = "/api/v0/subjects/{id}/units",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Units of the subject", body = DataResponse<Vec<Unit>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_units(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let units = state.catalog.list_units(id).await?;
    Ok(Json(DataResponse::new(units)))
}

async fn create_node(
    state: &AppState,
    level: CatalogLevel,
    parent_id: Option<Uuid>,
    name: &str,
) -> Result<(StatusCode, Json<DataResponse<CatalogNode>>), HttpAppError> {
    let node = state.catalog.create_node(level, parent_id, name).await?;
    tracing::info!(level = level.label(), id = %node.id, name = %node.name, "Catalog node created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(node))))
}

#[utoipa::path(
    post,
    path = "/api/v0/branches",
    tag = "catalog",
    request_body = CreateBranchRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Branch created", body = DataResponse<CatalogNode>),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin, request), fields(admin = %admin.user.email))]
pub async fn create_branch(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    ValidatedJson(mut request): ValidatedJson<CreateBranchRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    normalize_name(&mut request.name);
    request.validate().map_err(AppError::from)?;
    create_node(&state, CatalogLevel::Branch, None, &request.name).await
}

#[utoipa::path(
    post,
    path = "/api/v0/semesters",
    tag = "catalog",
    request_body = CreateSemesterRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Semester created", body = DataResponse<CatalogNode>),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 404, description = "Branch not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin, request), fields(admin = %admin.user.email))]
pub async fn create_semester(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    ValidatedJson(mut request): ValidatedJson<CreateSemesterRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    normalize_name(&mut request.name);
    request.validate().map_err(AppError::from)?;
    create_node(
        &state,
        CatalogLevel::Semester,
        Some(request.branch_id),
        &request.name,
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/v0/subjects",
    tag = "catalog",
    request_body = CreateSubjectRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Subject created", body = DataResponse<CatalogNode>),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 404, description = "Semester not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin, request), fields(admin = %admin.user.email))]
pub async fn create_subject(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    ValidatedJson(mut request): ValidatedJson<CreateSubjectRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    normalize_name(&mut request.name);
    request.validate().map_err(AppError::from)?;
    create_node(
        &state,
        CatalogLevel::Subject,
        Some(request.semester_id),
        &request.name,
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/v0/units",
    tag = "catalog",
    request_body = CreateUnitRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Unit created", body = DataResponse<CatalogNode>),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin, request), fields(admin = %admin.user.email))]
pub async fn create_unit(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    ValidatedJson(mut request): ValidatedJson<CreateUnitRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    normalize_name(&mut request.name);
    request.validate().map_err(AppError::from)?;
    create_node(
        &state,
        CatalogLevel::Unit,
        Some(request.subject_id),
        &request.name,
    )
    .await
}

async fn delete_node(
    state: &AppState,
    level: CatalogLevel,
    id: Uuid,
) -> Result<Json<MessageResponse>, HttpAppError> {
    let removed = state.catalog.delete_node(level, id).await?;
    if removed == 0 {
        return Err(AppError::NotFound(format!("{} not found", level.label())).into());
    }

    tracing::info!(level = level.label(), id = %id, "Catalog node deleted");
    Ok(Json(MessageResponse::new("Deleted")))
}

#[utoipa::path(
    delete,
    path = "/api/v0/branches/{id}",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "Branch ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Branch and everything below it deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Branch not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin), fields(admin = %admin.user.email))]
pub async fn delete_branch(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    delete_node(&state, CatalogLevel::Branch, id).await
}

#[utoipa::path(
    delete,
    path = "/api/v0/semesters/{id}",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "Semester ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Semester and everything below it deleted", body = MessageResponse),
        (status = 404, description = "Semester not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin), fields(admin = %admin.user.email))]
pub async fn delete_semester(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    delete_node(&state, CatalogLevel::Semester, id).await
}

#[utoipa::path(
    delete,
    path = "/api/v0/subjects/{id}",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "Subject ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Subject and everything below it deleted", body = MessageResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin), fields(admin = %admin.user.email))]
pub async fn delete_subject(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    delete_node(&state, CatalogLevel::Subject, id).await
}

#[utoipa::path(
    delete,
    path = "/api/v0/units/{id}",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "Unit ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Unit and its notes deleted", body = MessageResponse),
        (status = 404, description = "Unit not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, admin), fields(admin = %admin.user.email))]
pub async fn delete_unit(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    delete_node(&state, CatalogLevel::Unit, id).await
}
