//! OpenAPI documentation, served at `/api/openapi.json` and rendered at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use notehub_core::models;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "NoteHub API",
        version = "0.1.0",
        description = "Backend for the note-sharing portal: catalog browsing (branch, semester, subject, unit), admin note upload, and audited note deletion."
    ),
    paths(
        handlers::note_delete::delete_note,
        handlers::catalog::list_branches,
        handlers::catalog::list_semesters,
        handlers::catalog::list_subjects,
        handlers::catalog::list_units,
        handlers::catalog::create_branch,
        handlers::catalog::create_semester,
        handlers::catalog::create_subject,
        handlers::catalog::create_unit,
        handlers::catalog::delete_branch,
        handlers::catalog::delete_semester,
        handlers::catalog::delete_subject,
        handlers::catalog::delete_unit,
        handlers::notes::list_unit_notes,
        handlers::notes::list_recent_notes,
        handlers::note_upload::upload_note,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::Branch,
            models::Semester,
            models::Subject,
            models::Unit,
            models::CatalogLevel,
            models::CatalogNode,
            models::CreateBranchRequest,
            models::CreateSemesterRequest,
            models::CreateSubjectRequest,
            models::CreateUnitRequest,
            models::Note,
            models::NoteWithPath,
            handlers::note_delete::DeleteNoteRequest,
            handlers::MessageResponse,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "notes", description = "Note upload, listing and audited deletion"),
        (name = "catalog", description = "Branch, semester, subject and unit hierarchy"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
