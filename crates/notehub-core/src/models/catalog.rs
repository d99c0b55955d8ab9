use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Top level of the catalog (e.g. "Computer Science")
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Branch {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Semester {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Subject {
    pub id: Uuid,
    pub semester_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Leaf of the catalog; notes are filed under units
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Unit {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Catalog level, used for routing admin create/delete requests to the right table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CatalogLevel {
    Branch,
    Semester,
    Subject,
    Unit,
}

impl CatalogLevel {
    pub fn table(&self) -> &'static str {
        match self {
            CatalogLevel::Branch => "branches",
            CatalogLevel::Semester => "semesters",
            CatalogLevel::Subject => "subjects",
            CatalogLevel::Unit => "units",
        }
    }

    /// Column holding the reference to the owning level, if any
    pub fn parent_column(&self) -> Option<&'static str> {
        match self {
            CatalogLevel::Branch => None,
            CatalogLevel::Semester => Some("branch_id"),
            CatalogLevel::Subject => Some("semester_id"),
            CatalogLevel::Unit => Some("subject_id"),
        }
    }

    pub fn parent(&self) -> Option<CatalogLevel> {
        match self {
            CatalogLevel::Branch => None,
            CatalogLevel::Semester => Some(CatalogLevel::Branch),
            CatalogLevel::Subject => Some(CatalogLevel::Semester),
            CatalogLevel::Unit => Some(CatalogLevel::Subject),
        }
    }

    /// Human-readable name used in "not found" messages
    pub fn label(&self) -> &'static str {
        match self {
            CatalogLevel::Branch => "Branch",
            CatalogLevel::Semester => "Semester",
            CatalogLevel::Subject => "Subject",
            CatalogLevel::Unit => "Unit",
        }
    }
}

/// Generic catalog node as returned by create endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CatalogNode {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateBranchRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateSemesterRequest {
    pub branch_id: Uuid,
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateSubjectRequest {
    pub semester_id: Uuid,
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateUnitRequest {
    pub subject_id: Uuid,
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
}

/// Trim a requested node name in place; validation runs on the trimmed value.
pub fn normalize_name(name: &mut String) {
    let trimmed = name.trim();
    if trimmed.len() != name.len() {
        *name = trimmed.to_string();
    }
}
