use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Uploaded document record filed under a unit
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Note {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub title: String,
    /// Display name of the uploaded file
    pub file_name: String,
    /// Public URL of the stored object
    pub file_url: String,
    /// Object-store key. Empty or absent means there is nothing to remove from storage.
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Note joined with its full catalog path, for the admin "recent notes" list
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct NoteWithPath {
    pub id: Uuid,
    pub title: String,
    pub file_name: String,
    pub file_url: String,
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub unit_id: Uuid,
    pub unit_name: String,
    pub subject_id: Uuid,
    pub subject_name: String,
    pub semester_id: Uuid,
    pub semester_name: String,
    pub branch_id: Uuid,
    pub branch_name: String,
}

/// The part of a note the delete workflow needs
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct NoteFile {
    pub id: Uuid,
    pub file_path: Option<String>,
}

impl NoteFile {
    /// Storage key to remove, exactly as stored. Blank paths mean no file.
    pub fn storage_path(&self) -> Option<&str> {
        self.file_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }
}

/// Insert payload for a freshly uploaded note
#[derive(Debug, Clone)]
pub struct NewNote {
    pub unit_id: Uuid,
    pub title: String,
    pub file_name: String,
    pub file_url: String,
    pub file_path: String,
}

/// Catalog ancestry of a unit, used to build object paths on upload
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UnitLineage {
    pub branch_id: Uuid,
    pub semester_id: Uuid,
    pub subject_id: Uuid,
    pub unit_id: Uuid,
}
