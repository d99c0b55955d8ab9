//! Deletion audit trail records
//!
//! One record per step of a delete operation. Records are append-only: this
//! crate only ever builds new ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

/// Step of the delete workflow a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    DeleteAttempt,
    DeleteFetchNote,
    StorageRemove,
    DbDelete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::DeleteAttempt => "delete_attempt",
            AuditAction::DeleteFetchNote => "delete_fetch_note",
            AuditAction::StorageRemove => "storage_remove",
            AuditAction::DbDelete => "db_delete",
        }
    }
}

impl Display for AuditAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Outcome of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Started,
    Forbidden,
    NotFound,
    Success,
    /// Storage reported the object as already absent
    Missing,
    /// Note had no storage path
    Skipped,
    /// Dependency answered with a failure
    Error,
    /// Dependency could not be reached
    Exception,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Started => "started",
            AuditStatus::Forbidden => "forbidden",
            AuditStatus::NotFound => "not_found",
            AuditStatus::Success => "success",
            AuditStatus::Missing => "missing",
            AuditStatus::Skipped => "skipped",
            AuditStatus::Error => "error",
            AuditStatus::Exception => "exception",
        }
    }
}

impl Display for AuditStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Audit record to append
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAuditRecord {
    /// Absent when the failure happened before a note id was known
    pub note_id: Option<Uuid>,
    pub user_email: String,
    pub action: AuditAction,
    pub status: AuditStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl NewAuditRecord {
    pub fn new(
        note_id: Option<Uuid>,
        user_email: impl Into<String>,
        action: AuditAction,
        status: AuditStatus,
    ) -> Self {
        Self {
            note_id,
            user_email: user_email.into(),
            action,
            status,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Stored audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AuditRecord {
    pub id: i64,
    pub note_id: Option<Uuid>,
    pub user_email: String,
    pub action: String,
    pub status: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}
