//! Admin note deletion
//!
//! Deleting a note is an ordered pipeline of fallible stages:
//!
//! 1. resolve the caller and check the admin allow-list
//! 2. record `delete_attempt/started`
//! 3. look up the note's storage path
//! 4. remove the stored object (an already-absent object counts as removed)
//! 5. delete the note row
//!
//! The first failing stage ends the request. Each stage writes its own audit
//! record through [`DeletionAuditLogger`], whose failures never reach the caller.
//! The database row is never deleted after a storage failure.

use crate::auth::admin::FORBIDDEN_MESSAGE;
use crate::auth::{IdentityError, IdentityProvider};
use crate::services::{DeletionAuditLogger, NoteLocks};
use anyhow::Context;
use notehub_core::models::{
    AdminAllowList, AuditAction, AuditStatus, NewAuditRecord, NoteFile, UserIdentity,
};
use notehub_core::AppError;
use notehub_db::NoteRepositoryTrait;
use notehub_storage::{Storage, StorageError};
use regex::Regex;
use std::sync::Arc;
use uuid::Uuid;

pub const NOTE_NOT_FOUND_MESSAGE: &str = "Note not found";
pub const FETCH_NOTE_FAILED_MESSAGE: &str = "Error fetching note";
pub const STORAGE_REMOVE_FAILED_MESSAGE: &str = "Failed to remove file from storage";
pub const STORAGE_REMOVE_EXCEPTION_MESSAGE: &str = "Storage remove exception";
pub const DB_DELETE_FAILED_MESSAGE: &str = "Failed to delete DB record";

const NOT_ADMIN_DETAIL: &str = "User not in ADMIN_EMAILS";
const NO_FILE_PATH_DETAIL: &str = "no file_path";

#[derive(Clone)]
pub struct NoteDeletionService {
    notes: Arc<dyn NoteRepositoryTrait>,
    storage: Arc<dyn Storage>,
    identity: Arc<dyn IdentityProvider>,
    admins: AdminAllowList,
    audit: DeletionAuditLogger,
    locks: NoteLocks,
    missing_object: Regex,
}

impl NoteDeletionService {
    pub fn new(
        notes: Arc<dyn NoteRepositoryTrait>,
        storage: Arc<dyn Storage>,
        identity: Arc<dyn IdentityProvider>,
        admins: AdminAllowList,
        audit: DeletionAuditLogger,
    ) -> anyhow::Result<Self> {
        let missing_object = Regex::new(r"(?i)not found|404|no such file")
            .context("Failed to compile missing-object pattern")?;

        Ok(Self {
            notes,
            storage,
            identity,
            admins,
            audit,
            locks: NoteLocks::new(),
            missing_object,
        })
    }

    pub fn locks(&self) -> &NoteLocks {
        &self.locks
    }

    /// Delete one note's stored object and database row on behalf of the token holder.
    ///
    /// Re-running for an already deleted note returns `NotFound`.
    #[tracing::instrument(skip(self, token))]
    pub async fn delete(&self, note_id: Uuid, token: &str) -> Result<(), AppError> {
        let user = self.authorize(note_id, token).await?;
        let email = user.email.as_str();

        self.audit(note_id, email, AuditAction::DeleteAttempt, AuditStatus::Started, None)
            .await;

        let _guard = self.locks.acquire(note_id).await;

        let note = self.fetch_note(note_id, email).await?;
        self.remove_object(&note, email).await?;
        self.delete_row(note_id, email).await?;

        tracing::info!(note_id = %note_id, user_email = %email, "Deleted note successfully");
        Ok(())
    }

    async fn authorize(&self, note_id: Uuid, token: &str) -> Result<UserIdentity, AppError> {
        let user = match self.identity.resolve_user(token).await {
            Ok(user) => user,
            Err(IdentityError::InvalidToken(reason)) => {
                tracing::warn!(reason = %reason, "Failed to get user from token");
                return Err(IdentityError::InvalidToken(reason).into());
            }
            Err(IdentityError::Unavailable(reason)) => {
                tracing::error!(reason = %reason, "Identity provider unreachable");
                self.audit(
                    note_id,
                    "",
                    AuditAction::DeleteAttempt,
                    AuditStatus::Exception,
                    Some(reason.clone()),
                )
                .await;
                return Err(AppError::Identity(reason));
            }
        };

        if !self.admins.contains(&user.email) {
            tracing::warn!(user_email = %user.email, "Unauthorized delete attempt");
            self.audit(
                note_id,
                &user.email,
                AuditAction::DeleteAttempt,
                AuditStatus::Forbidden,
                Some(NOT_ADMIN_DETAIL.to_string()),
            )
            .await;
            return Err(AppError::Forbidden(FORBIDDEN_MESSAGE.to_string()));
        }

        Ok(user)
    }

    async fn fetch_note(&self, note_id: Uuid, email: &str) -> Result<NoteFile, AppError> {
        match self.notes.get_note_file(note_id).await {
            Ok(Some(note)) => Ok(note),
            Ok(None) => {
                self.audit(
                    note_id,
                    email,
                    AuditAction::DeleteFetchNote,
                    AuditStatus::NotFound,
                    None,
                )
                .await;
                Err(AppError::NotFound(NOTE_NOT_FOUND_MESSAGE.to_string()))
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching note");
                self.audit(
                    note_id,
                    email,
                    AuditAction::DeleteFetchNote,
                    failure_status(e.is_transport_failure()),
                    Some(e.to_string()),
                )
                .await;
                Err(AppError::Upstream {
                    message: FETCH_NOTE_FAILED_MESSAGE.to_string(),
                    detail: None,
                })
            }
        }
    }

    async fn remove_object(&self, note: &NoteFile, email: &str) -> Result<(), AppError> {
        let Some(path) = note.storage_path() else {
            self.audit(
                note.id,
                email,
                AuditAction::StorageRemove,
                AuditStatus::Skipped,
                Some(NO_FILE_PATH_DETAIL.to_string()),
            )
            .await;
            return Ok(());
        };

        match self.storage.delete(path).await {
            Ok(()) => {
                self.audit(note.id, email, AuditAction::StorageRemove, AuditStatus::Success, None)
                    .await;
                Ok(())
            }
            Err(e) if self.is_missing_object(&e) => {
                tracing::warn!(file_path = %path, "Storage file already missing");
                self.audit(
                    note.id,
                    email,
                    AuditAction::StorageRemove,
                    AuditStatus::Missing,
                    Some(e.to_string()),
                )
                .await;
                Ok(())
            }
            Err(e) if e.is_transport() => {
                tracing::error!(
                    error = %e,
                    file_path = %path,
                    "Exception while removing file from storage"
                );
                self.audit(
                    note.id,
                    email,
                    AuditAction::StorageRemove,
                    AuditStatus::Exception,
                    Some(e.to_string()),
                )
                .await;
                Err(AppError::Upstream {
                    message: STORAGE_REMOVE_EXCEPTION_MESSAGE.to_string(),
                    detail: None,
                })
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    file_path = %path,
                    "Failed to remove file from storage"
                );
                self.audit(
                    note.id,
                    email,
                    AuditAction::StorageRemove,
                    AuditStatus::Error,
                    Some(e.to_string()),
                )
                .await;
                Err(AppError::Upstream {
                    message: STORAGE_REMOVE_FAILED_MESSAGE.to_string(),
                    detail: Some(e.to_string()),
                })
            }
        }
    }

    async fn delete_row(&self, note_id: Uuid, email: &str) -> Result<(), AppError> {
        match self.notes.delete_note(note_id).await {
            Ok(rows) => {
                if rows == 0 {
                    tracing::warn!(note_id = %note_id, "Note row already gone at delete time");
                }
                self.audit(note_id, email, AuditAction::DbDelete, AuditStatus::Success, None)
                    .await;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to delete note record");
                self.audit(
                    note_id,
                    email,
                    AuditAction::DbDelete,
                    failure_status(e.is_transport_failure()),
                    Some(e.to_string()),
                )
                .await;
                Err(AppError::Upstream {
                    message: DB_DELETE_FAILED_MESSAGE.to_string(),
                    detail: Some(e.to_string()),
                })
            }
        }
    }

    /// Backends differ in how they report an absent object; anything that reads
    /// like "not found" counts, unless the request never reached the backend.
    fn is_missing_object(&self, err: &StorageError) -> bool {
        match err {
            StorageError::NotFound(_) => true,
            e if e.is_transport() => false,
            e => self.missing_object.is_match(&e.to_string()),
        }
    }

    async fn audit(
        &self,
        note_id: Uuid,
        email: &str,
        action: AuditAction,
        status: AuditStatus,
        details: Option<String>,
    ) {
        let mut record = NewAuditRecord::new(Some(note_id), email, action, status);
        record.details = details;
        self.audit.record(record).await;
    }
}

fn failure_status(transport: bool) -> AuditStatus {
    if transport {
        AuditStatus::Exception
    } else {
        AuditStatus::Error
    }
}
