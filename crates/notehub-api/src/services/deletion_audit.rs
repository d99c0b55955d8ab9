//! Best-effort deletion audit trail
//!
//! Every record is emitted as a `tracing` event (target `audit`) and then
//! appended to the audit table. A failed insert is logged and dropped; callers
//! cannot observe it.

use notehub_core::models::NewAuditRecord;
use notehub_db::DeletionAuditRepositoryTrait;
use std::sync::Arc;

#[derive(Clone)]
pub struct DeletionAuditLogger {
    repository: Arc<dyn DeletionAuditRepositoryTrait>,
}

impl DeletionAuditLogger {
    pub fn new(repository: Arc<dyn DeletionAuditRepositoryTrait>) -> Self {
        Self { repository }
    }

    pub async fn record(&self, record: NewAuditRecord) {
        tracing::info!(
            target: "audit",
            note_id = ?record.note_id,
            user_email = %record.user_email,
            action = %record.action,
            status = %record.status,
            details = record.details.as_deref().unwrap_or(""),
            "Deletion audit"
        );

        if let Err(e) = self.repository.insert(&record).await {
            tracing::warn!(
                error = %e,
                action = %record.action,
                status = %record.status,
                "Failed to write deletion audit"
            );
        }
    }
}
