use notehub_core::models::{AuditRecord, NewAuditRecord};
use notehub_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Append-only sink for deletion audit records
#[async_trait::async_trait]
pub trait DeletionAuditRepositoryTrait: Send + Sync {
    async fn insert(&self, record: &NewAuditRecord) -> Result<(), AppError>;

    /// Records for one note in insertion order
    async fn list_for_note(&self, note_id: Uuid) -> Result<Vec<AuditRecord>, AppError>;
}

#[derive(Clone)]
pub struct PostgresDeletionAuditRepository {
    pool: PgPool,
}

impl PostgresDeletionAuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DeletionAuditRepositoryTrait for PostgresDeletionAuditRepository {
    #[tracing::instrument(skip(self, record), fields(
        db.table = "deletion_audit",
        db.operation = "insert",
        audit.action = %record.action,
        audit.status = %record.status
    ))]
    async fn insert(&self, record: &NewAuditRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO deletion_audit (note_id, user_email, action, status, details)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.note_id)
        .bind(&record.user_email)
        .bind(record.action.as_str())
        .bind(record.status.as_str())
        .bind(&record.details)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "deletion_audit", db.operation = "select"))]
    async fn list_for_note(&self, note_id: Uuid) -> Result<Vec<AuditRecord>, AppError> {
        let records = sqlx::query_as::<Postgres, AuditRecord>(
            r#"
            SELECT id, note_id, user_email, action, status, details, created_at
            FROM deletion_audit
            WHERE note_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(note_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
