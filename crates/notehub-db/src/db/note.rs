use notehub_core::models::{NewNote, Note, NoteFile, NoteWithPath};
use notehub_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Note record access used by the upload and delete workflows
#[async_trait::async_trait]
pub trait NoteRepositoryTrait: Send + Sync {
    /// Look up the storage path of a note. `Ok(None)` when no such note exists.
    async fn get_note_file(&self, id: Uuid) -> Result<Option<NoteFile>, AppError>;

    /// Delete a note row. Returns the number of rows removed (0 if already gone).
    async fn delete_note(&self, id: Uuid) -> Result<u64, AppError>;

    async fn create_note(&self, note: NewNote) -> Result<Note, AppError>;

    /// Notes of a unit, newest first
    async fn list_unit_notes(&self, unit_id: Uuid) -> Result<Vec<Note>, AppError>;

    /// Newest notes across the catalog, with their full path
    async fn list_recent_notes(&self, limit: i64) -> Result<Vec<NoteWithPath>, AppError>;
}

#[derive(Clone)]
pub struct PostgresNoteRepository {
    pool: PgPool,
}

impl PostgresNoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl NoteRepositoryTrait for PostgresNoteRepository {
    #[tracing::instrument(
        skip(self),
        fields(
            db.table = "notes",
            db.operation = "select",
            db.record_id = %id,
        )
    )]
    async fn get_note_file(&self, id: Uuid) -> Result<Option<NoteFile>, AppError> {
        let note = sqlx::query_as::<Postgres, NoteFile>(
            "SELECT id, file_path FROM notes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(note)
    }

    #[tracing::instrument(
        skip(self),
        fields(
            db.table = "notes",
            db.operation = "delete",
            db.record_id = %id,
        )
    )]
    async fn delete_note(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(
        skip(self, note),
        fields(
            db.table = "notes",
            db.operation = "insert",
            unit_id = %note.unit_id,
        )
    )]
    async fn create_note(&self, note: NewNote) -> Result<Note, AppError> {
        let created = sqlx::query_as::<Postgres, Note>(
            r#"
            INSERT INTO notes (unit_id, title, file_name, file_url, file_path)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, unit_id, title, file_name, file_url, file_path, created_at
            "#,
        )
        .bind(note.unit_id)
        .bind(&note.title)
        .bind(&note.file_name)
        .bind(&note.file_url)
        .bind(&note.file_path)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    #[tracing::instrument(skip(self), fields(db.table = "notes", db.operation = "select"))]
    async fn list_unit_notes(&self, unit_id: Uuid) -> Result<Vec<Note>, AppError> {
        let notes = sqlx::query_as::<Postgres, Note>(
            r#"
            SELECT id, unit_id, title, file_name, file_url, file_path, created_at
            FROM notes
            WHERE unit_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(unit_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    #[tracing::instrument(skip(self), fields(db.table = "notes", db.operation = "select"))]
    async fn list_recent_notes(&self, limit: i64) -> Result<Vec<NoteWithPath>, AppError> {
        let notes = sqlx::query_as::<Postgres, NoteWithPath>(
            r#"
            SELECT n.id, n.title, n.file_name, n.file_url, n.file_path, n.created_at,
                   u.id AS unit_id, u.name AS unit_name,
                   su.id AS subject_id, su.name AS subject_name,
                   se.id AS semester_id, se.name AS semester_name,
                   b.id AS branch_id, b.name AS branch_name
            FROM notes n
            JOIN units u ON u.id = n.unit_id
            JOIN subjects su ON su.id = u.subject_id
            JOIN semesters se ON se.id = su.semester_id
            JOIN branches b ON b.id = se.branch_id
            ORDER BY n.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }
}
