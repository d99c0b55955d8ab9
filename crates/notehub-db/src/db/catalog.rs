use notehub_core::models::{Branch, CatalogLevel, CatalogNode, Semester, Subject, Unit, UnitLineage};
use notehub_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Catalog hierarchy access: branch > semester > subject > unit
#[async_trait::async_trait]
pub trait CatalogRepositoryTrait: Send + Sync {
    async fn list_branches(&self) -> Result<Vec<Branch>, AppError>;

    async fn list_semesters(&self, branch_id: Uuid) -> Result<Vec<Semester>, AppError>;

    async fn list_subjects(&self, semester_id: Uuid) -> Result<Vec<Subject>, AppError>;

    async fn list_units(&self, subject_id: Uuid) -> Result<Vec<Unit>, AppError>;

    /// Insert a node under `parent_id`. Fails with `NotFound` when the parent does not exist.
    async fn create_node(
        &self,
        level: CatalogLevel,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> Result<CatalogNode, AppError>;

    /// Delete a node and, through the schema, everything below it. Returns rows removed.
    async fn delete_node(&self, level: CatalogLevel, id: Uuid) -> Result<u64, AppError>;

    async fn unit_lineage(&self, unit_id: Uuid) -> Result<Option<UnitLineage>, AppError>;
}

/// The parent can be deleted between the existence check and the insert; the
/// schema then rejects the row with a foreign-key violation.
fn insert_error(err: sqlx::Error, parent: CatalogLevel) -> AppError {
    let orphaned = err
        .as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation());
    if orphaned {
        AppError::NotFound(format!("{} not found", parent.label()))
    } else {
        AppError::from(err)
    }
}

#[derive(Clone)]
pub struct PostgresCatalogRepository {
    pool: PgPool,
}

impl PostgresCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, level: CatalogLevel, id: Uuid) -> Result<bool, AppError> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", level.table());
        let exists = sqlx::query_scalar::<Postgres, bool>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

#[async_trait::async_trait]
impl CatalogRepositoryTrait for PostgresCatalogRepository {
    #[tracing::instrument(skip(self), fields(db.table = "branches", db.operation = "select"))]
    async fn list_branches(&self) -> Result<Vec<Branch>, AppError> {
        let branches = sqlx::query_as::<Postgres, Branch>(
            "SELECT id, name, created_at FROM branches ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(branches)
    }

    #[tracing::instrument(skip(self), fields(db.table = "semesters", db.operation = "select"))]
    async fn list_semesters(&self, branch_id: Uuid) -> Result<Vec<Semester>, AppError> {
        let semesters = sqlx::query_as::<Postgres, Semester>(
            "SELECT id, branch_id, name, created_at FROM semesters WHERE branch_id = $1 ORDER BY name ASC",
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(semesters)
    }

    #[tracing::instrument(skip(self), fields(db.table = "subjects", db.operation = "select"))]
    async fn list_subjects(&self, semester_id: Uuid) -> Result<Vec<Subject>, AppError> {
        let subjects = sqlx::query_as::<Postgres, Subject>(
            "SELECT id, semester_id, name, created_at FROM subjects WHERE semester_id = $1 ORDER BY name ASC",
        )
        .bind(semester_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subjects)
    }

    #[tracing::instrument(skip(self), fields(db.table = "units", db.operation = "select"))]
    async fn list_units(&self, subject_id: Uuid) -> Result<Vec<Unit>, AppError> {
        let units = sqlx::query_as::<Postgres, Unit>(
            "SELECT id, subject_id, name, created_at FROM units WHERE subject_id = $1 ORDER BY name ASC",
        )
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(units)
    }

    #[tracing::instrument(skip(self), fields(db.table = %level.table(), db.operation = "insert"))]
    async fn create_node(
        &self,
        level: CatalogLevel,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> Result<CatalogNode, AppError> {
        let node = match (level.parent(), level.parent_column(), parent_id) {
            (Some(parent), Some(column), Some(pid)) => {
                if !self.exists(parent, pid).await? {
                    return Err(AppError::NotFound(format!("{} not found", parent.label())));
                }

                let sql = format!(
                    "INSERT INTO {table} ({column}, name) VALUES ($1, $2) \
                     RETURNING id, {column} AS parent_id, name, created_at",
                    table = level.table(),
                    column = column,
                );
                sqlx::query_as::<Postgres, CatalogNode>(&sql)
                    .bind(pid)
                    .bind(name)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| insert_error(e, parent))?
            }
            (Some(parent), _, None) => {
                return Err(AppError::InvalidInput(format!(
                    "Missing {} id",
                    parent.label().to_lowercase()
                )));
            }
            _ => {
                sqlx::query_as::<Postgres, CatalogNode>(
                    "INSERT INTO branches (name) VALUES ($1) \
                     RETURNING id, NULL::uuid AS parent_id, name, created_at",
                )
                .bind(name)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(node)
    }

    #[tracing::instrument(
        skip(self),
        fields(
            db.table = %level.table(),
            db.operation = "delete",
            db.record_id = %id,
        )
    )]
    async fn delete_node(&self, level: CatalogLevel, id: Uuid) -> Result<u64, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", level.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(
        skip(self),
        fields(
            db.table = "units",
            db.operation = "select",
            db.record_id = %unit_id,
        )
    )]
    async fn unit_lineage(&self, unit_id: Uuid) -> Result<Option<UnitLineage>, AppError> {
        let lineage = sqlx::query_as::<Postgres, UnitLineage>(
            r#"
            SELECT se.branch_id, su.semester_id, u.subject_id, u.id AS unit_id
            FROM units u
            JOIN subjects su ON su.id = u.subject_id
            JOIN semesters se ON se.id = su.semester_id
            WHERE u.id = $1
            "#,
        )
        .bind(unit_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lineage)
    }
}
