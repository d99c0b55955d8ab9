use notehub_core::AppError;
use sqlx::PgPool;

/// Liveness probe for the database
#[async_trait::async_trait]
pub trait DatabaseHealthTrait: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PostgresHealthCheck {
    pool: PgPool,
}

impl PostgresHealthCheck {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DatabaseHealthTrait for PostgresHealthCheck {
    #[tracing::instrument(skip(self), fields(db.operation = "ping"))]
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
