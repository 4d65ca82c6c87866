//! PostgreSQL implementation of ActivityLogRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use crm_core::events::ActivityEntry;
use crm_core::traits::{ActivityLogRepository, RepoResult};

use super::error::map_db_error;

/// PostgreSQL implementation of ActivityLogRepository
///
/// Writes run on the pool, outside any business transaction: the audit log
/// is best-effort and must never roll back the operation it describes.
#[derive(Clone)]
pub struct PgActivityLogRepository {
    pool: PgPool,
}

impl PgActivityLogRepository {
    /// Create a new PgActivityLogRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityLogRepository for PgActivityLogRepository {
    #[instrument(skip(self, entry))]
    async fn append(&self, entry: &ActivityEntry) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO activity_log (id, user_id, action, entity_id, detail, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.action.as_str())
        .bind(entry.entity_id)
        .bind(&entry.detail)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
