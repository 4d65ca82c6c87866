//! PostgreSQL implementation of ClientRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crm_core::entities::Client;
use crm_core::traits::{ClientRepository, RepoResult};

use crate::mappers::client_from_model;
use crate::models::ClientModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ClientRepository
#[derive(Clone)]
pub struct PgClientRepository {
    pool: PgPool,
}

impl PgClientRepository {
    /// Create a new PgClientRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientRepository for PgClientRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Client>> {
        let model = sqlx::query_as::<_, ClientModel>(
            r"
            SELECT id, name, status, assigned_to, created_at, updated_at
            FROM clients
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        let Some(model) = model else {
            return Ok(None);
        };

        let group_ids = sqlx::query_scalar::<_, Uuid>(
            r"
            SELECT group_id FROM client_shared_groups WHERE client_id = $1
            ",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Some(client_from_model(model, group_ids)?))
    }

    #[instrument(skip(self))]
    async fn exists(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1)
            ",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }
}
