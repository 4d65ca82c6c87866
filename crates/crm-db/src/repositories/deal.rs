//! PostgreSQL implementation of DealRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crm_core::entities::{Client, Deal, DealAttachment};
use crm_core::traits::{
    ClientTransition, DealFilter, DealInclude, DealOrderField, DealRecord, DealRepository, OrderBy,
    QueryOptions, RepoResult,
};

use crate::mappers::{client_from_model, deal_from_model};
use crate::models::{ClientModel, DealAttachmentModel, DealModel};

use super::error::{client_not_found, deal_not_found, map_db_error};

/// PostgreSQL implementation of DealRepository
///
/// Access scoping is part of the query: non-admin callers only see deals
/// whose client they are assigned to or that is shared with one of their
/// groups. `find_by_id` is unscoped; the service layer authorizes single
/// reads against the loaded client.
#[derive(Clone)]
pub struct PgDealRepository {
    pool: PgPool,
}

impl PgDealRepository {
    /// Create a new PgDealRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_shared_groups(&self, deal_id: Uuid) -> RepoResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            r"
            SELECT group_id FROM deal_shared_groups WHERE deal_id = $1
            ",
        )
        .bind(deal_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn load_client(&self, client_id: Uuid) -> RepoResult<Option<Client>> {
        let model = sqlx::query_as::<_, ClientModel>(
            r"
            SELECT id, name, status, assigned_to, created_at, updated_at
            FROM clients
            WHERE id = $1
            ",
        )
        .bind(client_id)
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
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Some(client_from_model(model, group_ids)?))
    }

    async fn load_attachments(&self, deal_id: Uuid) -> RepoResult<Vec<DealAttachment>> {
        let models = sqlx::query_as::<_, DealAttachmentModel>(
            r"
            SELECT id, deal_id, file_name, url, uploaded_by, created_at
            FROM deal_attachments
            WHERE deal_id = $1
            ORDER BY created_at
            ",
        )
        .bind(deal_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(DealAttachment::from).collect())
    }
}

/// Render the ORDER BY clause from the field allow-list
fn order_clause(options: &QueryOptions<DealOrderField>) -> String {
    let order = options
        .order_by
        .unwrap_or_else(|| OrderBy::desc(DealOrderField::default()));
    let column = match order.field {
        DealOrderField::UpdatedAt => "d.updated_at",
        DealOrderField::CreatedAt => "d.created_at",
        DealOrderField::Value => "d.value_amount",
        DealOrderField::Probability => "d.probability",
        DealOrderField::ExpectedCloseDate => "d.expected_close_date",
    };
    format!("ORDER BY {column} {}", order.direction.as_sql())
}

#[async_trait]
impl DealRepository for PgDealRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid, include: DealInclude) -> RepoResult<Option<DealRecord>> {
        let model = sqlx::query_as::<_, DealModel>(
            r"
            SELECT id, client_id, value_amount, value_currency, probability, stage,
                   expected_close_date, notes, created_at, updated_at
            FROM deals
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

        let client_id = model.client_id;
        let shared_groups = if include.contains(DealInclude::SHARED_GROUPS) {
            self.load_shared_groups(id).await?
        } else {
            Vec::new()
        };

        let mut record = DealRecord::bare(deal_from_model(model, shared_groups)?);

        if include.contains(DealInclude::CLIENT) {
            record.client = self.load_client(client_id).await?;
        }
        if include.contains(DealInclude::ATTACHMENTS) {
            record.attachments = self.load_attachments(id).await?;
        }

        Ok(Some(record))
    }

    #[instrument(skip(self, filter, options))]
    async fn find_many(
        &self,
        filter: &DealFilter,
        options: &QueryOptions<DealOrderField>,
    ) -> RepoResult<Vec<DealRecord>> {
        let query = format!(
            r"
            SELECT d.id, d.client_id, d.value_amount, d.value_currency, d.probability,
                   d.stage, d.expected_close_date, d.notes, d.created_at, d.updated_at
            FROM deals d
            JOIN clients c ON c.id = d.client_id
            WHERE ($1 OR c.assigned_to = $2 OR EXISTS (
                      SELECT 1 FROM client_shared_groups csg
                      WHERE csg.client_id = c.id AND csg.group_id = ANY($3)))
              AND ($4::uuid IS NULL OR d.client_id = $4)
              AND ($5::text IS NULL OR d.stage = $5)
              AND ($6::text IS NULL OR d.notes ILIKE $6 OR c.name ILIKE $6)
            {}
            LIMIT $7 OFFSET $8
            ",
            order_clause(options)
        );

        let search = filter.search.as_ref().map(|s| format!("%{s}%"));

        let models = sqlx::query_as::<_, DealModel>(&query)
            .bind(filter.scope.is_admin())
            .bind(filter.scope.user_id)
            .bind(&filter.scope.group_ids)
            .bind(filter.client_id)
            .bind(filter.stage.map(|s| s.as_str()))
            .bind(search)
            .bind(options.limit)
            .bind(options.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        if models.is_empty() {
            return Ok(Vec::new());
        }

        let deal_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let client_ids: Vec<Uuid> = models.iter().map(|m| m.client_id).collect();

        let mut deal_groups: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        if options.include.contains(DealInclude::SHARED_GROUPS) {
            let rows = sqlx::query_as::<_, (Uuid, Uuid)>(
                r"
                SELECT deal_id, group_id FROM deal_shared_groups WHERE deal_id = ANY($1)
                ",
            )
            .bind(&deal_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

            for (deal_id, group_id) in rows {
                deal_groups.entry(deal_id).or_default().push(group_id);
            }
        }

        let mut clients: HashMap<Uuid, Client> = HashMap::new();
        if options.include.contains(DealInclude::CLIENT) {
            let client_models = sqlx::query_as::<_, ClientModel>(
                r"
                SELECT id, name, status, assigned_to, created_at, updated_at
                FROM clients
                WHERE id = ANY($1)
                ",
            )
            .bind(&client_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

            let mut client_groups: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
            let rows = sqlx::query_as::<_, (Uuid, Uuid)>(
                r"
                SELECT client_id, group_id FROM client_shared_groups WHERE client_id = ANY($1)
                ",
            )
            .bind(&client_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

            for (client_id, group_id) in rows {
                client_groups.entry(client_id).or_default().push(group_id);
            }

            for model in client_models {
                let groups = client_groups.remove(&model.id).unwrap_or_default();
                let client = client_from_model(model, groups)?;
                clients.insert(client.id, client);
            }
        }

        let mut attachments: HashMap<Uuid, Vec<DealAttachment>> = HashMap::new();
        if options.include.contains(DealInclude::ATTACHMENTS) {
            let rows = sqlx::query_as::<_, DealAttachmentModel>(
                r"
                SELECT id, deal_id, file_name, url, uploaded_by, created_at
                FROM deal_attachments
                WHERE deal_id = ANY($1)
                ORDER BY created_at
                ",
            )
            .bind(&deal_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

            for row in rows {
                attachments
                    .entry(row.deal_id)
                    .or_default()
                    .push(DealAttachment::from(row));
            }
        }

        let mut records = Vec::with_capacity(models.len());
        for model in models {
            let deal_id = model.id;
            let client_id = model.client_id;
            let groups = deal_groups.remove(&deal_id).unwrap_or_default();
            let deal = deal_from_model(model, groups)?;
            records.push(DealRecord {
                deal,
                client: clients.get(&client_id).cloned(),
                attachments: attachments.remove(&deal_id).unwrap_or_default(),
            });
        }

        Ok(records)
    }

    #[instrument(skip(self, deal))]
    async fn create(&self, deal: &Deal) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO deals (id, client_id, value_amount, value_currency, probability,
                               stage, expected_close_date, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(deal.id)
        .bind(deal.client_id)
        .bind(deal.value.amount())
        .bind(deal.value.currency())
        .bind(i16::from(deal.probability.value()))
        .bind(deal.stage().as_str())
        .bind(deal.expected_close_date)
        .bind(&deal.notes)
        .bind(deal.created_at)
        .bind(deal.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if !deal.shared_group_ids.is_empty() {
            sqlx::query(
                r"
                INSERT INTO deal_shared_groups (deal_id, group_id)
                SELECT $1, unnest($2::uuid[])
                ",
            )
            .bind(deal.id)
            .bind(&deal.shared_group_ids)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, deal))]
    async fn update(&self, deal: &Deal) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE deals
            SET value_amount = $2, value_currency = $3, probability = $4, stage = $5,
                expected_close_date = $6, notes = $7, updated_at = $8
            WHERE id = $1
            ",
        )
        .bind(deal.id)
        .bind(deal.value.amount())
        .bind(deal.value.currency())
        .bind(i16::from(deal.probability.value()))
        .bind(deal.stage().as_str())
        .bind(deal.expected_close_date)
        .bind(&deal.notes)
        .bind(deal.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(deal_not_found(deal.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM deals WHERE id = $1
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(deal_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn exists(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM deals WHERE id = $1)
            ",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self, group_ids))]
    async fn set_shared_groups(&self, id: Uuid, group_ids: &[Uuid]) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            DELETE FROM deal_shared_groups WHERE deal_id = $1
            ",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if !group_ids.is_empty() {
            sqlx::query(
                r"
                INSERT INTO deal_shared_groups (deal_id, group_id)
                SELECT $1, unnest($2::uuid[])
                ",
            )
            .bind(id)
            .bind(group_ids)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, deal, transition))]
    async fn close(&self, deal: &Deal, transition: Option<&ClientTransition>) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            r"
            UPDATE deals
            SET probability = $2, stage = $3, notes = $4, updated_at = $5
            WHERE id = $1
            ",
        )
        .bind(deal.id)
        .bind(i16::from(deal.probability.value()))
        .bind(deal.stage().as_str())
        .bind(&deal.notes)
        .bind(deal.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(deal_not_found(deal.id));
        }

        if let Some(t) = transition {
            let result = sqlx::query(
                r"
                UPDATE clients SET status = $2, updated_at = NOW() WHERE id = $1
                ",
            )
            .bind(t.client_id)
            .bind(t.to.as_str())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

            if result.rows_affected() == 0 {
                return Err(client_not_found(t.client_id));
            }

            sqlx::query(
                r"
                INSERT INTO client_status_history
                    (id, client_id, from_status, to_status, changed_by, deal_id, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, NOW())
                ",
            )
            .bind(Uuid::new_v4())
            .bind(t.client_id)
            .bind(t.from.as_str())
            .bind(t.to.as_str())
            .bind(t.changed_by)
            .bind(t.deal_id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_core::traits::SortDirection;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgDealRepository>();
    }

    #[test]
    fn test_order_clause_defaults_to_updated_at_desc() {
        let options = QueryOptions::<DealOrderField>::default();
        assert_eq!(order_clause(&options), "ORDER BY d.updated_at DESC");
    }

    #[test]
    fn test_order_clause_renders_requested_field() {
        let options = QueryOptions::default()
            .with_order(OrderBy::new(DealOrderField::Value, SortDirection::Asc));
        assert_eq!(order_clause(&options), "ORDER BY d.value_amount ASC");
    }
}
