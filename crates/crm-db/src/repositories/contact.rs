//! PostgreSQL implementation of ContactRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crm_core::entities::Contact;
use crm_core::traits::{
    ContactFilter, ContactOrderField, ContactRepository, OrderBy, QueryOptions, RepoResult,
};

use crate::models::ContactModel;

use super::error::{contact_not_found, map_db_error};

/// PostgreSQL implementation of ContactRepository
#[derive(Clone)]
pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    /// Create a new PgContactRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Render the ORDER BY clause from the field allow-list
fn order_clause(options: &QueryOptions<ContactOrderField>) -> String {
    let order = options
        .order_by
        .unwrap_or_else(|| OrderBy::desc(ContactOrderField::default()));
    let column = match order.field {
        ContactOrderField::Date => "ct.date",
        ContactOrderField::CreatedAt => "ct.created_at",
    };
    format!("ORDER BY {column} {}", order.direction.as_sql())
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Contact>> {
        let model = sqlx::query_as::<_, ContactModel>(
            r"
            SELECT id, client_id, kind, date, notes, is_note, user_id, created_at, updated_at
            FROM contacts
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        model.map(Contact::try_from).transpose()
    }

    #[instrument(skip(self, filter, options))]
    async fn find_many(
        &self,
        filter: &ContactFilter,
        options: &QueryOptions<ContactOrderField>,
    ) -> RepoResult<Vec<Contact>> {
        let query = format!(
            r"
            SELECT ct.id, ct.client_id, ct.kind, ct.date, ct.notes, ct.is_note, ct.user_id,
                   ct.created_at, ct.updated_at
            FROM contacts ct
            JOIN clients c ON c.id = ct.client_id
            WHERE ($1 OR c.assigned_to = $2 OR EXISTS (
                      SELECT 1 FROM client_shared_groups csg
                      WHERE csg.client_id = c.id AND csg.group_id = ANY($3)))
              AND ($4::uuid IS NULL OR ct.client_id = $4)
              AND ($5::boolean IS NULL OR ct.is_note = $5)
              AND ($6::text IS NULL OR ct.kind = $6)
            {}
            LIMIT $7 OFFSET $8
            ",
            order_clause(options)
        );

        let models = sqlx::query_as::<_, ContactModel>(&query)
            .bind(filter.scope.is_admin())
            .bind(filter.scope.user_id)
            .bind(&filter.scope.group_ids)
            .bind(filter.client_id)
            .bind(filter.is_note)
            .bind(filter.kind.map(|k| k.as_str()))
            .bind(options.limit)
            .bind(options.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        models.into_iter().map(Contact::try_from).collect()
    }

    #[instrument(skip(self, contact))]
    async fn create(&self, contact: &Contact) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO contacts (id, client_id, kind, date, notes, is_note, user_id,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(contact.id)
        .bind(contact.client_id)
        .bind(contact.kind.map(|k| k.as_str()))
        .bind(contact.date)
        .bind(&contact.notes)
        .bind(contact.is_note)
        .bind(contact.user_id)
        .bind(contact.created_at)
        .bind(contact.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, contact))]
    async fn update(&self, contact: &Contact) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE contacts
            SET kind = $2, date = $3, notes = $4, is_note = $5, updated_at = $6
            WHERE id = $1
            ",
        )
        .bind(contact.id)
        .bind(contact.kind.map(|k| k.as_str()))
        .bind(contact.date)
        .bind(&contact.notes)
        .bind(contact.is_note)
        .bind(contact.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(contact_not_found(contact.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM contacts WHERE id = $1
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(contact_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn exists(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM contacts WHERE id = $1)
            ",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgContactRepository>();
    }

    #[test]
    fn test_order_clause_defaults_to_date_desc() {
        let options = QueryOptions::<ContactOrderField>::default();
        assert_eq!(order_clause(&options), "ORDER BY ct.date DESC");
    }
}
