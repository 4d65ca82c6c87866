//! PostgreSQL implementation of TaskRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crm_core::entities::Task;
use crm_core::traits::{OrderBy, QueryOptions, RepoResult, TaskFilter, TaskOrderField, TaskRepository};

use crate::models::TaskModel;

use super::error::{map_db_error, task_not_found};

/// PostgreSQL implementation of TaskRepository
///
/// Tasks without a client are visible to their assignee (and admins); tasks
/// attached to a client inherit the client's access rules.
#[derive(Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    /// Create a new PgTaskRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Render the ORDER BY clause from the field allow-list
fn order_clause(options: &QueryOptions<TaskOrderField>) -> String {
    let order = options
        .order_by
        .unwrap_or_else(|| OrderBy::asc(TaskOrderField::default()));
    let column = match order.field {
        TaskOrderField::DueDate => "t.due_date",
        TaskOrderField::CreatedAt => "t.created_at",
        TaskOrderField::UpdatedAt => "t.updated_at",
        TaskOrderField::Title => "t.title",
    };
    format!("ORDER BY {column} {}", order.direction.as_sql())
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Task>> {
        let model = sqlx::query_as::<_, TaskModel>(
            r"
            SELECT id, title, description, due_date, status, assigned_to, client_id,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        model.map(Task::try_from).transpose()
    }

    #[instrument(skip(self, filter, options))]
    async fn find_many(
        &self,
        filter: &TaskFilter,
        options: &QueryOptions<TaskOrderField>,
    ) -> RepoResult<Vec<Task>> {
        let query = format!(
            r"
            SELECT t.id, t.title, t.description, t.due_date, t.status, t.assigned_to,
                   t.client_id, t.created_at, t.updated_at
            FROM tasks t
            LEFT JOIN clients c ON c.id = t.client_id
            WHERE ($1
                   OR (t.client_id IS NULL AND t.assigned_to = $2)
                   OR c.assigned_to = $2
                   OR EXISTS (
                      SELECT 1 FROM client_shared_groups csg
                      WHERE csg.client_id = c.id AND csg.group_id = ANY($3)))
              AND ($4::uuid IS NULL OR t.client_id = $4)
              AND ($5::text IS NULL OR t.status = $5)
              AND ($6::uuid IS NULL OR t.assigned_to = $6)
              AND (NOT $7 OR (t.due_date < NOW() AND t.status <> 'COMPLETED'))
            {}
            LIMIT $8 OFFSET $9
            ",
            order_clause(options)
        );

        let models = sqlx::query_as::<_, TaskModel>(&query)
            .bind(filter.scope.is_admin())
            .bind(filter.scope.user_id)
            .bind(&filter.scope.group_ids)
            .bind(filter.client_id)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.assigned_to)
            .bind(filter.overdue_only)
            .bind(options.limit)
            .bind(options.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        models.into_iter().map(Task::try_from).collect()
    }

    #[instrument(skip(self, task))]
    async fn create(&self, task: &Task) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO tasks (id, title, description, due_date, status, assigned_to,
                               client_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(task.status.as_str())
        .bind(task.assigned_to)
        .bind(task.client_id)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, task))]
    async fn update(&self, task: &Task) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE tasks
            SET title = $2, description = $3, due_date = $4, status = $5,
                assigned_to = $6, client_id = $7, updated_at = $8
            WHERE id = $1
            ",
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(task.status.as_str())
        .bind(task.assigned_to)
        .bind(task.client_id)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(task_not_found(task.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM tasks WHERE id = $1
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(task_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn exists(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM tasks WHERE id = $1)
            ",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }
}
