//! Task service
//!
//! Tasks optionally belong to a client; when they do, the client's access
//! rules apply. Clientless tasks are visible to their assignee and admins.

use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crm_core::entities::Task;
use crm_core::events::{ActivityAction, ActivityEntry};
use crm_core::traits::{AccessScope, QueryOptions, TaskFilter, TaskOrderField};
use crm_core::value_objects::{ActingUser, TaskStatus};

use crate::dto::{CreateTaskRequest, ListTasksRequest, TaskResponse, UpdateTaskRequest};

use super::access::AccessControl;
use super::activity::ActivityLogger;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Task service
pub struct TaskService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TaskService<'a> {
    /// Create a new TaskService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a new task
    #[instrument(skip(self, user, request))]
    pub async fn create_task(
        &self,
        user: &ActingUser,
        request: CreateTaskRequest,
    ) -> ServiceResult<TaskResponse> {
        request.validate()?;

        if let Some(client_id) = request.client_id {
            AccessControl::new(self.ctx)
                .require_client(user, client_id)
                .await?;
        }

        let mut task = Task::new(request.title);
        task.description = request.description;
        task.due_date = request.due_date;
        task.assigned_to = request.assigned_to;
        task.client_id = request.client_id;

        self.ctx.task_repo().create(&task).await?;

        info!(task_id = %task.id, "Task created");

        ActivityLogger::new(self.ctx)
            .record(ActivityEntry::new(
                user.id,
                ActivityAction::TaskCreated,
                task.id,
            ))
            .await;

        Ok(TaskResponse::from(&task))
    }

    /// Get task by ID
    #[instrument(skip(self, user))]
    pub async fn get_task(&self, user: &ActingUser, task_id: Uuid) -> ServiceResult<TaskResponse> {
        let task = self.load_authorized(user, task_id).await?;
        Ok(TaskResponse::from(&task))
    }

    /// List tasks visible to the caller
    #[instrument(skip(self, user, request))]
    pub async fn list_tasks(
        &self,
        user: &ActingUser,
        request: ListTasksRequest,
    ) -> ServiceResult<Vec<TaskResponse>> {
        request.validate()?;

        let mut filter = TaskFilter::scoped(AccessScope::from(user));
        filter.client_id = request.client_id;
        filter.status = request
            .status
            .as_deref()
            .map(str::parse::<TaskStatus>)
            .transpose()?;
        filter.assigned_to = request.assigned_to;
        filter.overdue_only = request.overdue_only;

        let mut options = QueryOptions::<TaskOrderField>::default();
        if let Some(limit) = request.limit {
            options = options.with_page(limit, request.offset.unwrap_or(0));
        }

        let tasks = self.ctx.task_repo().find_many(&filter, &options).await?;

        Ok(tasks.iter().map(TaskResponse::from).collect())
    }

    /// Update a task - only fields present in the request are applied
    #[instrument(skip(self, user, request))]
    pub async fn update_task(
        &self,
        user: &ActingUser,
        task_id: Uuid,
        request: UpdateTaskRequest,
    ) -> ServiceResult<TaskResponse> {
        request.validate()?;

        let mut task = self.load_authorized(user, task_id).await?;

        if let Some(title) = request.title {
            task.set_title(title);
        }
        if let Some(description) = request.description {
            task.set_description(Some(description));
        }
        if let Some(due_date) = request.due_date {
            task.set_due_date(Some(due_date));
        }
        if let Some(status_str) = request.status.as_deref() {
            task.change_status(status_str.parse::<TaskStatus>()?);
        }
        if let Some(assigned_to) = request.assigned_to {
            task.assign_to(Some(assigned_to));
        }

        self.ctx.task_repo().update(&task).await?;

        ActivityLogger::new(self.ctx)
            .record(ActivityEntry::new(
                user.id,
                ActivityAction::TaskUpdated,
                task.id,
            ))
            .await;

        Ok(TaskResponse::from(&task))
    }

    /// Hard delete a task
    #[instrument(skip(self, user))]
    pub async fn delete_task(&self, user: &ActingUser, task_id: Uuid) -> ServiceResult<()> {
        self.load_authorized(user, task_id).await?;

        self.ctx.task_repo().delete(task_id).await?;

        info!(task_id = %task_id, "Task deleted");

        ActivityLogger::new(self.ctx)
            .record(ActivityEntry::new(
                user.id,
                ActivityAction::TaskDeleted,
                task_id,
            ))
            .await;

        Ok(())
    }

    /// Load a task and check the caller may act on it
    async fn load_authorized(&self, user: &ActingUser, task_id: Uuid) -> ServiceResult<Task> {
        let task = self
            .ctx
            .task_repo()
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task", task_id.to_string()))?;

        match task.client_id {
            Some(client_id) => {
                AccessControl::new(self.ctx)
                    .require_client(user, client_id)
                    .await?;
            }
            None => {
                if !user.is_admin() && task.assigned_to != Some(user.id) {
                    return Err(ServiceError::permission_denied(
                        "task is not assigned to the caller",
                    ));
                }
            }
        }

        Ok(task)
    }
}
