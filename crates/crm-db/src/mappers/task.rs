//! Task model -> entity mapper

use crm_core::entities::Task;
use crm_core::error::DomainError;
use crm_core::value_objects::TaskStatus;

use crate::models::TaskModel;

impl TryFrom<TaskModel> for Task {
    type Error = DomainError;

    fn try_from(model: TaskModel) -> Result<Self, Self::Error> {
        let status: TaskStatus = model.status.parse()?;

        Ok(Task::restore(
            model.id,
            model.title,
            model.description,
            model.due_date,
            status,
            model.assigned_to,
            model.client_id,
            model.created_at,
            model.updated_at,
        ))
    }
}
