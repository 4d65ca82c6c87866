//! Task entity - a unit of work, optionally tied to a client

use chrono::{DateTime, Local, Utc};
use uuid::Uuid;

use crate::value_objects::TaskStatus;

/// Task aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub assigned_to: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new Task with a generated id
    pub fn new(title: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description: None,
            due_date: None,
            status: TaskStatus::Todo,
            assigned_to: None,
            client_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstruct a Task loaded from the persistence store
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        title: String,
        description: Option<String>,
        due_date: Option<DateTime<Utc>>,
        status: TaskStatus,
        assigned_to: Option<Uuid>,
        client_id: Option<Uuid>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            due_date,
            status,
            assigned_to,
            client_id,
            created_at,
            updated_at,
        }
    }

    /// Change the status
    ///
    /// A same-value transition is a no-op and does not bump `updated_at`.
    pub fn change_status(&mut self, status: TaskStatus) {
        if status == self.status {
            return;
        }
        self.status = status;
        self.touch();
    }

    /// Update the title
    pub fn set_title(&mut self, title: String) {
        self.title = title;
        self.touch();
    }

    /// Update the description
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.touch();
    }

    /// Set or clear the due date
    pub fn set_due_date(&mut self, due_date: Option<DateTime<Utc>>) {
        self.due_date = due_date;
        self.touch();
    }

    /// Reassign the task
    pub fn assign_to(&mut self, user_id: Option<Uuid>) {
        self.assigned_to = user_id;
        self.touch();
    }

    /// A task is overdue when it has a due date in the past and is not completed
    pub fn is_overdue(&self) -> bool {
        match self.due_date {
            Some(due) => !self.status.is_completed() && due < Utc::now(),
            None => false,
        }
    }

    /// Whether the due date falls on today's server-local date
    pub fn is_due_today(&self) -> bool {
        match self.due_date {
            Some(due) => due.with_timezone(&Local).date_naive() == Local::now().date_naive(),
            None => false,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }
}
