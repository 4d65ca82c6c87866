//! Activity log entries - append-only audit trail of user actions
//!
//! Entries are written best-effort alongside (never inside) business
//! transactions: a failed log write must not roll back the operation it
//! describes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// Action recorded in the activity log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityAction {
    DealWon,
    DealLost,
    DealCreated,
    DealUpdated,
    DealDeleted,
    TaskCreated,
    TaskUpdated,
    TaskDeleted,
    ContactLogged,
    ContactDeleted,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DealWon => "DEAL_WON",
            Self::DealLost => "DEAL_LOST",
            Self::DealCreated => "DEAL_CREATED",
            Self::DealUpdated => "DEAL_UPDATED",
            Self::DealDeleted => "DEAL_DELETED",
            Self::TaskCreated => "TASK_CREATED",
            Self::TaskUpdated => "TASK_UPDATED",
            Self::TaskDeleted => "TASK_DELETED",
            Self::ContactLogged => "CONTACT_LOGGED",
            Self::ContactDeleted => "CONTACT_DELETED",
        }
    }
}

impl std::fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single audit log record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: Uuid,
    /// User who performed the action
    pub user_id: Uuid,
    pub action: ActivityAction,
    /// Primary entity the action applies to
    pub entity_id: Uuid,
    /// Structured detail; field names only, never field values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn new(user_id: Uuid, action: ActivityAction, entity_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            action,
            entity_id,
            detail: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Record a deal update, listing only the names of the changed fields
    pub fn deal_updated(user_id: Uuid, deal_id: Uuid, fields: &[&str]) -> Self {
        Self::new(user_id, ActivityAction::DealUpdated, deal_id)
            .with_detail(json!({ "fields": fields }))
    }
}
