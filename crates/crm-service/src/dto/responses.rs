//! Response DTOs
//!
//! All response DTOs implement `Serialize` for JSON output. Monetary
//! amounts are serialized as strings to avoid float precision loss in
//! JavaScript clients.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Deal response
#[derive(Debug, Clone, Serialize)]
pub struct DealResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    /// Decimal amount rendered as a string
    pub value: String,
    pub currency: String,
    pub probability: i32,
    pub stage: String,
    pub expected_close_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub shared_group_ids: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientResponse>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client response
#[derive(Debug, Clone, Serialize)]
pub struct ClientResponse {
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub assigned_to: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Deal attachment response
#[derive(Debug, Clone, Serialize)]
pub struct AttachmentResponse {
    pub id: Uuid,
    pub deal_id: Uuid,
    pub file_name: String,
    pub url: String,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Task response
#[derive(Debug, Clone, Serialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: String,
    pub assigned_to: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub overdue: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contact response
#[derive(Debug, Clone, Serialize)]
pub struct ContactResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    pub kind: Option<String>,
    pub date: DateTime<Utc>,
    pub notes: String,
    pub is_note: bool,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
