//! Deal attachment database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the deal_attachments table
#[derive(Debug, Clone, FromRow)]
pub struct DealAttachmentModel {
    pub id: Uuid,
    pub deal_id: Uuid,
    pub file_name: String,
    pub url: String,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}
