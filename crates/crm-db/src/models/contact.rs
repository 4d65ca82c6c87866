//! Contact database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the contacts table
///
/// `kind` is NULL for free-form notes (`is_note = true`).
#[derive(Debug, Clone, FromRow)]
pub struct ContactModel {
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
