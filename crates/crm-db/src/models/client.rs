//! Client database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the clients table
#[derive(Debug, Clone, FromRow)]
pub struct ClientModel {
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub assigned_to: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
