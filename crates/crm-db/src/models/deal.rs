//! Deal database model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the deals table
///
/// `stage` is stored as TEXT and decoded through the domain parser, so a
/// corrupt row surfaces as a validation error instead of a panic.
#[derive(Debug, Clone, FromRow)]
pub struct DealModel {
    pub id: Uuid,
    pub client_id: Uuid,
    pub value_amount: Decimal,
    pub value_currency: String,
    pub probability: i16,
    pub stage: String,
    pub expected_close_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
