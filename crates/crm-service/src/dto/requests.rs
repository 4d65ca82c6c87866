//! Request DTOs
//!
//! All request DTOs implement `Deserialize`; those carrying user input also
//! implement `Validate`. Stage, status, and kind arrive as wire strings and
//! are parsed by the domain layer.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Deal Requests
// ============================================================================

/// Create deal request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDealRequest {
    pub client_id: Uuid,

    pub value: Decimal,

    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,

    #[validate(range(min = 0, max = 100, message = "Probability must be 0-100"))]
    pub probability: i32,

    /// Initial stage; defaults to LEAD when absent
    pub stage: Option<String>,

    pub expected_close_date: Option<NaiveDate>,

    #[validate(length(max = 10000, message = "Notes must be at most 10000 characters"))]
    pub notes: Option<String>,

    pub shared_group_ids: Option<Vec<Uuid>>,
}

/// Update deal request - only present fields are applied
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDealRequest {
    pub value: Option<Decimal>,

    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,

    #[validate(range(min = 0, max = 100, message = "Probability must be 0-100"))]
    pub probability: Option<i32>,

    pub stage: Option<String>,

    pub expected_close_date: Option<NaiveDate>,

    #[validate(length(max = 10000, message = "Notes must be at most 10000 characters"))]
    pub notes: Option<String>,

    pub shared_group_ids: Option<Vec<Uuid>>,
}

/// List deals request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListDealsRequest {
    pub client_id: Option<Uuid>,

    pub stage: Option<String>,

    #[validate(length(max = 200, message = "Search term must be at most 200 characters"))]
    pub search: Option<String>,

    /// Eager-load the client on each returned deal
    #[serde(default)]
    pub include_client: bool,

    #[validate(range(min = 1, max = 100, message = "Limit must be 1-100"))]
    pub limit: Option<i64>,

    #[validate(range(min = 0, message = "Offset must be non-negative"))]
    pub offset: Option<i64>,
}

// ============================================================================
// Task Requests
// ============================================================================

/// Create task request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub due_date: Option<DateTime<Utc>>,

    pub assigned_to: Option<Uuid>,

    pub client_id: Option<Uuid>,
}

/// Update task request - only present fields are applied
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub due_date: Option<DateTime<Utc>>,

    pub status: Option<String>,

    pub assigned_to: Option<Uuid>,
}

/// List tasks request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListTasksRequest {
    pub client_id: Option<Uuid>,

    pub status: Option<String>,

    pub assigned_to: Option<Uuid>,

    #[serde(default)]
    pub overdue_only: bool,

    #[validate(range(min = 1, max = 100, message = "Limit must be 1-100"))]
    pub limit: Option<i64>,

    #[validate(range(min = 0, message = "Offset must be non-negative"))]
    pub offset: Option<i64>,
}

// ============================================================================
// Contact Requests
// ============================================================================

/// Log a client interaction or attach a note
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LogContactRequest {
    pub client_id: Uuid,

    /// Interaction kind; required unless `is_note` is set
    pub kind: Option<String>,

    /// When the interaction happened; defaults to now
    pub date: Option<DateTime<Utc>>,

    #[validate(length(min = 1, max = 10000, message = "Notes must be 1-10000 characters"))]
    pub notes: String,

    #[serde(default)]
    pub is_note: bool,
}

/// List contacts request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListContactsRequest {
    pub client_id: Option<Uuid>,

    pub is_note: Option<bool>,

    pub kind: Option<String>,

    #[validate(range(min = 1, max = 100, message = "Limit must be 1-100"))]
    pub limit: Option<i64>,

    #[validate(range(min = 0, message = "Offset must be non-negative"))]
    pub offset: Option<i64>,
}
