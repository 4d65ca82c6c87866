//! Error handling utilities for repositories

use crm_core::error::DomainError;
use sqlx::Error as SqlxError;
use uuid::Uuid;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Create a "deal not found" error
pub fn deal_not_found(id: Uuid) -> DomainError {
    DomainError::DealNotFound(id)
}

/// Create a "task not found" error
pub fn task_not_found(id: Uuid) -> DomainError {
    DomainError::TaskNotFound(id)
}

/// Create a "contact not found" error
pub fn contact_not_found(id: Uuid) -> DomainError {
    DomainError::ContactNotFound(id)
}

/// Create a "client not found" error
pub fn client_not_found(id: Uuid) -> DomainError {
    DomainError::ClientNotFound(id)
}
