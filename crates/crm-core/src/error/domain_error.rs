//! Domain errors - error types for the domain layer

use thiserror::Error;
use uuid::Uuid;

use crate::value_objects::DealStage;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Deal not found: {0}")]
    DealNotFound(Uuid),

    #[error("Task not found: {0}")]
    TaskNotFound(Uuid),

    #[error("Contact not found: {0}")]
    ContactNotFound(Uuid),

    #[error("Client not found: {0}")]
    ClientNotFound(Uuid),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid deal amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("Invalid probability: {0}")]
    InvalidProbability(String),

    #[error("Unknown deal stage: {0}")]
    UnknownStage(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Access denied: {0}")]
    AccessDenied(String),

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Invalid stage transition: {from} -> {to}")]
    InvalidStageTransition { from: DealStage, to: DealStage },

    #[error("Deal is already closed: {0}")]
    DealAlreadyClosed(Uuid),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::DealNotFound(_) => "UNKNOWN_DEAL",
            Self::TaskNotFound(_) => "UNKNOWN_TASK",
            Self::ContactNotFound(_) => "UNKNOWN_CONTACT",
            Self::ClientNotFound(_) => "UNKNOWN_CLIENT",

            // Validation
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidCurrency(_) => "INVALID_CURRENCY",
            Self::InvalidProbability(_) => "INVALID_PROBABILITY",
            Self::UnknownStage(_) => "UNKNOWN_STAGE",

            // Authorization
            Self::AccessDenied(_) => "ACCESS_DENIED",

            // Business Rules
            Self::InvalidStageTransition { .. } => "INVALID_STAGE_TRANSITION",
            Self::DealAlreadyClosed(_) => "DEAL_ALREADY_CLOSED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DealNotFound(_)
                | Self::TaskNotFound(_)
                | Self::ContactNotFound(_)
                | Self::ClientNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::InvalidAmount(_)
                | Self::InvalidCurrency(_)
                | Self::InvalidProbability(_)
                | Self::UnknownStage(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::AccessDenied(_))
    }

    /// Check if this is a business-rule conflict
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::InvalidStageTransition { .. } | Self::DealAlreadyClosed(_)
        )
    }
}
