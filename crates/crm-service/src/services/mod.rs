//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, authorization, and orchestration of domain operations.

pub mod access;
pub mod activity;
pub mod contact;
pub mod context;
pub mod deal;
pub mod error;
pub mod task;

// Re-export all services for convenience
pub use access::AccessControl;
pub use activity::ActivityLogger;
pub use contact::ContactService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use deal::DealService;
pub use error::{ServiceError, ServiceResult};
pub use task::TaskService;
