//! # crm-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    AccessControl, ActivityLogger, ContactService, DealService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, TaskService,
};
