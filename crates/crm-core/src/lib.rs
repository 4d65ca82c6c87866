//! # crm-core
//!
//! Domain layer containing entities, value objects, repository traits, and the
//! deal pipeline rules. This crate has zero dependencies on infrastructure
//! (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Client, Contact, Deal, DealAttachment, Task};
pub use error::DomainError;
pub use events::{ActivityAction, ActivityEntry};
pub use pipeline::DealPipeline;
pub use traits::{
    AccessScope, ActivityLogRepository, ClientRepository, ClientTransition, ContactFilter,
    ContactOrderField, ContactRepository, DealFilter, DealInclude, DealOrderField, DealRecord,
    DealRepository, OrderBy, QueryOptions, RepoResult, SortDirection, TaskFilter, TaskOrderField,
    TaskRepository,
};
pub use value_objects::{
    ActingUser, ClientStatus, ContactKind, DealStage, DealValue, Probability, TaskStatus, UserRole,
};
