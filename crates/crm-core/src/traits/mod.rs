//! Repository traits (ports) and their query types

mod query;
mod repositories;

pub use query::{
    AccessScope, ClientTransition, ContactFilter, ContactOrderField, DealFilter, DealInclude,
    DealOrderField, OrderBy, QueryOptions, SortDirection, TaskFilter, TaskOrderField,
};
pub use repositories::{
    ActivityLogRepository, ClientRepository, ContactRepository, DealRecord, DealRepository,
    RepoResult, TaskRepository,
};
