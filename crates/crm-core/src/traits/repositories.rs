//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs; the infrastructure layer provides
//! the implementation. Entities are ephemeral: reconstructed on each read,
//! discarded after each write. The store is the single source of truth.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Client, Contact, Deal, DealAttachment, Task};
use crate::error::DomainError;
use crate::events::ActivityEntry;

use super::query::{
    ClientTransition, ContactFilter, ContactOrderField, DealFilter, DealInclude, DealOrderField,
    QueryOptions, TaskFilter, TaskOrderField,
};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Deal Repository
// ============================================================================

/// A deal together with its eager-loaded relations
///
/// `client` and `attachments` are populated only when the corresponding
/// [`DealInclude`] flag was requested; the same goes for the deal's
/// `shared_group_ids`.
#[derive(Debug, Clone)]
pub struct DealRecord {
    pub deal: Deal,
    pub client: Option<Client>,
    pub attachments: Vec<DealAttachment>,
}

impl DealRecord {
    pub fn bare(deal: Deal) -> Self {
        Self {
            deal,
            client: None,
            attachments: Vec::new(),
        }
    }
}

#[async_trait]
pub trait DealRepository: Send + Sync {
    /// Find deal by ID, eager-loading the relations named in `include`
    async fn find_by_id(&self, id: Uuid, include: DealInclude) -> RepoResult<Option<DealRecord>>;

    /// List deals matching the filter; defaults to `updated_at DESC`
    async fn find_many(
        &self,
        filter: &DealFilter,
        options: &QueryOptions<DealOrderField>,
    ) -> RepoResult<Vec<DealRecord>>;

    /// Create a new deal
    async fn create(&self, deal: &Deal) -> RepoResult<()>;

    /// Update an existing deal
    ///
    /// Blind overwrite: there is no version check, so concurrent writers to
    /// the same deal resolve last-write-wins.
    async fn update(&self, deal: &Deal) -> RepoResult<()>;

    /// Hard delete a deal; the activity log is the only surviving record
    async fn delete(&self, id: Uuid) -> RepoResult<()>;

    /// Check whether a deal exists
    async fn exists(&self, id: Uuid) -> RepoResult<bool>;

    /// Replace the deal's shared-group associations
    async fn set_shared_groups(&self, id: Uuid, group_ids: &[Uuid]) -> RepoResult<()>;

    /// Persist a closed deal, atomically with the client status change
    ///
    /// The deal's terminal stage, the optional client status update, and its
    /// status-history row all commit or roll back together.
    async fn close(&self, deal: &Deal, transition: Option<&ClientTransition>) -> RepoResult<()>;
}

// ============================================================================
// Task Repository
// ============================================================================

#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Find task by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Task>>;

    /// List tasks matching the filter
    async fn find_many(
        &self,
        filter: &TaskFilter,
        options: &QueryOptions<TaskOrderField>,
    ) -> RepoResult<Vec<Task>>;

    /// Create a new task
    async fn create(&self, task: &Task) -> RepoResult<()>;

    /// Update an existing task (blind overwrite, last-write-wins)
    async fn update(&self, task: &Task) -> RepoResult<()>;

    /// Hard delete a task
    async fn delete(&self, id: Uuid) -> RepoResult<()>;

    /// Check whether a task exists
    async fn exists(&self, id: Uuid) -> RepoResult<bool>;
}

// ============================================================================
// Contact Repository
// ============================================================================

#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Find contact by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Contact>>;

    /// List contacts matching the filter
    async fn find_many(
        &self,
        filter: &ContactFilter,
        options: &QueryOptions<ContactOrderField>,
    ) -> RepoResult<Vec<Contact>>;

    /// Create a new contact
    async fn create(&self, contact: &Contact) -> RepoResult<()>;

    /// Update an existing contact (blind overwrite, last-write-wins)
    async fn update(&self, contact: &Contact) -> RepoResult<()>;

    /// Hard delete a contact
    async fn delete(&self, id: Uuid) -> RepoResult<()>;

    /// Check whether a contact exists
    async fn exists(&self, id: Uuid) -> RepoResult<bool>;
}

// ============================================================================
// Client Repository
// ============================================================================

/// Read access to client records
///
/// Full client CRUD lives outside this core; the deal/task/contact use cases
/// only need to load a client for authorization checks and the close-deal
/// status transition.
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Find client by ID, including its shared-group associations
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Client>>;

    /// Check whether a client exists
    async fn exists(&self, id: Uuid) -> RepoResult<bool>;
}

// ============================================================================
// Activity Log Repository
// ============================================================================

/// Append-only audit log
#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    /// Append an entry; callers treat failures as best-effort
    async fn append(&self, entry: &ActivityEntry) -> RepoResult<()>;
}
