//! Service context - dependency container for services
//!
//! Holds the repositories needed by the services behind trait objects so
//! tests can substitute in-memory fakes.

use std::sync::Arc;

use crm_core::traits::{
    ActivityLogRepository, ClientRepository, ContactRepository, DealRepository, TaskRepository,
};
use crm_db::repositories::{
    PgActivityLogRepository, PgClientRepository, PgContactRepository, PgDealRepository,
    PgTaskRepository,
};
use crm_db::PgPool;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    deal_repo: Arc<dyn DealRepository>,
    task_repo: Arc<dyn TaskRepository>,
    contact_repo: Arc<dyn ContactRepository>,
    client_repo: Arc<dyn ClientRepository>,
    activity_repo: Arc<dyn ActivityLogRepository>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        deal_repo: Arc<dyn DealRepository>,
        task_repo: Arc<dyn TaskRepository>,
        contact_repo: Arc<dyn ContactRepository>,
        client_repo: Arc<dyn ClientRepository>,
        activity_repo: Arc<dyn ActivityLogRepository>,
    ) -> Self {
        Self {
            deal_repo,
            task_repo,
            contact_repo,
            client_repo,
            activity_repo,
        }
    }

    /// Create a context backed by the PostgreSQL repositories
    pub fn from_pool(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgDealRepository::new(pool.clone())),
            Arc::new(PgTaskRepository::new(pool.clone())),
            Arc::new(PgContactRepository::new(pool.clone())),
            Arc::new(PgClientRepository::new(pool.clone())),
            Arc::new(PgActivityLogRepository::new(pool)),
        )
    }

    /// Get the deal repository
    pub fn deal_repo(&self) -> &dyn DealRepository {
        self.deal_repo.as_ref()
    }

    /// Get the task repository
    pub fn task_repo(&self) -> &dyn TaskRepository {
        self.task_repo.as_ref()
    }

    /// Get the contact repository
    pub fn contact_repo(&self) -> &dyn ContactRepository {
        self.contact_repo.as_ref()
    }

    /// Get the client repository
    pub fn client_repo(&self) -> &dyn ClientRepository {
        self.client_repo.as_ref()
    }

    /// Get the activity log repository
    pub fn activity_repo(&self) -> &dyn ActivityLogRepository {
        self.activity_repo.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext
pub struct ServiceContextBuilder {
    deal_repo: Option<Arc<dyn DealRepository>>,
    task_repo: Option<Arc<dyn TaskRepository>>,
    contact_repo: Option<Arc<dyn ContactRepository>>,
    client_repo: Option<Arc<dyn ClientRepository>>,
    activity_repo: Option<Arc<dyn ActivityLogRepository>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            deal_repo: None,
            task_repo: None,
            contact_repo: None,
            client_repo: None,
            activity_repo: None,
        }
    }

    pub fn deal_repo(mut self, repo: Arc<dyn DealRepository>) -> Self {
        self.deal_repo = Some(repo);
        self
    }

    pub fn task_repo(mut self, repo: Arc<dyn TaskRepository>) -> Self {
        self.task_repo = Some(repo);
        self
    }

    pub fn contact_repo(mut self, repo: Arc<dyn ContactRepository>) -> Self {
        self.contact_repo = Some(repo);
        self
    }

    pub fn client_repo(mut self, repo: Arc<dyn ClientRepository>) -> Self {
        self.client_repo = Some(repo);
        self
    }

    pub fn activity_repo(mut self, repo: Arc<dyn ActivityLogRepository>) -> Self {
        self.activity_repo = Some(repo);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;

        Ok(ServiceContext::new(
            self.deal_repo
                .ok_or_else(|| ServiceError::validation("deal_repo is required"))?,
            self.task_repo
                .ok_or_else(|| ServiceError::validation("task_repo is required"))?,
            self.contact_repo
                .ok_or_else(|| ServiceError::validation("contact_repo is required"))?,
            self.client_repo
                .ok_or_else(|| ServiceError::validation("client_repo is required"))?,
            self.activity_repo
                .ok_or_else(|| ServiceError::validation("activity_repo is required"))?,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
