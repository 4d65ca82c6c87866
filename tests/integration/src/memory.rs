//! In-memory repository fakes
//!
//! A single [`MemoryDb`] holds all state behind one mutex, so the fake
//! `close` can emulate the transactional both-or-neither behavior of the
//! real store. `fail_close_after_deal` injects a mid-transaction failure
//! (the deal write is rolled back, nothing is committed) and
//! `fail_activity` makes audit appends fail, for the best-effort tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use crm_core::entities::{Client, Contact, Deal, Task};
use crm_core::events::ActivityEntry;
use crm_core::traits::{
    AccessScope, ActivityLogRepository, ClientRepository, ClientTransition, ContactFilter,
    ContactOrderField, ContactRepository, DealFilter, DealInclude, DealOrderField, DealRecord,
    DealRepository, OrderBy, QueryOptions, RepoResult, SortDirection, TaskFilter, TaskOrderField,
    TaskRepository,
};
use crm_core::value_objects::ClientStatus;
use crm_core::DomainError;

/// One row of the fake client status history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusHistoryRow {
    pub client_id: Uuid,
    pub from: ClientStatus,
    pub to: ClientStatus,
    pub changed_by: Uuid,
    pub deal_id: Uuid,
}

#[derive(Default)]
struct State {
    clients: Vec<Client>,
    deals: Vec<Deal>,
    tasks: Vec<Task>,
    contacts: Vec<Contact>,
    history: Vec<StatusHistoryRow>,
    activity: Vec<ActivityEntry>,
    fail_close_after_deal: bool,
    fail_activity: bool,
}

/// Shared in-memory store backing all fake repositories
#[derive(Default)]
pub struct MemoryDb {
    state: Mutex<State>,
}

impl MemoryDb {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    // === Seeding ===

    pub fn insert_client(&self, client: Client) {
        self.state.lock().clients.push(client);
    }

    pub fn insert_deal(&self, deal: Deal) {
        self.state.lock().deals.push(deal);
    }

    pub fn insert_task(&self, task: Task) {
        self.state.lock().tasks.push(task);
    }

    // === Failure injection ===

    /// Make the next `close` fail after the deal write (simulated rollback)
    pub fn fail_close_after_deal(&self) {
        self.state.lock().fail_close_after_deal = true;
    }

    /// Make activity log appends fail
    pub fn fail_activity(&self) {
        self.state.lock().fail_activity = true;
    }

    // === Inspection ===

    pub fn deal(&self, id: Uuid) -> Option<Deal> {
        self.state.lock().deals.iter().find(|d| d.id == id).cloned()
    }

    pub fn client(&self, id: Uuid) -> Option<Client> {
        self.state
            .lock()
            .clients
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    pub fn history_for(&self, client_id: Uuid) -> Vec<StatusHistoryRow> {
        self.state
            .lock()
            .history
            .iter()
            .filter(|h| h.client_id == client_id)
            .cloned()
            .collect()
    }

    pub fn activity_entries(&self) -> Vec<ActivityEntry> {
        self.state.lock().activity.clone()
    }

    fn client_visible(state: &State, scope: &AccessScope, client_id: Uuid) -> bool {
        if scope.is_admin() {
            return true;
        }
        state
            .clients
            .iter()
            .find(|c| c.id == client_id)
            .is_some_and(|c| {
                c.is_assignee(scope.user_id) || c.is_shared_with_any(&scope.group_ids)
            })
    }
}

fn paginate<T>(mut items: Vec<T>, limit: Option<i64>, offset: Option<i64>) -> Vec<T> {
    let offset = usize::try_from(offset.unwrap_or(0)).unwrap_or(0);
    if offset > 0 {
        items = items.into_iter().skip(offset).collect();
    }
    if let Some(limit) = limit {
        items.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }
    items
}

// ============================================================================
// Deal repository fake
// ============================================================================

pub struct MemoryDealRepository(pub Arc<MemoryDb>);

#[async_trait]
impl DealRepository for MemoryDealRepository {
    async fn find_by_id(&self, id: Uuid, include: DealInclude) -> RepoResult<Option<DealRecord>> {
        let state = self.0.state.lock();
        let Some(deal) = state.deals.iter().find(|d| d.id == id).cloned() else {
            return Ok(None);
        };

        let client = if include.contains(DealInclude::CLIENT) {
            state
                .clients
                .iter()
                .find(|c| c.id == deal.client_id)
                .cloned()
        } else {
            None
        };

        Ok(Some(DealRecord {
            deal,
            client,
            attachments: Vec::new(),
        }))
    }

    async fn find_many(
        &self,
        filter: &DealFilter,
        options: &QueryOptions<DealOrderField>,
    ) -> RepoResult<Vec<DealRecord>> {
        let state = self.0.state.lock();

        let mut deals: Vec<Deal> = state
            .deals
            .iter()
            .filter(|d| MemoryDb::client_visible(&state, &filter.scope, d.client_id))
            .filter(|d| filter.client_id.is_none_or(|id| d.client_id == id))
            .filter(|d| filter.stage.is_none_or(|s| d.stage() == s))
            .filter(|d| match &filter.search {
                None => true,
                Some(term) => {
                    let term = term.to_lowercase();
                    let in_notes = d
                        .notes
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&term));
                    let in_client = state
                        .clients
                        .iter()
                        .find(|c| c.id == d.client_id)
                        .is_some_and(|c| c.name.to_lowercase().contains(&term));
                    in_notes || in_client
                }
            })
            .cloned()
            .collect();

        // Default order: updated_at DESC
        let order = options
            .order_by
            .unwrap_or_else(|| OrderBy::desc(DealOrderField::default()));
        deals.sort_by(|a, b| {
            let ord = match order.field {
                DealOrderField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                DealOrderField::CreatedAt => a.created_at.cmp(&b.created_at),
                DealOrderField::Value => a.value.amount().cmp(&b.value.amount()),
                DealOrderField::Probability => a.probability.value().cmp(&b.probability.value()),
                DealOrderField::ExpectedCloseDate => {
                    a.expected_close_date.cmp(&b.expected_close_date)
                }
            };
            match order.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        let deals = paginate(deals, options.limit, options.offset);

        Ok(deals
            .into_iter()
            .map(|deal| {
                let client = if options.include.contains(DealInclude::CLIENT) {
                    state
                        .clients
                        .iter()
                        .find(|c| c.id == deal.client_id)
                        .cloned()
                } else {
                    None
                };
                DealRecord {
                    deal,
                    client,
                    attachments: Vec::new(),
                }
            })
            .collect())
    }

    async fn create(&self, deal: &Deal) -> RepoResult<()> {
        self.0.state.lock().deals.push(deal.clone());
        Ok(())
    }

    async fn update(&self, deal: &Deal) -> RepoResult<()> {
        let mut state = self.0.state.lock();
        let Some(stored) = state.deals.iter_mut().find(|d| d.id == deal.id) else {
            return Err(DomainError::DealNotFound(deal.id));
        };
        *stored = deal.clone();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut state = self.0.state.lock();
        let before = state.deals.len();
        state.deals.retain(|d| d.id != id);
        if state.deals.len() == before {
            return Err(DomainError::DealNotFound(id));
        }
        Ok(())
    }

    async fn exists(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.0.state.lock().deals.iter().any(|d| d.id == id))
    }

    async fn set_shared_groups(&self, id: Uuid, group_ids: &[Uuid]) -> RepoResult<()> {
        let mut state = self.0.state.lock();
        let Some(stored) = state.deals.iter_mut().find(|d| d.id == id) else {
            return Err(DomainError::DealNotFound(id));
        };
        stored.shared_group_ids = group_ids.to_vec();
        Ok(())
    }

    async fn close(&self, deal: &Deal, transition: Option<&ClientTransition>) -> RepoResult<()> {
        let mut state = self.0.state.lock();

        if !state.deals.iter().any(|d| d.id == deal.id) {
            return Err(DomainError::DealNotFound(deal.id));
        }

        // Simulated crash inside the transaction: the deal write is rolled
        // back, so nothing below is applied
        if state.fail_close_after_deal {
            state.fail_close_after_deal = false;
            return Err(DomainError::DatabaseError(
                "injected failure after deal write".to_string(),
            ));
        }

        if let Some(stored) = state.deals.iter_mut().find(|d| d.id == deal.id) {
            *stored = deal.clone();
        }

        if let Some(t) = transition {
            let Some(client) = state.clients.iter_mut().find(|c| c.id == t.client_id) else {
                return Err(DomainError::ClientNotFound(t.client_id));
            };
            client.set_status(t.to);
            state.history.push(StatusHistoryRow {
                client_id: t.client_id,
                from: t.from,
                to: t.to,
                changed_by: t.changed_by,
                deal_id: t.deal_id,
            });
        }

        Ok(())
    }
}

// ============================================================================
// Task repository fake
// ============================================================================

pub struct MemoryTaskRepository(pub Arc<MemoryDb>);

#[async_trait]
impl TaskRepository for MemoryTaskRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Task>> {
        Ok(self
            .0
            .state
            .lock()
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn find_many(
        &self,
        filter: &TaskFilter,
        options: &QueryOptions<TaskOrderField>,
    ) -> RepoResult<Vec<Task>> {
        let state = self.0.state.lock();

        let mut tasks: Vec<Task> = state
            .tasks
            .iter()
            .filter(|t| match t.client_id {
                Some(client_id) => MemoryDb::client_visible(&state, &filter.scope, client_id),
                None => filter.scope.is_admin() || t.assigned_to == Some(filter.scope.user_id),
            })
            .filter(|t| filter.client_id.is_none_or(|id| t.client_id == Some(id)))
            .filter(|t| filter.status.is_none_or(|s| t.status == s))
            .filter(|t| {
                filter
                    .assigned_to
                    .is_none_or(|id| t.assigned_to == Some(id))
            })
            .filter(|t| !filter.overdue_only || t.is_overdue())
            .cloned()
            .collect();

        tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date));

        Ok(paginate(tasks, options.limit, options.offset))
    }

    async fn create(&self, task: &Task) -> RepoResult<()> {
        self.0.state.lock().tasks.push(task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> RepoResult<()> {
        let mut state = self.0.state.lock();
        let Some(stored) = state.tasks.iter_mut().find(|t| t.id == task.id) else {
            return Err(DomainError::TaskNotFound(task.id));
        };
        *stored = task.clone();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut state = self.0.state.lock();
        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != id);
        if state.tasks.len() == before {
            return Err(DomainError::TaskNotFound(id));
        }
        Ok(())
    }

    async fn exists(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.0.state.lock().tasks.iter().any(|t| t.id == id))
    }
}

// ============================================================================
// Contact repository fake
// ============================================================================

pub struct MemoryContactRepository(pub Arc<MemoryDb>);

#[async_trait]
impl ContactRepository for MemoryContactRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Contact>> {
        Ok(self
            .0
            .state
            .lock()
            .contacts
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_many(
        &self,
        filter: &ContactFilter,
        options: &QueryOptions<ContactOrderField>,
    ) -> RepoResult<Vec<Contact>> {
        let state = self.0.state.lock();

        let mut contacts: Vec<Contact> = state
            .contacts
            .iter()
            .filter(|c| MemoryDb::client_visible(&state, &filter.scope, c.client_id))
            .filter(|c| filter.client_id.is_none_or(|id| c.client_id == id))
            .filter(|c| filter.is_note.is_none_or(|n| c.is_note == n))
            .filter(|c| filter.kind.is_none_or(|k| c.kind == Some(k)))
            .cloned()
            .collect();

        contacts.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(paginate(contacts, options.limit, options.offset))
    }

    async fn create(&self, contact: &Contact) -> RepoResult<()> {
        self.0.state.lock().contacts.push(contact.clone());
        Ok(())
    }

    async fn update(&self, contact: &Contact) -> RepoResult<()> {
        let mut state = self.0.state.lock();
        let Some(stored) = state.contacts.iter_mut().find(|c| c.id == contact.id) else {
            return Err(DomainError::ContactNotFound(contact.id));
        };
        *stored = contact.clone();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut state = self.0.state.lock();
        let before = state.contacts.len();
        state.contacts.retain(|c| c.id != id);
        if state.contacts.len() == before {
            return Err(DomainError::ContactNotFound(id));
        }
        Ok(())
    }

    async fn exists(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.0.state.lock().contacts.iter().any(|c| c.id == id))
    }
}

// ============================================================================
// Client repository fake
// ============================================================================

pub struct MemoryClientRepository(pub Arc<MemoryDb>);

#[async_trait]
impl ClientRepository for MemoryClientRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Client>> {
        Ok(self
            .0
            .state
            .lock()
            .clients
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn exists(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.0.state.lock().clients.iter().any(|c| c.id == id))
    }
}

// ============================================================================
// Activity log fake
// ============================================================================

pub struct MemoryActivityLogRepository(pub Arc<MemoryDb>);

#[async_trait]
impl ActivityLogRepository for MemoryActivityLogRepository {
    async fn append(&self, entry: &ActivityEntry) -> RepoResult<()> {
        let mut state = self.0.state.lock();
        if state.fail_activity {
            return Err(DomainError::DatabaseError(
                "injected activity log failure".to_string(),
            ));
        }
        state.activity.push(entry.clone());
        Ok(())
    }
}
