//! Client entity - the company or person a deal belongs to
//!
//! Deals, tasks, and contacts reference a client by id; access to those
//! aggregates is derived from the client's assignee and shared groups.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::value_objects::ClientStatus;

/// Client aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub status: ClientStatus,
    pub assigned_to: Option<Uuid>,
    pub shared_group_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Create a new Client with a generated id
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            status: ClientStatus::Lead,
            assigned_to: None,
            shared_group_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstruct a Client loaded from the persistence store
    pub fn restore(
        id: Uuid,
        name: String,
        status: ClientStatus,
        assigned_to: Option<Uuid>,
        shared_group_ids: Vec<Uuid>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            status,
            assigned_to,
            shared_group_ids,
            created_at,
            updated_at,
        }
    }

    /// Whether the given user is the client's direct assignee
    #[inline]
    pub fn is_assignee(&self, user_id: Uuid) -> bool {
        self.assigned_to == Some(user_id)
    }

    /// Whether the client is shared with any of the given groups
    pub fn is_shared_with_any(&self, group_ids: &[Uuid]) -> bool {
        self.shared_group_ids.iter().any(|g| group_ids.contains(g))
    }

    /// Change the client status
    pub fn set_status(&mut self, status: ClientStatus) {
        self.status = status;
        self.updated_at = Utc::now().max(self.updated_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignee_check() {
        let user = Uuid::new_v4();
        let mut client = Client::new("Acme Sp. z o.o.".to_string());
        assert!(!client.is_assignee(user));

        client.assigned_to = Some(user);
        assert!(client.is_assignee(user));
        assert!(!client.is_assignee(Uuid::new_v4()));
    }

    #[test]
    fn test_shared_group_check() {
        let group = Uuid::new_v4();
        let mut client = Client::new("Acme Sp. z o.o.".to_string());
        assert!(!client.is_shared_with_any(&[group]));

        client.shared_group_ids.push(group);
        assert!(client.is_shared_with_any(&[Uuid::new_v4(), group]));
    }

    #[test]
    fn test_set_status_bumps_updated_at() {
        let mut client = Client::new("Acme".to_string());
        let before = client.updated_at;
        client.set_status(ClientStatus::ActiveClient);
        assert_eq!(client.status, ClientStatus::ActiveClient);
        assert!(client.updated_at >= before);
    }
}
