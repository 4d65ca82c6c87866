//! Contact entity - a logged interaction or note on a client

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::value_objects::ContactKind;

/// Contact aggregate
///
/// `is_note` distinguishes a free-form note from a logged interaction
/// (call, meeting, email).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: Uuid,
    pub client_id: Uuid,
    pub kind: Option<ContactKind>,
    pub date: DateTime<Utc>,
    pub notes: String,
    pub is_note: bool,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Log a client interaction
    pub fn new_interaction(
        client_id: Uuid,
        kind: ContactKind,
        date: DateTime<Utc>,
        notes: String,
        user_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            client_id,
            kind: Some(kind),
            date,
            notes,
            is_note: false,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach a free-form note
    pub fn new_note(client_id: Uuid, notes: String, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            client_id,
            kind: None,
            date: now,
            notes,
            is_note: true,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstruct a Contact loaded from the persistence store
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        client_id: Uuid,
        kind: Option<ContactKind>,
        date: DateTime<Utc>,
        notes: String,
        is_note: bool,
        user_id: Uuid,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            client_id,
            kind,
            date,
            notes,
            is_note,
            user_id,
            created_at,
            updated_at,
        }
    }

    /// Update the notes text
    pub fn set_notes(&mut self, notes: String) {
        self.notes = notes;
        self.updated_at = Utc::now().max(self.updated_at);
    }

    #[inline]
    pub fn is_note_type(&self) -> bool {
        self.is_note
    }

    #[inline]
    pub fn is_contact_type(&self) -> bool {
        !self.is_note
    }
}
