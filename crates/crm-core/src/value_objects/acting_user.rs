//! ActingUser - identity of the caller as resolved by the transport layer
//!
//! Authentication itself is an external collaborator; by the time a use case
//! runs, the caller's id, role, and group memberships are already known.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Role of a CRM user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            _ => Err(DomainError::Validation(format!("unknown user role: {s}"))),
        }
    }
}

/// The authenticated caller of a use case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActingUser {
    pub id: Uuid,
    pub role: UserRole,
    pub email: String,
    /// Groups the user belongs to, resolved at authentication time
    pub group_ids: Vec<Uuid>,
}

impl ActingUser {
    pub fn new(id: Uuid, role: UserRole, email: impl Into<String>) -> Self {
        Self {
            id,
            role,
            email: email.into(),
            group_ids: Vec::new(),
        }
    }

    pub fn with_groups(mut self, group_ids: Vec<Uuid>) -> Self {
        self.group_ids = group_ids;
        self
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether the user belongs to any of the given groups
    pub fn in_any_group(&self, group_ids: &[Uuid]) -> bool {
        self.group_ids.iter().any(|g| group_ids.contains(g))
    }
}
