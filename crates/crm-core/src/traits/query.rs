//! Query types shared by the repository traits
//!
//! Filters always carry an [`AccessScope`] so access restrictions can be
//! pushed into the query itself; filtering rows after the fact would break
//! counts and pagination. ORDER BY fields are enums, which doubles as the
//! allow-list against arbitrary-field injection.

use bitflags::bitflags;
use uuid::Uuid;

use crate::value_objects::{ClientStatus, ContactKind, DealStage, TaskStatus, UserRole};

/// Identity the query is scoped to
///
/// Admins see everything; other users see rows whose client they are
/// assigned to or that are shared with one of their groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessScope {
    pub user_id: Uuid,
    pub role: UserRole,
    pub group_ids: Vec<Uuid>,
}

impl AccessScope {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self {
            user_id,
            role,
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
}

impl From<&crate::value_objects::ActingUser> for AccessScope {
    fn from(user: &crate::value_objects::ActingUser) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            group_ids: user.group_ids.clone(),
        }
    }
}

bitflags! {
    /// Related aggregates to eager-load with a deal
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DealInclude: u8 {
        const CLIENT        = 1 << 0;
        const SHARED_GROUPS = 1 << 1;
        const ATTACHMENTS   = 1 << 2;
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Sort order restricted to a per-entity field allow-list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F> OrderBy<F> {
    pub fn new(field: F, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn desc(field: F) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    pub fn asc(field: F) -> Self {
        Self::new(field, SortDirection::Asc)
    }
}

/// Sortable deal columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DealOrderField {
    #[default]
    UpdatedAt,
    CreatedAt,
    Value,
    Probability,
    ExpectedCloseDate,
}

/// Sortable task columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskOrderField {
    #[default]
    DueDate,
    CreatedAt,
    UpdatedAt,
    Title,
}

/// Sortable contact columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactOrderField {
    #[default]
    Date,
    CreatedAt,
}

/// Query options shared by find operations
#[derive(Debug, Clone, Default)]
pub struct QueryOptions<F> {
    pub include: DealInclude,
    pub order_by: Option<OrderBy<F>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl<F> QueryOptions<F> {
    pub fn with_include(mut self, include: DealInclude) -> Self {
        self.include = include;
        self
    }

    pub fn with_order(mut self, order_by: OrderBy<F>) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn with_page(mut self, limit: i64, offset: i64) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }
}

/// Filter for deal queries
#[derive(Debug, Clone)]
pub struct DealFilter {
    pub scope: AccessScope,
    pub client_id: Option<Uuid>,
    pub stage: Option<DealStage>,
    /// Case-insensitive match against deal notes and client name
    pub search: Option<String>,
}

impl DealFilter {
    pub fn scoped(scope: AccessScope) -> Self {
        Self {
            scope,
            client_id: None,
            stage: None,
            search: None,
        }
    }
}

/// Filter for task queries
#[derive(Debug, Clone)]
pub struct TaskFilter {
    pub scope: AccessScope,
    pub client_id: Option<Uuid>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<Uuid>,
    pub overdue_only: bool,
}

impl TaskFilter {
    pub fn scoped(scope: AccessScope) -> Self {
        Self {
            scope,
            client_id: None,
            status: None,
            assigned_to: None,
            overdue_only: false,
        }
    }
}

/// Filter for contact queries
#[derive(Debug, Clone)]
pub struct ContactFilter {
    pub scope: AccessScope,
    pub client_id: Option<Uuid>,
    pub is_note: Option<bool>,
    pub kind: Option<ContactKind>,
}

impl ContactFilter {
    pub fn scoped(scope: AccessScope) -> Self {
        Self {
            scope,
            client_id: None,
            is_note: None,
            kind: None,
        }
    }
}

/// Client status change persisted atomically with a winning deal
///
/// Carries everything needed for both the client UPDATE and the
/// status-history row attributing the change to the deal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientTransition {
    pub client_id: Uuid,
    pub from: ClientStatus,
    pub to: ClientStatus,
    /// User on whose behalf the transition happens
    pub changed_by: Uuid,
    /// Deal that triggered the transition
    pub deal_id: Uuid,
}
