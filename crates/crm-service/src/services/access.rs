//! Client-based access control
//!
//! Every deal, contact, and client-bound task derives its visibility from
//! the owning client: admins see everything, other users need to be the
//! client's assignee or a member of a group the client is shared with.

use tracing::instrument;
use uuid::Uuid;

use crm_core::entities::Client;
use crm_core::value_objects::ActingUser;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Access control checks shared by the services
pub struct AccessControl<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccessControl<'a> {
    /// Create a new AccessControl
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Whether the caller may act on records belonging to this client
    pub fn can_access(user: &ActingUser, client: &Client) -> bool {
        user.is_admin() || client.is_assignee(user.id) || client.is_shared_with_any(&user.group_ids)
    }

    /// Check the predicate, returning `PermissionDenied` on violation
    pub fn authorize(user: &ActingUser, client: &Client) -> ServiceResult<()> {
        if Self::can_access(user, client) {
            return Ok(());
        }
        Err(ServiceError::permission_denied(
            "not assigned to this client and not in a shared group",
        ))
    }

    /// Load a client and authorize the caller against it
    #[instrument(skip(self, user))]
    pub async fn require_client(&self, user: &ActingUser, client_id: Uuid) -> ServiceResult<Client> {
        let client = self
            .ctx
            .client_repo()
            .find_by_id(client_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Client", client_id.to_string()))?;

        Self::authorize(user, &client)?;

        Ok(client)
    }
}
