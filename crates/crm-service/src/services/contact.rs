//! Contact service
//!
//! Logs client interactions (calls, meetings, emails) and free-form notes.

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crm_core::entities::Contact;
use crm_core::events::{ActivityAction, ActivityEntry};
use crm_core::traits::{AccessScope, ContactFilter, ContactOrderField, QueryOptions};
use crm_core::value_objects::{ActingUser, ContactKind};

use crate::dto::{ContactResponse, ListContactsRequest, LogContactRequest};

use super::access::AccessControl;
use super::activity::ActivityLogger;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Contact service
pub struct ContactService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ContactService<'a> {
    /// Create a new ContactService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Log an interaction or attach a note to a client
    #[instrument(skip(self, user, request))]
    pub async fn log_contact(
        &self,
        user: &ActingUser,
        request: LogContactRequest,
    ) -> ServiceResult<ContactResponse> {
        request.validate()?;

        AccessControl::new(self.ctx)
            .require_client(user, request.client_id)
            .await?;

        let contact = if request.is_note {
            Contact::new_note(request.client_id, request.notes, user.id)
        } else {
            let kind = request
                .kind
                .as_deref()
                .ok_or_else(|| ServiceError::validation("Interaction kind is required"))?
                .parse::<ContactKind>()?;
            let date = request.date.unwrap_or_else(Utc::now);
            Contact::new_interaction(request.client_id, kind, date, request.notes, user.id)
        };

        self.ctx.contact_repo().create(&contact).await?;

        info!(contact_id = %contact.id, client_id = %contact.client_id, "Contact logged");

        ActivityLogger::new(self.ctx)
            .record(ActivityEntry::new(
                user.id,
                ActivityAction::ContactLogged,
                contact.id,
            ))
            .await;

        Ok(ContactResponse::from(&contact))
    }

    /// Get contact by ID
    #[instrument(skip(self, user))]
    pub async fn get_contact(
        &self,
        user: &ActingUser,
        contact_id: Uuid,
    ) -> ServiceResult<ContactResponse> {
        let contact = self.load_authorized(user, contact_id).await?;
        Ok(ContactResponse::from(&contact))
    }

    /// List contacts visible to the caller
    #[instrument(skip(self, user, request))]
    pub async fn list_contacts(
        &self,
        user: &ActingUser,
        request: ListContactsRequest,
    ) -> ServiceResult<Vec<ContactResponse>> {
        request.validate()?;

        let mut filter = ContactFilter::scoped(AccessScope::from(user));
        filter.client_id = request.client_id;
        filter.is_note = request.is_note;
        filter.kind = request
            .kind
            .as_deref()
            .map(str::parse::<ContactKind>)
            .transpose()?;

        let mut options = QueryOptions::<ContactOrderField>::default();
        if let Some(limit) = request.limit {
            options = options.with_page(limit, request.offset.unwrap_or(0));
        }

        let contacts = self.ctx.contact_repo().find_many(&filter, &options).await?;

        Ok(contacts.iter().map(ContactResponse::from).collect())
    }

    /// Hard delete a contact
    #[instrument(skip(self, user))]
    pub async fn delete_contact(&self, user: &ActingUser, contact_id: Uuid) -> ServiceResult<()> {
        self.load_authorized(user, contact_id).await?;

        self.ctx.contact_repo().delete(contact_id).await?;

        info!(contact_id = %contact_id, "Contact deleted");

        ActivityLogger::new(self.ctx)
            .record(ActivityEntry::new(
                user.id,
                ActivityAction::ContactDeleted,
                contact_id,
            ))
            .await;

        Ok(())
    }

    /// Load a contact and check the caller may act on its client
    async fn load_authorized(&self, user: &ActingUser, contact_id: Uuid) -> ServiceResult<Contact> {
        let contact = self
            .ctx
            .contact_repo()
            .find_by_id(contact_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Contact", contact_id.to_string()))?;

        AccessControl::new(self.ctx)
            .require_client(user, contact.client_id)
            .await?;

        Ok(contact)
    }
}
