//! Contact model -> entity mapper

use crm_core::entities::Contact;
use crm_core::error::DomainError;
use crm_core::value_objects::ContactKind;

use crate::models::ContactModel;

impl TryFrom<ContactModel> for Contact {
    type Error = DomainError;

    fn try_from(model: ContactModel) -> Result<Self, Self::Error> {
        let kind = model
            .kind
            .as_deref()
            .map(str::parse::<ContactKind>)
            .transpose()?;

        Ok(Contact::restore(
            model.id,
            model.client_id,
            kind,
            model.date,
            model.notes,
            model.is_note,
            model.user_id,
            model.created_at,
            model.updated_at,
        ))
    }
}
