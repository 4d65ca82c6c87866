//! Client model -> entity mapper

use uuid::Uuid;

use crm_core::entities::Client;
use crm_core::error::DomainError;
use crm_core::value_objects::ClientStatus;

use crate::models::ClientModel;

/// Reconstruct a Client from its row and (separately loaded) shared groups
pub fn client_from_model(
    model: ClientModel,
    shared_group_ids: Vec<Uuid>,
) -> Result<Client, DomainError> {
    let status: ClientStatus = model.status.parse()?;

    Ok(Client::restore(
        model.id,
        model.name,
        status,
        model.assigned_to,
        shared_group_ids,
        model.created_at,
        model.updated_at,
    ))
}
