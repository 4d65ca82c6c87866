//! Deal model -> entity mapper

use uuid::Uuid;

use crm_core::entities::Deal;
use crm_core::error::DomainError;
use crm_core::value_objects::{DealStage, DealValue, Probability};

use crate::models::DealModel;

/// Reconstruct a Deal from its row and (separately loaded) shared groups
pub fn deal_from_model(
    model: DealModel,
    shared_group_ids: Vec<Uuid>,
) -> Result<Deal, DomainError> {
    let value = DealValue::new(model.value_amount, &model.value_currency)?;
    let probability = Probability::from_int(i32::from(model.probability))?;
    let stage: DealStage = model.stage.parse()?;

    Ok(Deal::restore(
        model.id,
        model.client_id,
        value,
        probability,
        stage,
        model.expected_close_date,
        model.notes,
        shared_group_ids,
        model.created_at,
        model.updated_at,
    ))
}
